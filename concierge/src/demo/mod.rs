//! Demo agents shipped with the crate.
//!
//! - [`email`]: email/calendar assistant with placeholder tools, ended by the `Done` tool.
//! - [`chinook`]: music-store supervisor over the Chinook demo database, delegating to
//!   catalog and invoice sub-agents.

pub mod chinook;
pub mod email;
