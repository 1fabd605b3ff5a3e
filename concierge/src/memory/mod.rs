//! # Memory: checkpointing, long-term store and run config
//!
//! 1. **Checkpointer**: latest state per thread, so a conversation can be resumed by `thread_id`.
//! 2. **Store**: cross-session key-value storage for long-term memory (e.g. music
//!    preferences), isolated by [`Namespace`] such as `["memory_profile", customer_id]`.
//!
//! [`RunnableConfig`] is passed to `CompiledStateGraph::invoke`; it carries the thread,
//! user and customer ids plus the step limit.

mod checkpointer;
mod config;
mod in_memory_store;
mod memory_saver;
mod store;

pub use checkpointer::{Checkpoint, CheckpointError, Checkpointer};
pub use config::{RunnableConfig, DEFAULT_RECURSION_LIMIT};
pub use in_memory_store::InMemoryStore;
pub use memory_saver::MemorySaver;
pub use store::{Namespace, Store, StoreError};
