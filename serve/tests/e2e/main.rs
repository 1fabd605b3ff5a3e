//! End-to-end tests: real HTTP server on a random port, mock models, fixture database.

mod common;
mod invalid_json;
mod ping;
mod run_wait;
mod threads;
mod tools_list;
