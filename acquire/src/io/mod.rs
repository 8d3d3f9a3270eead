//! File-backed inputs for the `acquire` CLI.

pub mod config;
pub mod scenario;
