//! Deterministic, pure logic shared by the acquisition task.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod approach;
pub mod blacklist;
pub mod guard;
pub mod invariants;
pub mod progress;
pub mod recovery;
pub mod selector;
pub mod types;
