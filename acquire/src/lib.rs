//! Closest-target acquisition for an autonomous agent in a live world.
//!
//! The crate implements a pickup task that repeatedly selects the nearest
//! matching dropped item, approaches it, and blacklists drops the agent cannot
//! make progress toward, wandering briefly before resuming. The architecture
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (selection, stall detection,
//!   recovery, guards). No I/O, fully testable in isolation.
//! - **[`world`]**: Collaborator contracts (entity tracking, agent state,
//!   inventory, diagnostics).
//! - **[`io`]**: Config and scenario files.
//!
//! [`task`] orchestrates the core per tick; [`sim`] and [`looping`] drive it
//! against a deterministic simulated world for the CLI and tests.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod looping;
pub mod sim;
pub mod task;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod world;
