//! Stable exit codes for acquire CLI commands.

/// Command succeeded; for `acquire run`, every target was collected.
pub const OK: i32 = 0;
/// Command failed due to an invalid scenario/config or other errors.
pub const INVALID: i32 = 1;
/// `acquire run` stopped because no candidate remained.
pub const EXHAUSTED: i32 = 2;
/// `acquire run` hit the tick limit.
pub const MAX_TICKS: i32 = 3;
