//! Resource guard: best-effort inventory freeing with rate-limited warnings.

use crate::world::{Diagnostics, InventoryProbe};

pub const INVENTORY_FULL_WARNING: &str =
    "Failed to free up inventory as no throwaway-able slot was found. Awaiting user input.";

/// Outcome of one guard probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Satisfied,
    /// Probe failed; `warned` is true only on the first failure of an episode.
    Failing { warned: bool },
}

impl GuardStatus {
    pub fn is_satisfied(self) -> bool {
        matches!(self, GuardStatus::Satisfied)
    }
}

/// Tracks whether the last probe failed, purely to suppress repeated warnings.
#[derive(Debug, Clone, Default)]
pub struct ResourceGuard {
    last_check_failed: bool,
}

impl ResourceGuard {
    /// Poll the probe once. Never blocks and never changes task control flow.
    pub fn probe<P, D>(&mut self, probe: &mut P, diagnostics: &mut D) -> GuardStatus
    where
        P: InventoryProbe + ?Sized,
        D: Diagnostics + ?Sized,
    {
        if probe.ensure_free() {
            self.last_check_failed = false;
            return GuardStatus::Satisfied;
        }
        let warned = !self.last_check_failed;
        if warned {
            diagnostics.warning(INVENTORY_FULL_WARNING);
        }
        self.last_check_failed = true;
        GuardStatus::Failing { warned }
    }

    pub fn last_check_failed(&self) -> bool {
        self.last_check_failed
    }

    pub fn reset(&mut self) {
        self.last_check_failed = false;
    }
}
