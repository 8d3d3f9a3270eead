//! Movement progress checking for stall detection.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::types::ProgressSample;

/// When the orchestrator re-bases the progress window besides the explicit
/// events (task start, stall handled, recovery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressResetPolicy {
    /// Also reset whenever pursuit of a different target begins.
    OnTargetChange,
    /// Only reset on the explicit events.
    ExplicitOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Length of one sampling window, in ticks.
    pub window_ticks: u64,
    /// Minimum displacement over a window that counts as progress.
    pub min_distance: f64,
    /// Consecutive failing windows that constitute a stall.
    pub attempts: u32,
    pub reset_policy: ProgressResetPolicy,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            window_ticks: 20,
            min_distance: 0.1,
            attempts: 3,
            reset_policy: ProgressResetPolicy::OnTargetChange,
        }
    }
}

impl ProgressConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_ticks == 0 {
            bail!("progress.window_ticks must be > 0");
        }
        if !(self.min_distance.is_finite() && self.min_distance >= 0.0) {
            bail!("progress.min_distance must be a finite, non-negative number");
        }
        if self.attempts == 0 {
            bail!("progress.attempts must be > 0");
        }
        Ok(())
    }
}

/// Flags a stall when the agent fails to move `min_distance` over `attempts`
/// consecutive windows.
///
/// Once a stall is reported, `check` keeps returning false until `reset`.
#[derive(Debug, Clone)]
pub struct ProgressMonitor {
    config: ProgressConfig,
    baseline: Option<ProgressSample>,
    failures: u32,
    stalled: bool,
}

impl ProgressMonitor {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            baseline: None,
            failures: 0,
            stalled: false,
        }
    }

    /// Returns true while the agent is making progress.
    pub fn check(&mut self, sample: ProgressSample) -> bool {
        if self.stalled {
            return false;
        }
        let Some(baseline) = self.baseline else {
            self.baseline = Some(sample);
            return true;
        };
        if sample.tick.saturating_sub(baseline.tick) < self.config.window_ticks {
            return true;
        }

        if baseline.position.distance(sample.position) < self.config.min_distance {
            self.failures += 1;
        } else {
            self.failures = 0;
        }
        self.baseline = Some(sample);

        if self.failures >= self.config.attempts {
            self.stalled = true;
            return false;
        }
        true
    }

    /// Re-base the window: the next `check` adopts its sample as the new start.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.failures = 0;
        self.stalled = false;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }
}
