//! Bounded wander used to escape a stuck position.

use std::f64::consts::TAU;

use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::types::{ProgressSample, TaskKind, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Hard time budget of one wander, in ticks.
    pub duration_ticks: u64,
    /// Wander ends early once the agent is this far from where it started.
    pub wander_distance: f64,
    /// Seed for wander headings. Each task instance owns its own generator.
    pub seed: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            duration_ticks: 200,
            wander_distance: 20.0,
            seed: 0x5eed,
        }
    }
}

impl RecoveryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.duration_ticks == 0 {
            bail!("recovery.duration_ticks must be > 0");
        }
        if !(self.wander_distance.is_finite() && self.wander_distance > 0.0) {
            bail!("recovery.wander_distance must be a finite number > 0");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct WanderRun {
    started: ProgressSample,
    goal: Vec3,
}

/// Wander in a random horizontal direction until either the time budget runs
/// out or the agent has moved `wander_distance` away.
#[derive(Debug, Clone)]
pub struct TimeoutWander {
    config: RecoveryConfig,
    rng: StdRng,
    run: Option<WanderRun>,
}

impl TimeoutWander {
    pub fn new(config: RecoveryConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            run: None,
        }
    }

    /// Start a new wander from `sample`, replacing any run in progress.
    pub fn activate(&mut self, sample: ProgressSample) {
        let heading = self.rng.gen_range(0.0..TAU);
        let direction = Vec3::new(heading.cos(), 0.0, heading.sin());
        self.run = Some(WanderRun {
            started: sample,
            goal: sample.position + direction * self.config.wander_distance,
        });
    }

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// True when inactive, or when the active run has used up its budget.
    pub fn is_finished(&self, sample: ProgressSample) -> bool {
        let Some(run) = self.run else {
            return true;
        };
        let elapsed = sample.tick.saturating_sub(run.started.tick);
        elapsed >= self.config.duration_ticks
            || run.started.position.distance(sample.position) >= self.config.wander_distance
    }

    /// Movement goal for this tick, or `None` when inactive.
    pub fn tick(&mut self) -> Option<Vec3> {
        self.run.map(|run| run.goal)
    }

    /// Deactivate (timeout handled by the caller, or external stop).
    pub fn finish(&mut self) {
        self.run = None;
    }

    pub fn kind(&self) -> TaskKind {
        TaskKind::TimeoutWander {
            distance: self.config.wander_distance,
        }
    }
}
