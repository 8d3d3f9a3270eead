//! Approach sub-task: move to a tracked entity until within reach.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, TaskKind, Vec3};
use crate::world::EntityTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachConfig {
    /// Distance at which the target counts as reached.
    pub reach_distance: f64,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            reach_distance: 1.0,
        }
    }
}

impl ApproachConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.reach_distance.is_finite() && self.reach_distance >= 0.0) {
            bail!("approach.reach_distance must be a finite, non-negative number");
        }
        Ok(())
    }
}

/// What the approach sub-task wants this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApproachStep {
    /// Keep moving toward the target's current position.
    MoveTo(Vec3),
    /// Within reach of the target.
    Arrived,
    /// Target no longer tracked or no longer alive.
    Lost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetToEntity {
    target: EntityId,
    reach_distance: f64,
}

impl GetToEntity {
    pub fn new(target: EntityId, reach_distance: f64) -> Self {
        Self {
            target,
            reach_distance,
        }
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    /// Re-reads the target position every tick; dropped items drift.
    pub fn tick<T: EntityTracker + ?Sized>(&mut self, tracker: &T, origin: Vec3) -> ApproachStep {
        let Some(entity) = tracker.entity(self.target) else {
            return ApproachStep::Lost;
        };
        if !entity.is_alive() {
            return ApproachStep::Lost;
        }
        if entity.position.distance(origin) <= self.reach_distance {
            return ApproachStep::Arrived;
        }
        ApproachStep::MoveTo(entity.position)
    }

    pub fn kind(&self) -> TaskKind {
        TaskKind::GetToEntity {
            target: self.target,
        }
    }
}
