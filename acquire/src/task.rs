//! Orchestration for the closest-dropped-item pickup task.
//!
//! Each tick runs, in order: recovery (preempts everything), stall handling,
//! the optional inventory guard, target selection and finally the approach
//! sub-task. All run-specific state lives in [`PickupState`], owned by a single
//! task instance and only mutated from its own `tick`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::approach::{ApproachConfig, ApproachStep, GetToEntity};
use crate::core::blacklist::Blacklist;
use crate::core::guard::ResourceGuard;
use crate::core::invariants::validate_invariants;
use crate::core::progress::{ProgressConfig, ProgressMonitor, ProgressResetPolicy};
use crate::core::recovery::{RecoveryConfig, TimeoutWander};
use crate::core::types::{EntityId, PickupSpec, TaskKind, TaskPhase, TickOutcome};
use crate::world::{Diagnostics, World};

/// Tunables shared by every pickup task instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub progress: ProgressConfig,
    pub recovery: RecoveryConfig,
    pub approach: ApproachConfig,
}

/// Run-specific state of one task instance. Never part of task equality.
#[derive(Debug, Clone)]
pub struct PickupState {
    pub(crate) blacklist: Blacklist,
    pub(crate) current: Option<EntityId>,
    pub(crate) approach: Option<GetToEntity>,
    pub(crate) progress: ProgressMonitor,
    pub(crate) wander: TimeoutWander,
    pub(crate) guard: ResourceGuard,
    pub(crate) phase: TaskPhase,
    reach_distance: f64,
}

impl PickupState {
    fn new(config: &TaskConfig) -> Self {
        Self {
            blacklist: Blacklist::default(),
            current: None,
            approach: None,
            progress: ProgressMonitor::new(config.progress.clone()),
            wander: TimeoutWander::new(config.recovery.clone()),
            guard: ResourceGuard::default(),
            phase: TaskPhase::Idle,
            reach_distance: config.approach.reach_distance,
        }
    }

    fn step<W, D>(&mut self, spec: &PickupSpec, world: &mut W, diagnostics: &mut D) -> TickOutcome
    where
        W: World + ?Sized,
        D: Diagnostics + ?Sized,
    {
        let sample = world.sample();

        if self.wander.is_active() {
            if !self.wander.is_finished(sample) {
                self.progress.reset();
                return self.recovering();
            }
            debug!(tick = sample.tick, "wander finished, resuming selection");
            self.wander.finish();
            self.progress.reset();
        }

        if !self.progress.check(sample) {
            self.progress.reset();
            if let Some(target) = self.current.take() {
                diagnostics.message(&format!("Blacklisted drops: {}", self.blacklist));
                diagnostics.message("Failed to pick up drop, adding to blacklist.");
                self.blacklist.insert(target);
                self.approach = None;
                self.wander.activate(sample);
                debug!(id = %target, tick = sample.tick, "stalled, wandering");
                return self.recovering();
            }
            debug!(tick = sample.tick, "stalled without a target");
        }

        if spec.free_inventory_if_full
            && !self.guard.probe(&mut *world, &mut *diagnostics).is_satisfied()
        {
            debug!(tick = sample.tick, "inventory still full, pursuing anyway");
        }

        let Some(candidate) =
            world.find_nearest(sample.position, &spec.targets, &self.blacklist)
        else {
            self.current = None;
            self.approach = None;
            self.phase = TaskPhase::Selecting;
            return TickOutcome::NoCandidate;
        };

        let switching = self.current != Some(candidate.id);
        if switching || self.approach.is_none() {
            if switching {
                debug!(id = %candidate.id, position = %candidate.position, "pursuing new drop");
                if self.progress.config().reset_policy == ProgressResetPolicy::OnTargetChange {
                    self.progress.reset();
                }
            }
            self.current = Some(candidate.id);
            self.approach = Some(GetToEntity::new(candidate.id, self.reach_distance));
        }

        self.phase = TaskPhase::Pursuing;
        let target = candidate.id;
        let step = match self.approach.as_mut() {
            Some(approach) => approach.tick(&*world, sample.position),
            None => ApproachStep::Lost,
        };
        match step {
            ApproachStep::MoveTo(goal) => TickOutcome::Pursuing { target, goal },
            ApproachStep::Arrived => {
                self.approach = None;
                TickOutcome::Reached { target }
            }
            ApproachStep::Lost => {
                self.current = None;
                self.approach = None;
                self.phase = TaskPhase::Selecting;
                TickOutcome::NoCandidate
            }
        }
    }

    fn recovering(&mut self) -> TickOutcome {
        self.phase = TaskPhase::Recovering;
        match self.wander.tick() {
            Some(goal) => TickOutcome::Recovering { goal },
            None => TickOutcome::NoCandidate,
        }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn current_target(&self) -> Option<EntityId> {
        self.current
    }

    pub fn approach_target(&self) -> Option<EntityId> {
        self.approach.as_ref().map(GetToEntity::target)
    }

    pub fn is_recovering(&self) -> bool {
        self.wander.is_active()
    }

    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    /// Sub-task currently driving movement, if any.
    pub fn active_subtask(&self) -> Option<TaskKind> {
        if self.wander.is_active() {
            return Some(self.wander.kind());
        }
        self.approach.as_ref().map(GetToEntity::kind)
    }
}

/// Pick up the closest dropped items matching a target spec, blacklisting
/// drops the agent cannot make progress toward.
#[derive(Debug, Clone)]
pub struct PickupDroppedItemTask {
    spec: PickupSpec,
    state: PickupState,
}

impl PickupDroppedItemTask {
    pub fn new(spec: PickupSpec, config: &TaskConfig) -> Self {
        let state = PickupState::new(config);
        Self { spec, state }
    }

    /// Called by the task engine when the task (re)starts.
    pub fn on_start(&mut self) {
        self.state.guard.reset();
        self.state.progress.reset();
        self.state.phase = TaskPhase::Selecting;
    }

    /// Called by the task engine on interruption. The blacklist survives so a
    /// resumed instance keeps skipping known-bad drops.
    pub fn on_stop(&mut self) {
        self.state.wander.finish();
        self.state.current = None;
        self.state.approach = None;
        self.state.phase = TaskPhase::Idle;
    }

    /// Advance one tick. Starts the task implicitly when idle.
    pub fn tick<W, D>(&mut self, world: &mut W, diagnostics: &mut D) -> TickOutcome
    where
        W: World + ?Sized,
        D: Diagnostics + ?Sized,
    {
        if self.state.phase == TaskPhase::Idle {
            self.on_start();
        }
        let outcome = self.state.step(&self.spec, world, diagnostics);
        debug_assert!(
            validate_invariants(&self.state).is_empty(),
            "pickup invariants violated: {:?}",
            validate_invariants(&self.state)
        );
        outcome
    }

    pub fn kind(&self) -> TaskKind {
        TaskKind::PickupDroppedItems(self.spec.clone())
    }

    pub fn spec(&self) -> &PickupSpec {
        &self.spec
    }

    pub fn state(&self) -> &PickupState {
        &self.state
    }

    /// The agent must be standing on ground before this task may be interrupted.
    pub fn requires_grounded(&self) -> bool {
        true
    }
}

impl PartialEq for PickupDroppedItemTask {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for PickupDroppedItemTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pickup Dropped Items: {}", self.spec.targets)
    }
}
