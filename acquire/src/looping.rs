//! Multi-tick driver for `acquire run`.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::types::{EntityId, TickOutcome};
use crate::sim::{PickupRecord, SimWorld};
use crate::task::PickupDroppedItemTask;
use crate::world::{AgentView, Diagnostics};

/// Reason why `run_loop` stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum LoopStop {
    /// The inventory holds every target's count.
    Complete,
    /// No candidate was found for `idle_ticks` consecutive ticks.
    Exhausted { idle_ticks: u64 },
    /// The run reached the configured tick limit.
    MaxTicksExceeded { max_ticks: u64 },
}

/// Limits for one loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLimits {
    pub max_ticks: u64,
    pub idle_ticks_limit: u64,
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopOutcome {
    pub task: String,
    pub ticks: u64,
    pub recoveries: u32,
    pub pickups: Vec<PickupRecord>,
    pub blacklisted: Vec<EntityId>,
    pub stop: LoopStop,
}

/// Tick `task` against `world` until the targets are collected, candidates run
/// out, or the tick limit is reached.
///
/// `on_tick` sees every outcome before the world applies it.
pub fn run_loop<D: Diagnostics, F: FnMut(u64, &TickOutcome)>(
    task: &mut PickupDroppedItemTask,
    world: &mut SimWorld,
    diagnostics: &mut D,
    limits: LoopLimits,
    mut on_tick: F,
) -> LoopOutcome {
    let started_at = world.tick();
    let mut pickups = Vec::new();
    let mut recoveries = 0u32;
    let mut idle_ticks = 0u64;
    let mut was_recovering = false;

    let stop = loop {
        // Pre-check so an already-satisfied inventory never ticks the task.
        if world.inventory().satisfies(&task.spec().targets) {
            break LoopStop::Complete;
        }
        let ticks = world.tick() - started_at;
        if ticks >= limits.max_ticks {
            break LoopStop::MaxTicksExceeded {
                max_ticks: limits.max_ticks,
            };
        }

        let outcome = task.tick(world, diagnostics);
        debug!(tick = world.tick(), subtask = ?task.state().active_subtask(), "task ticked");
        on_tick(world.tick(), &outcome);

        let recovering = matches!(outcome, TickOutcome::Recovering { .. });
        if recovering && !was_recovering {
            recoveries += 1;
        }
        was_recovering = recovering;

        if outcome == TickOutcome::NoCandidate {
            idle_ticks += 1;
        } else {
            idle_ticks = 0;
        }

        let picked = world.apply(&outcome);
        for record in &picked {
            debug!(tick = record.tick, id = %record.id, kind = %record.kind, "picked up drop");
        }
        pickups.extend(picked);

        if idle_ticks >= limits.idle_ticks_limit {
            break LoopStop::Exhausted { idle_ticks };
        }
    };

    let ticks = world.tick() - started_at;
    info!(task = %task, ticks, recoveries, pickups = pickups.len(), ?stop, "loop finished");
    LoopOutcome {
        task: task.to_string(),
        ticks,
        recoveries,
        pickups,
        blacklisted: task.state().blacklist().iter().collect(),
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ItemKind, Vec3};
    use crate::sim::{Inventory, SimulationConfig};
    use crate::test_support::{RecordingDiagnostics, fast_config, pickup};

    fn limits() -> LoopLimits {
        LoopLimits {
            max_ticks: 200,
            idle_ticks_limit: 5,
        }
    }

    #[test]
    fn loop_stops_on_complete_without_ticking() {
        let mut inventory = Inventory::new(4, Vec::new());
        inventory.insert(ItemKind::new("x"), 1);
        let mut world = SimWorld::new(Vec3::ZERO, inventory, SimulationConfig::default());
        let mut task = PickupDroppedItemTask::new(pickup("x", 1, false), &fast_config());

        let mut calls = 0;
        let outcome = run_loop(
            &mut task,
            &mut world,
            &mut RecordingDiagnostics::default(),
            limits(),
            |_, _| calls += 1,
        );
        assert_eq!(outcome.stop, LoopStop::Complete);
        assert_eq!(outcome.ticks, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn loop_stops_when_no_candidates_remain() {
        let mut world = SimWorld::new(
            Vec3::ZERO,
            Inventory::new(4, Vec::new()),
            SimulationConfig::default(),
        );
        let mut task = PickupDroppedItemTask::new(pickup("x", 1, false), &fast_config());

        let outcome = run_loop(
            &mut task,
            &mut world,
            &mut RecordingDiagnostics::default(),
            limits(),
            |_, _| {},
        );
        assert_eq!(outcome.stop, LoopStop::Exhausted { idle_ticks: 5 });
        assert_eq!(outcome.ticks, 5);
    }

    #[test]
    fn loop_stops_on_max_ticks() {
        let mut world = SimWorld::new(
            Vec3::ZERO,
            Inventory::new(4, Vec::new()),
            SimulationConfig::default(),
        );
        world.spawn_item(ItemKind::new("x"), Vec3::new(500.0, 0.0, 0.0));
        let mut task = PickupDroppedItemTask::new(pickup("x", 1, false), &fast_config());

        let outcome = run_loop(
            &mut task,
            &mut world,
            &mut RecordingDiagnostics::default(),
            LoopLimits {
                max_ticks: 10,
                idle_ticks_limit: 5,
            },
            |_, _| {},
        );
        assert_eq!(outcome.stop, LoopStop::MaxTicksExceeded { max_ticks: 10 });
        assert_eq!(outcome.ticks, 10);
        assert_eq!(outcome.recoveries, 0);
    }

    #[test]
    fn loop_collects_nearest_first() {
        let mut world = SimWorld::new(
            Vec3::ZERO,
            Inventory::new(4, Vec::new()),
            SimulationConfig::default(),
        );
        let far = world.spawn_item(ItemKind::new("x"), Vec3::new(-8.0, 0.0, 0.0));
        let near = world.spawn_item(ItemKind::new("x"), Vec3::new(4.0, 0.0, 0.0));
        let mut task = PickupDroppedItemTask::new(pickup("x", 2, false), &fast_config());

        let outcome = run_loop(
            &mut task,
            &mut world,
            &mut RecordingDiagnostics::default(),
            limits(),
            |_, _| {},
        );
        assert_eq!(outcome.stop, LoopStop::Complete);
        let order: Vec<EntityId> = outcome.pickups.iter().map(|p| p.id).collect();
        assert_eq!(order, vec![near, far]);
        assert!(outcome.blacklisted.is_empty());
    }
}
