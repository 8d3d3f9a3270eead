//! Collaborator contracts consumed by the acquisition task.
//!
//! The [`World`] traits decouple the orchestrator from the actual world backend
//! (entity tracking, agent state, inventory management). Tests and the
//! simulation harness provide in-memory implementations.

use tracing::{info, warn};

use crate::core::blacklist::Blacklist;
use crate::core::selector::closest_by;
use crate::core::types::{Candidate, EntityId, ProgressSample, TargetSpec, Vec3};

/// Read access to world-tracked dropped items.
pub trait EntityTracker {
    /// All tracked dropped items whose kind matches any filter of `spec`.
    ///
    /// An unavailable tracker returns an empty list.
    fn dropped_items(&self, spec: &TargetSpec) -> Vec<Candidate>;

    /// Look up a tracked entity by identity.
    fn entity(&self, id: EntityId) -> Option<Candidate>;

    /// Cheap pre-check: is any item matching `spec` dropped at all?
    fn item_dropped(&self, spec: &TargetSpec) -> bool {
        !self.dropped_items(spec).is_empty()
    }

    /// Nearest alive dropped item matching `spec` that is not in `exclude`.
    ///
    /// Equal distances resolve to the lowest id, whatever order the tracker
    /// reports items in.
    fn find_nearest(
        &self,
        origin: Vec3,
        spec: &TargetSpec,
        exclude: &Blacklist,
    ) -> Option<Candidate> {
        if !self.item_dropped(spec) {
            return None;
        }
        let mut candidates = self.dropped_items(spec);
        candidates.sort_by_key(|candidate| candidate.id);
        closest_by(
            candidates,
            origin,
            |candidate| candidate.position,
            |candidate| {
                candidate.is_alive()
                    && spec.matches(&candidate.kind)
                    && !exclude.contains(candidate.id)
            },
        )
    }
}

/// Agent state visible to the task.
pub trait AgentView {
    fn position(&self) -> Vec3;

    /// Monotonic world clock, in ticks.
    fn tick(&self) -> u64;

    fn sample(&self) -> ProgressSample {
        ProgressSample::new(self.tick(), self.position())
    }
}

/// Inventory management side task.
pub trait InventoryProbe {
    /// Try to make room in the inventory. Returns true if capacity is available.
    fn ensure_free(&mut self) -> bool;
}

/// Everything the orchestrator needs from the world in one bound.
pub trait World: EntityTracker + AgentView + InventoryProbe {}

impl<T: EntityTracker + AgentView + InventoryProbe + ?Sized> World for T {}

/// User-facing diagnostics sink. Fire-and-forget.
pub trait Diagnostics {
    fn message(&mut self, text: &str);
    fn warning(&mut self, text: &str);
}

/// Diagnostics sink that forwards to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn message(&mut self, text: &str) {
        info!(target: "acquire::diagnostics", "{text}");
    }

    fn warning(&mut self, text: &str) {
        warn!(target: "acquire::diagnostics", "{text}");
    }
}
