//! Shared deterministic types for acquisition core logic.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Position in world space (`y` is up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance_squared(self, other: Vec3) -> f64 {
        let d = self - other;
        d.x * d.x + d.y * d.y + d.z * d.z
    }

    pub fn distance(self, other: Vec3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Move toward `goal` by at most `max_step`, never overshooting.
    pub fn step_toward(self, goal: Vec3, max_step: f64) -> Vec3 {
        let delta = goal - self;
        let len = delta.length();
        if len <= max_step || len == 0.0 {
            return goal;
        }
        self + delta * (max_step / len)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Stable identity of a world object for its whole lifetime in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Item kind identifier (e.g. `diamond`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKind(String);

impl ItemKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One filter of a [`TargetSpec`]: an item kind and how many of it are wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTarget {
    pub kind: ItemKind,
    pub count: u32,
}

impl ItemTarget {
    pub fn new(kind: impl Into<String>, count: u32) -> Self {
        Self {
            kind: ItemKind::new(kind),
            count,
        }
    }
}

impl fmt::Display for ItemTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.kind, self.count)
    }
}

/// Ordered, non-empty list of item filters.
///
/// Equality is element-wise and order-sensitive; matching ignores order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemTarget>", into = "Vec<ItemTarget>")]
pub struct TargetSpec(Vec<ItemTarget>);

impl TargetSpec {
    pub fn new(targets: Vec<ItemTarget>) -> Result<Self, String> {
        if targets.is_empty() {
            return Err("target spec must contain at least one item target".to_string());
        }
        if let Some(target) = targets.iter().find(|t| t.kind.as_str().trim().is_empty()) {
            return Err(format!("item target '{}' has an empty kind", target));
        }
        Ok(Self(targets))
    }

    pub fn single(kind: impl Into<String>, count: u32) -> Self {
        Self(vec![ItemTarget::new(kind, count)])
    }

    pub fn targets(&self) -> &[ItemTarget] {
        &self.0
    }

    /// True if `kind` is named by any filter.
    pub fn matches(&self, kind: &ItemKind) -> bool {
        self.0.iter().any(|target| &target.kind == kind)
    }
}

impl TryFrom<Vec<ItemTarget>> for TargetSpec {
    type Error = String;

    fn try_from(targets: Vec<ItemTarget>) -> Result<Self, Self::Error> {
        TargetSpec::new(targets)
    }
}

impl From<TargetSpec> for Vec<ItemTarget> {
    fn from(spec: TargetSpec) -> Self {
        spec.0
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, target) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", target)?;
        }
        f.write_str("]")
    }
}

/// Live world object eligible for pursuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: EntityId,
    pub kind: ItemKind,
    pub position: Vec3,
    pub alive: bool,
}

impl Candidate {
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Agent position observed at a world tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSample {
    pub tick: u64,
    pub position: Vec3,
}

impl ProgressSample {
    pub fn new(tick: u64, position: Vec3) -> Self {
        Self { tick, position }
    }
}

/// Specification-level payload of a pickup task; the only state that
/// participates in task equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickupSpec {
    pub targets: TargetSpec,
    #[serde(default)]
    pub free_inventory_if_full: bool,
}

/// Kinds of tasks this crate hands to the surrounding task engine.
///
/// The engine deduplicates tasks across re-evaluation by comparing kinds
/// structurally; run-specific state never appears here.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    PickupDroppedItems(PickupSpec),
    GetToEntity { target: EntityId },
    TimeoutWander { distance: f64 },
}

/// Result of one orchestrator tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Recovery maneuver owns movement this tick.
    Recovering { goal: Vec3 },
    /// Approach sub-task is moving toward the current target.
    Pursuing { target: EntityId, goal: Vec3 },
    /// Approach sub-task reached the current target.
    Reached { target: EntityId },
    /// No valid candidate exists; the task cannot advance this tick.
    NoCandidate,
}

impl TickOutcome {
    /// Movement goal requested from the agent, if any.
    pub fn goal(&self) -> Option<Vec3> {
        match self {
            TickOutcome::Recovering { goal } | TickOutcome::Pursuing { goal, .. } => Some(*goal),
            TickOutcome::Reached { .. } | TickOutcome::NoCandidate => None,
        }
    }
}

/// Coarse orchestrator phase, mainly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPhase {
    /// Not started, or stopped by the task engine.
    Idle,
    /// Started but no candidate is being pursued.
    Selecting,
    /// Approach sub-task owns movement.
    Pursuing,
    /// Recovery maneuver owns movement.
    Recovering,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_clamps_at_goal() {
        let start = Vec3::ZERO;
        let goal = Vec3::new(0.5, 0.0, 0.0);
        assert_eq!(start.step_toward(goal, 1.0), goal);

        let far = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(start.step_toward(far, 2.0), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn target_spec_rejects_empty_list() {
        let err = TargetSpec::new(Vec::new()).expect_err("empty spec");
        assert!(err.contains("at least one"));
    }

    #[test]
    fn target_spec_equality_is_order_sensitive_but_matching_is_not() {
        let ab = TargetSpec::new(vec![ItemTarget::new("a", 1), ItemTarget::new("b", 2)])
            .expect("spec");
        let ba = TargetSpec::new(vec![ItemTarget::new("b", 2), ItemTarget::new("a", 1)])
            .expect("spec");
        assert_ne!(ab, ba);
        assert!(ab.matches(&ItemKind::new("b")));
        assert!(ba.matches(&ItemKind::new("a")));
        assert!(!ab.matches(&ItemKind::new("c")));
    }

    #[test]
    fn target_spec_display_lists_targets() {
        let spec = TargetSpec::new(vec![ItemTarget::new("dirt", 4), ItemTarget::new("log", 1)])
            .expect("spec");
        assert_eq!(spec.to_string(), "[dirt x 4, log x 1]");
    }

    #[test]
    fn target_spec_deserializes_from_list() {
        let spec: TargetSpec =
            serde_json::from_str(r#"[{"kind":"diamond","count":3}]"#).expect("parse");
        assert_eq!(spec, TargetSpec::single("diamond", 3));

        let err = serde_json::from_str::<TargetSpec>("[]").expect_err("empty");
        assert!(err.to_string().contains("at least one"));
    }
}
