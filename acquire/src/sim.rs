//! Deterministic in-memory world for driving the pickup task.
//!
//! The agent walks in straight lines toward whatever goal the task requests.
//! Blocked zones are spheres the agent cannot enter, which makes drops inside
//! them unreachable. There is no pathfinding.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::types::{Candidate, EntityId, ItemKind, TargetSpec, TickOutcome, Vec3};
use crate::world::{AgentView, EntityTracker, InventoryProbe};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Agent movement per tick.
    pub speed: f64,
    /// Drops within this distance of the agent are collected automatically.
    pub pickup_radius: f64,
    /// Give up after this many ticks.
    pub max_ticks: u64,
    /// Stop once no candidate has been found for this many consecutive ticks.
    pub idle_ticks_limit: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pickup_radius: 1.5,
            max_ticks: 2_000,
            idle_ticks_limit: 40,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            bail!("simulation.speed must be a finite number > 0");
        }
        if !(self.pickup_radius.is_finite() && self.pickup_radius >= 0.0) {
            bail!("simulation.pickup_radius must be a finite, non-negative number");
        }
        if self.max_ticks == 0 {
            bail!("simulation.max_ticks must be > 0");
        }
        if self.idle_ticks_limit == 0 {
            bail!("simulation.idle_ticks_limit must be > 0");
        }
        Ok(())
    }
}

/// Sphere the agent cannot enter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockedZone {
    pub center: Vec3,
    pub radius: f64,
}

impl BlockedZone {
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance(point) < self.radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimItem {
    pub kind: ItemKind,
    pub position: Vec3,
    pub alive: bool,
}

/// Slot-based inventory: one slot per distinct item kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    capacity: usize,
    stacks: BTreeMap<ItemKind, u32>,
    throwaway: BTreeSet<ItemKind>,
}

impl Inventory {
    pub fn new(capacity: usize, throwaway: impl IntoIterator<Item = ItemKind>) -> Self {
        Self {
            capacity,
            stacks: BTreeMap::new(),
            throwaway: throwaway.into_iter().collect(),
        }
    }

    pub fn count(&self, kind: &ItemKind) -> u32 {
        self.stacks.get(kind).copied().unwrap_or(0)
    }

    pub fn is_full(&self) -> bool {
        self.stacks.len() >= self.capacity
    }

    pub fn can_accept(&self, kind: &ItemKind) -> bool {
        self.stacks.contains_key(kind) || !self.is_full()
    }

    /// Add items regardless of capacity (initial contents).
    pub fn insert(&mut self, kind: ItemKind, count: u32) {
        if count == 0 {
            return;
        }
        *self.stacks.entry(kind).or_insert(0) += count;
    }

    /// True when every target's count is held.
    pub fn satisfies(&self, spec: &TargetSpec) -> bool {
        spec.targets()
            .iter()
            .all(|target| self.count(&target.kind) >= target.count)
    }

    /// Throw away one stack of a throwaway kind if the inventory is full.
    fn free_slot(&mut self) -> Option<(ItemKind, u32)> {
        let kind = self
            .throwaway
            .iter()
            .find(|kind| self.stacks.contains_key(*kind))?
            .clone();
        let count = self.stacks.remove(&kind)?;
        Some((kind, count))
    }
}

/// Drop collected by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickupRecord {
    pub tick: u64,
    pub id: EntityId,
    pub kind: ItemKind,
}

#[derive(Debug, Clone)]
pub struct SimWorld {
    config: SimulationConfig,
    now: u64,
    agent: Vec3,
    items: BTreeMap<EntityId, SimItem>,
    blocked: Vec<BlockedZone>,
    inventory: Inventory,
    next_id: u64,
}

impl SimWorld {
    pub fn new(agent: Vec3, inventory: Inventory, config: SimulationConfig) -> Self {
        Self {
            config,
            now: 0,
            agent,
            items: BTreeMap::new(),
            blocked: Vec::new(),
            inventory,
            next_id: 1,
        }
    }

    /// Drop an item into the world. Ids are assigned sequentially from 1.
    pub fn spawn_item(&mut self, kind: ItemKind, position: Vec3) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.items.insert(
            id,
            SimItem {
                kind,
                position,
                alive: true,
            },
        );
        id
    }

    pub fn add_blocked(&mut self, zone: BlockedZone) {
        self.blocked.push(zone);
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn item(&self, id: EntityId) -> Option<&SimItem> {
        self.items.get(&id)
    }

    /// Apply the movement requested by `outcome`, collect drops in range and
    /// advance the clock by one tick.
    pub fn apply(&mut self, outcome: &TickOutcome) -> Vec<PickupRecord> {
        if let Some(goal) = outcome.goal() {
            let next = self.agent.step_toward(goal, self.config.speed);
            if self.blocked.iter().any(|zone| zone.contains(next)) {
                debug!(tick = self.now, position = %self.agent, "movement blocked");
            } else {
                self.agent = next;
            }
        }

        let mut picked = Vec::new();
        for (id, item) in &mut self.items {
            if !item.alive || item.position.distance(self.agent) > self.config.pickup_radius {
                continue;
            }
            if !self.inventory.can_accept(&item.kind) {
                continue;
            }
            item.alive = false;
            self.inventory.insert(item.kind.clone(), 1);
            picked.push(PickupRecord {
                tick: self.now,
                id: *id,
                kind: item.kind.clone(),
            });
        }

        self.now += 1;
        picked
    }
}

impl EntityTracker for SimWorld {
    fn dropped_items(&self, spec: &TargetSpec) -> Vec<Candidate> {
        self.items
            .iter()
            .filter(|(_, item)| item.alive && spec.matches(&item.kind))
            .map(|(id, item)| Candidate {
                id: *id,
                kind: item.kind.clone(),
                position: item.position,
                alive: item.alive,
            })
            .collect()
    }

    fn entity(&self, id: EntityId) -> Option<Candidate> {
        self.items.get(&id).map(|item| Candidate {
            id,
            kind: item.kind.clone(),
            position: item.position,
            alive: item.alive,
        })
    }
}

impl AgentView for SimWorld {
    fn position(&self) -> Vec3 {
        self.agent
    }

    fn tick(&self) -> u64 {
        self.now
    }
}

impl InventoryProbe for SimWorld {
    fn ensure_free(&mut self) -> bool {
        if !self.inventory.is_full() {
            return true;
        }
        match self.inventory.free_slot() {
            Some((kind, count)) => {
                info!(%kind, count, "threw away stack to free inventory");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> SimWorld {
        SimWorld::new(
            Vec3::ZERO,
            Inventory::new(2, [ItemKind::new("dirt")]),
            SimulationConfig::default(),
        )
    }

    #[test]
    fn apply_moves_agent_and_advances_clock() {
        let mut world = world();
        world.apply(&TickOutcome::Recovering {
            goal: Vec3::new(10.0, 0.0, 0.0),
        });
        assert_eq!(world.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.tick(), 1);

        world.apply(&TickOutcome::NoCandidate);
        assert_eq!(world.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.tick(), 2);
    }

    #[test]
    fn blocked_zone_stops_movement() {
        let mut world = world();
        world.add_blocked(BlockedZone {
            center: Vec3::new(2.0, 0.0, 0.0),
            radius: 1.5,
        });
        let goal = TickOutcome::Recovering {
            goal: Vec3::new(10.0, 0.0, 0.0),
        };
        world.apply(&goal);
        assert_eq!(world.position(), Vec3::ZERO);
    }

    #[test]
    fn drops_in_range_are_collected() {
        let mut world = world();
        let id = world.spawn_item(ItemKind::new("diamond"), Vec3::new(2.0, 0.0, 0.0));
        let picked = world.apply(&TickOutcome::Pursuing {
            target: id,
            goal: Vec3::new(2.0, 0.0, 0.0),
        });
        assert_eq!(
            picked,
            vec![PickupRecord {
                tick: 0,
                id,
                kind: ItemKind::new("diamond"),
            }]
        );
        assert_eq!(world.inventory().count(&ItemKind::new("diamond")), 1);
        assert!(world.dropped_items(&TargetSpec::single("diamond", 1)).is_empty());
        assert_eq!(world.entity(id).map(|c| c.alive), Some(false));
    }

    #[test]
    fn full_inventory_leaves_drop_on_ground() {
        let mut world = SimWorld::new(
            Vec3::ZERO,
            Inventory::new(1, Vec::new()),
            SimulationConfig::default(),
        );
        world.inventory.insert(ItemKind::new("stone"), 3);
        world.spawn_item(ItemKind::new("diamond"), Vec3::new(0.5, 0.0, 0.0));

        assert!(world.apply(&TickOutcome::NoCandidate).is_empty());
        assert!(!world.ensure_free());
    }

    #[test]
    fn ensure_free_throws_away_junk() {
        let mut world = SimWorld::new(
            Vec3::ZERO,
            Inventory::new(1, [ItemKind::new("dirt")]),
            SimulationConfig::default(),
        );
        world.inventory.insert(ItemKind::new("dirt"), 12);
        assert!(world.inventory().is_full());
        assert!(world.ensure_free());
        assert_eq!(world.inventory().count(&ItemKind::new("dirt")), 0);
        assert!(!world.inventory().is_full());
    }

    #[test]
    fn inventory_satisfies_all_targets() {
        let mut inventory = Inventory::new(4, Vec::new());
        let spec = TargetSpec::new(vec![
            crate::core::types::ItemTarget::new("a", 2),
            crate::core::types::ItemTarget::new("b", 1),
        ])
        .expect("spec");
        inventory.insert(ItemKind::new("a"), 2);
        assert!(!inventory.satisfies(&spec));
        inventory.insert(ItemKind::new("b"), 1);
        assert!(inventory.satisfies(&spec));
    }
}
