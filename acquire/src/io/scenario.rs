//! Scenario file parsing and validation.
//!
//! Scenarios are TOML files describing the agent, its inventory, the drops
//! lying around, blocked zones and the pickup task to run.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{ItemKind, PickupSpec, Vec3};
use crate::sim::{BlockedZone, Inventory, SimWorld, SimulationConfig};

/// A parsed scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub agent: AgentSection,
    #[serde(default)]
    pub inventory: InventorySection,
    #[serde(default)]
    pub items: Vec<ItemSection>,
    #[serde(default)]
    pub blocked: Vec<BlockedZone>,
    pub task: PickupSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSection {
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySection {
    /// Number of slots; each distinct item kind occupies one.
    pub capacity: usize,
    /// Kinds that may be thrown away to make room.
    pub throwaway: Vec<ItemKind>,
    pub contents: BTreeMap<ItemKind, u32>,
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            capacity: 36,
            throwaway: Vec::new(),
            contents: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSection {
    pub kind: ItemKind,
    pub position: Vec3,
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let scenario: Scenario =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("validate {}", path.display()))?;
        debug!(
            path = %path.display(),
            items = scenario.items.len(),
            blocked = scenario.blocked.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.agent.position.is_finite() {
            bail!("agent.position must be finite");
        }
        if self.inventory.capacity == 0 {
            bail!("inventory.capacity must be > 0");
        }
        for (idx, item) in self.items.iter().enumerate() {
            if item.kind.as_str().trim().is_empty() {
                bail!("items[{}].kind must not be empty", idx);
            }
            if !item.position.is_finite() {
                bail!("items[{}].position must be finite", idx);
            }
        }
        for (idx, zone) in self.blocked.iter().enumerate() {
            if !(zone.radius.is_finite() && zone.radius > 0.0) || !zone.center.is_finite() {
                bail!("blocked[{}] must have a finite center and radius > 0", idx);
            }
            if zone.contains(self.agent.position) {
                bail!("blocked[{}] contains the agent start position", idx);
            }
        }
        Ok(())
    }

    /// Build the simulated world. Items receive ids `1..=n` in file order.
    pub fn build_world(&self, config: &SimulationConfig) -> SimWorld {
        let mut inventory = Inventory::new(
            self.inventory.capacity,
            self.inventory.throwaway.iter().cloned(),
        );
        for (kind, count) in &self.inventory.contents {
            inventory.insert(kind.clone(), *count);
        }

        let mut world = SimWorld::new(self.agent.position, inventory, config.clone());
        for item in &self.items {
            world.spawn_item(item.kind.clone(), item.position);
        }
        for zone in &self.blocked {
            world.add_blocked(*zone);
        }
        world
    }
}
