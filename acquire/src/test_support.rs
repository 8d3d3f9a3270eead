//! Test-only helpers: candidate builders, scripted collaborators and scenario files.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::approach::ApproachConfig;
use crate::core::progress::{ProgressConfig, ProgressResetPolicy};
use crate::core::recovery::RecoveryConfig;
use crate::core::types::{Candidate, EntityId, ItemKind, PickupSpec, TargetSpec, Vec3};
use crate::task::TaskConfig;
use crate::world::{AgentView, Diagnostics, EntityTracker, InventoryProbe};

/// Alive candidate of `kind` at `(x, 0, 0)`.
pub fn item(id: u64, kind: &str, x: f64) -> Candidate {
    Candidate {
        id: EntityId(id),
        kind: ItemKind::new(kind),
        position: Vec3::new(x, 0.0, 0.0),
        alive: true,
    }
}

/// Single-target pickup spec.
pub fn pickup(kind: &str, count: u32, free_inventory_if_full: bool) -> PickupSpec {
    PickupSpec {
        targets: TargetSpec::single(kind, count),
        free_inventory_if_full,
    }
}

/// Small windows so stalls and recoveries happen within a few ticks:
/// a stationary agent stalls after two 3-tick windows, and a wander lasts at
/// most 10 ticks or 4 blocks.
pub fn fast_config() -> TaskConfig {
    TaskConfig {
        progress: ProgressConfig {
            window_ticks: 3,
            min_distance: 0.1,
            attempts: 2,
            reset_policy: ProgressResetPolicy::OnTargetChange,
        },
        recovery: RecoveryConfig {
            duration_ticks: 10,
            wander_distance: 4.0,
            seed: 1,
        },
        approach: ApproachConfig {
            reach_distance: 1.0,
        },
    }
}

/// Diagnostics sink that records everything it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub messages: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics for RecordingDiagnostics {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn warning(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }
}

/// Inventory probe returning scripted results, then `true` once exhausted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedProbe {
    results: VecDeque<bool>,
}

impl ScriptedProbe {
    pub fn new(results: impl IntoIterator<Item = bool>) -> Self {
        Self {
            results: results.into_iter().collect(),
        }
    }
}

impl InventoryProbe for ScriptedProbe {
    fn ensure_free(&mut self) -> bool {
        self.results.pop_front().unwrap_or(true)
    }
}

/// World whose agent only moves when a test moves it.
///
/// Candidates are returned in insertion order, dead ones included, so tests
/// exercise the selector's own filtering.
#[derive(Debug, Clone)]
pub struct ScriptedWorld {
    pub agent: Vec3,
    pub now: u64,
    pub items: Vec<Candidate>,
    pub probes: u32,
    inventory: ScriptedProbe,
}

impl ScriptedWorld {
    pub fn new(items: Vec<Candidate>) -> Self {
        Self {
            agent: Vec3::ZERO,
            now: 0,
            items,
            probes: 0,
            inventory: ScriptedProbe::default(),
        }
    }

    pub fn advance(&mut self) {
        self.now += 1;
    }

    pub fn advance_by(&mut self, ticks: u64) {
        self.now += ticks;
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.items.push(candidate);
    }

    pub fn kill(&mut self, id: EntityId) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.alive = false;
        }
    }

    pub fn move_item(&mut self, id: EntityId, position: Vec3) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.position = position;
        }
    }

    pub fn script_inventory(&mut self, results: impl IntoIterator<Item = bool>) {
        self.inventory = ScriptedProbe::new(results);
    }
}

impl EntityTracker for ScriptedWorld {
    fn dropped_items(&self, spec: &TargetSpec) -> Vec<Candidate> {
        self.items
            .iter()
            .filter(|item| spec.matches(&item.kind))
            .cloned()
            .collect()
    }

    fn entity(&self, id: EntityId) -> Option<Candidate> {
        self.items.iter().find(|item| item.id == id).cloned()
    }
}

impl AgentView for ScriptedWorld {
    fn position(&self) -> Vec3 {
        self.agent
    }

    fn tick(&self) -> u64 {
        self.now
    }
}

impl InventoryProbe for ScriptedWorld {
    fn ensure_free(&mut self) -> bool {
        self.probes += 1;
        self.inventory.ensure_free()
    }
}

/// Temporary directory holding scenario and config files for CLI tests.
pub struct ScenarioDir {
    temp: TempDir,
}

impl ScenarioDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `contents` to `name` inside the directory.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
