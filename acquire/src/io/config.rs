//! Acquisition configuration stored under `.acquire/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::approach::ApproachConfig;
use crate::core::progress::ProgressConfig;
use crate::core::recovery::RecoveryConfig;
use crate::looping::LoopLimits;
use crate::sim::SimulationConfig;
use crate::task::TaskConfig;

/// Default location of the config file relative to the working directory.
pub const CONFIG_PATH: &str = ".acquire/config.toml";

/// Acquisition configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values the
/// task was tuned with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    pub progress: ProgressConfig,
    pub recovery: RecoveryConfig,
    pub approach: ApproachConfig,
    pub simulation: SimulationConfig,
}

impl AcquireConfig {
    pub fn validate(&self) -> Result<()> {
        self.progress.validate()?;
        self.recovery.validate()?;
        self.approach.validate()?;
        self.simulation.validate()?;
        Ok(())
    }

    pub fn task_config(&self) -> TaskConfig {
        TaskConfig {
            progress: self.progress.clone(),
            recovery: self.recovery.clone(),
            approach: self.approach.clone(),
        }
    }

    pub fn loop_limits(&self) -> LoopLimits {
        LoopLimits {
            max_ticks: self.simulation.max_ticks,
            idle_ticks_limit: self.simulation.idle_ticks_limit,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AcquireConfig::default()`.
pub fn load_config(path: &Path) -> Result<AcquireConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = AcquireConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AcquireConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AcquireConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::ProgressResetPolicy;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, AcquireConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let mut cfg = AcquireConfig::default();
        cfg.progress.reset_policy = ProgressResetPolicy::ExplicitOnly;
        cfg.recovery.seed = 42;
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[progress]\nwindow_ticks = 7\nreset_policy = \"explicit_only\"\n")
            .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.progress.window_ticks, 7);
        assert_eq!(cfg.progress.attempts, ProgressConfig::default().attempts);
        assert_eq!(cfg.progress.reset_policy, ProgressResetPolicy::ExplicitOnly);
        assert_eq!(cfg.simulation, SimulationConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[recovery]\nduration_ticks = 0\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("recovery.duration_ticks"));
    }

    #[test]
    fn validate_reports_first_failing_section() {
        let mut cfg = AcquireConfig::default();
        cfg.simulation.pickup_radius = -1.0;
        let err = cfg.validate().expect_err("negative radius");
        assert_eq!(
            err.to_string(),
            "simulation.pickup_radius must be a finite, non-negative number"
        );
    }
}
