use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use solace_core::defaults::{
    CRISIS_BUDGET_MS, NEAR_BUDGET_RATIO, PREEMPT_THRESHOLD, PROPAGATION_BUDGET_MS,
};

use crate::error::ConfigError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const ENV_CRISIS_BUDGET_MS: &str = "SOLACE_CRISIS_BUDGET_MS";
pub const ENV_PROPAGATION_BUDGET_MS: &str = "SOLACE_PROPAGATION_BUDGET_MS";
pub const ENV_PREEMPT_THRESHOLD: &str = "SOLACE_PREEMPT_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub crisis_budget_ms: u64,
    pub propagation_budget_ms: u64,
    pub preempt_threshold: i32,
    /// Added in v1.
    pub near_budget_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            crisis_budget_ms: CRISIS_BUDGET_MS,
            propagation_budget_ms: PROPAGATION_BUDGET_MS,
            preempt_threshold: PREEMPT_THRESHOLD,
            near_budget_ratio: NEAR_BUDGET_RATIO,
        }
    }
}

impl EngineConfig {
    pub fn crisis_budget(&self) -> Duration {
        Duration::from_millis(self.crisis_budget_ms)
    }

    pub fn propagation_budget(&self) -> Duration {
        Duration::from_millis(self.propagation_budget_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crisis_budget_ms == 0 {
            return Err(ConfigError::Invalid("crisis_budget_ms must be positive".into()));
        }
        if self.propagation_budget_ms == 0 {
            return Err(ConfigError::Invalid(
                "propagation_budget_ms must be positive".into(),
            ));
        }
        if self.preempt_threshold < 1 {
            return Err(ConfigError::Invalid(format!(
                "preempt_threshold must be at least 1, got {}",
                self.preempt_threshold
            )));
        }
        if !(self.near_budget_ratio > 0.0 && self.near_budget_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "near_budget_ratio must be in (0, 1], got {}",
                self.near_budget_ratio
            )));
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparsable values are errors.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_CRISIS_BUDGET_MS) {
            self.crisis_budget_ms = parse_env(ENV_CRISIS_BUDGET_MS, value)?;
        }
        if let Some(value) = lookup(ENV_PROPAGATION_BUDGET_MS) {
            self.propagation_budget_ms = parse_env(ENV_PROPAGATION_BUDGET_MS, value)?;
        }
        if let Some(value) = lookup(ENV_PREEMPT_THRESHOLD) {
            self.preempt_threshold = parse_env(ENV_PREEMPT_THRESHOLD, value)?;
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value,
    })
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("solace").join("engine.json"))
}

pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let raw_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let on_disk_version =
        u32::try_from(raw_version).map_err(|_| ConfigError::UnsupportedVersion {
            found: raw_version,
            supported: CURRENT_VERSION,
        })?;

    let migrated = migrate(json, on_disk_version)?;
    let config: EngineConfig = serde_json::from_value(migrated)?;
    config.validate()?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, ConfigError> {
    if from_version > CURRENT_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: u64::from(from_version),
            supported: CURRENT_VERSION,
        });
    }

    // v0 → v1: add near_budget_ratio
    if from_version < 1 {
        let obj = json.as_object_mut().ok_or(ConfigError::NotAnObject)?;
        obj.entry("near_budget_ratio")
            .or_insert(serde_json::json!(NEAR_BUDGET_RATIO));
        obj.insert("config_version".to_string(), serde_json::json!(1));
        tracing::info!("migrated engine config v0 → v1 (added near_budget_ratio)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &EngineConfig) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "engine config saved");
    Ok(())
}
