use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};

use crate::error::ConfigError;

pub const ENV_CONFIG: &str = "SCHED_MODEL_CONFIG";
pub const ENV_TICK_MS: &str = "SCHED_MODEL_TICK_MS";
pub const ENV_SEED: &str = "SCHED_MODEL_SEED";
pub const ENV_ANIMATE: &str = "SCHED_MODEL_ANIMATE";

/// Parameters of the random workload generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Ticks over which arrivals are drawn.
    pub ticks: u64,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: u64,
    pub long_burst: u64,
    pub max_priority: u64,
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            ticks: 20,
            p_arrival: 0.3,
            p_short: 0.5,
            short_burst: 2,
            long_burst: 6,
            max_priority: 5,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Draw the progress bars after each run.
    pub animate: bool,
    /// Wall-clock delay per simulated tick while animating.
    pub tick_delay_ms: u64,
    pub workload: WorkloadConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            animate: true,
            tick_delay_ms: 150,
            workload: WorkloadConfig::default(),
        }
    }
}

impl SimConfig {
    /// Reads `path` if given, then applies the `SCHED_MODEL_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(ENV_TICK_MS) {
            self.tick_delay_ms = parse_env(ENV_TICK_MS, value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.workload.seed = parse_env(ENV_SEED, value)?;
        }
        if let Some(value) = lookup(ENV_ANIMATE) {
            self.animate = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Env {
                        name: ENV_ANIMATE,
                        value,
                    });
                }
            };
        }
        Ok(())
    }

    /// `None` when the animation is switched off.
    pub fn tick_delay(&self) -> Option<Duration> {
        (self.animate && self.tick_delay_ms > 0).then(|| Duration::from_millis(self.tick_delay_ms))
    }
}

fn parse_env(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "tick_delay_ms": 5, "workload": { "seed": 9 } }"#).unwrap();
        assert_eq!(config.tick_delay_ms, 5);
        assert!(config.animate);
        assert_eq!(config.workload.seed, 9);
        assert_eq!(config.workload.ticks, WorkloadConfig::default().ticks);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SimConfig::default();
        config
            .apply_env(|name| match name {
                ENV_TICK_MS => Some("0".into()),
                ENV_SEED => Some(" 42 ".into()),
                ENV_ANIMATE => Some("off".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.tick_delay_ms, 0);
        assert_eq!(config.workload.seed, 42);
        assert!(!config.animate);
        assert_eq!(config.tick_delay(), None);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = SimConfig::default();
        let err = config
            .apply_env(|name| (name == ENV_SEED).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: ENV_SEED, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::load(Some(Path::new("/nonexistent/sched_model.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(SimConfig::default().tick_delay(), Some(Duration::from_millis(150)));
    }
}
