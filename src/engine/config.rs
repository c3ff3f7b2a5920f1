// Simulation settings, loaded from TOML and overridable from the command line.

use glam::Vec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::error::SwimError;
use super::swimmer::SpeedJitter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Swim(#[from] SwimError),
}

/// Everything the headless school demo needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of fish to spawn.
    pub fish_count: usize,
    /// Cruising speed shared by every fish, world units per second.
    pub base_speed: f32,
    /// Seed for spawning and wandering. Same seed, same run.
    pub seed: u64,
    /// Fixed tick rate in Hz.
    pub tick_rate_hz: f32,
    /// Simulated seconds to run before exiting.
    pub duration_secs: f32,
    /// How often to log school stats, in simulated seconds.
    pub stats_interval_secs: f32,
    /// Container position the fish wander around.
    pub anchor: Vec3,
    pub speed_jitter: SpeedJitter,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fish_count: 20,
            base_speed: 10.0,
            seed: 0,
            tick_rate_hz: 50.0,
            duration_secs: 60.0,
            stats_interval_secs: 1.0,
            anchor: Vec3::ZERO,
            speed_jitter: SpeedJitter::default(),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_speed.is_finite() || self.base_speed < 0.0 {
            return Err(SwimError::InvalidSpeed(self.base_speed).into());
        }
        self.speed_jitter.validate()?;
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            )));
        }
        if !(self.duration_secs.is_finite() && self.duration_secs >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "duration_secs must be non-negative, got {}",
                self.duration_secs
            )));
        }
        if !(self.stats_interval_secs.is_finite() && self.stats_interval_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stats_interval_secs must be positive, got {}",
                self.stats_interval_secs
            )));
        }
        if !self.anchor.is_finite() {
            return Err(ConfigError::Invalid("anchor must be finite".into()));
        }
        Ok(())
    }

    /// Fixed ticks needed to cover `duration_secs`.
    pub fn total_ticks(&self) -> u64 {
        (self.duration_secs * self.tick_rate_hz).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(SimConfig::from_toml("").unwrap(), SimConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = SimConfig::from_toml(
            r#"
            fish_count = 3
            base_speed = 4.5
            seed = 99
            anchor = [1.0, 2.0, 3.0]

            [speed_jitter]
            min = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.fish_count, 3);
        assert_eq!(config.base_speed, 4.5);
        assert_eq!(config.seed, 99);
        assert_eq!(config.anchor, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.speed_jitter, SpeedJitter { min: 0.8, max: 1.5 });
        assert_eq!(config.tick_rate_hz, 50.0);
    }

    #[rstest]
    #[case("base_speed = -2.0")]
    #[case("tick_rate_hz = 0.0")]
    #[case("duration_secs = -1.0")]
    #[case("stats_interval_secs = 0.0")]
    #[case("[speed_jitter]\nmin = 2.0\nmax = 1.0")]
    fn invalid_values_are_rejected(#[case] text: &str) {
        assert!(SimConfig::from_toml(text).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(SimConfig::from_toml("fish_count = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn total_ticks_covers_duration() {
        let config = SimConfig { duration_secs: 2.0, tick_rate_hz: 50.0, ..SimConfig::default() };
        assert_eq!(config.total_ticks(), 100);
    }
}
