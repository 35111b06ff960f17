//! Configuration system for recall.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RecallError, RecallResult};

/// Lowest ease factor any card may have.
pub const EASE_FACTOR_FLOOR: f64 = 1.3;
/// Longest interval a configuration may allow (about 100 years).
pub const INTERVAL_DAYS_CEILING: u32 = 36_500;
/// Largest due-list size a configuration may allow.
pub const DUE_LIMIT_CEILING: usize = 50;

/// SM-2 constants fed explicitly into the interval calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ease factor of a freshly added card (default: 2.5).
    pub initial_ease_factor: f64,
    /// Interval of a freshly added card in days (default: 1).
    pub initial_interval_days: u32,
    /// Floor for the ease factor (default: 1.3).
    pub minimum_ease_factor: f64,
    /// Interval after the first successful recall (default: 1).
    pub first_interval_days: u32,
    /// Interval after the second successful recall (default: 6).
    pub second_interval_days: u32,
    /// Cap on any computed interval (default: 36500).
    pub maximum_interval_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease_factor: 2.5,
            initial_interval_days: 1,
            minimum_ease_factor: 1.3,
            first_interval_days: 1,
            second_interval_days: 6,
            maximum_interval_days: INTERVAL_DAYS_CEILING,
        }
    }
}

impl SchedulerConfig {
    /// Check that the constants keep the card invariants satisfiable.
    pub fn validate(&self) -> RecallResult<()> {
        if !self.minimum_ease_factor.is_finite() || self.minimum_ease_factor < EASE_FACTOR_FLOOR {
            return Err(RecallError::Configuration(format!(
                "minimum_ease_factor must be >= {}, got {}",
                EASE_FACTOR_FLOOR, self.minimum_ease_factor
            )));
        }
        if !self.initial_ease_factor.is_finite()
            || self.initial_ease_factor < self.minimum_ease_factor
        {
            return Err(RecallError::Configuration(format!(
                "initial_ease_factor {} is below minimum_ease_factor {}",
                self.initial_ease_factor, self.minimum_ease_factor
            )));
        }
        for (name, days) in [
            ("initial_interval_days", self.initial_interval_days),
            ("first_interval_days", self.first_interval_days),
            ("second_interval_days", self.second_interval_days),
        ] {
            if days == 0 {
                return Err(RecallError::Configuration(format!("{} must be >= 1", name)));
            }
            if days > self.maximum_interval_days {
                return Err(RecallError::Configuration(format!(
                    "{} {} exceeds maximum_interval_days {}",
                    name, days, self.maximum_interval_days
                )));
            }
        }
        if self.maximum_interval_days > INTERVAL_DAYS_CEILING {
            return Err(RecallError::Configuration(format!(
                "maximum_interval_days must be <= {}, got {}",
                INTERVAL_DAYS_CEILING, self.maximum_interval_days
            )));
        }
        Ok(())
    }
}

/// How out-of-range quality scores are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityPolicy {
    /// Clamp to 0..=5 and proceed.
    #[default]
    Clamp,
    /// Fail with a validation error.
    Reject,
}

/// How a reviewed card is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Unconditional write; concurrent reviews of one card may lose an answer.
    #[default]
    LastWriteWins,
    /// Write only if the card is unchanged since it was read, else Conflict.
    CompareAndSwap,
}

/// Main engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SM-2 constants.
    pub scheduler: SchedulerConfig,
    /// Out-of-range quality handling.
    pub quality_policy: QualityPolicy,
    /// Review write-back strategy.
    pub write_mode: WriteMode,
    /// Due-list size when the caller gives none (default: 20).
    pub due_limit_default: usize,
    /// Largest due-list size a caller may request (default: 50).
    pub due_limit_max: usize,
    /// SQLite database path.
    pub database_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let recall_dir = dirs::home_dir()
            .map(|h| h.join(".recall"))
            .unwrap_or_else(|| PathBuf::from(".recall"));

        Self {
            scheduler: SchedulerConfig::default(),
            quality_policy: QualityPolicy::default(),
            write_mode: WriteMode::default(),
            due_limit_default: 20,
            due_limit_max: 50,
            database_path: recall_dir.join("vocabulary.db"),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RecallResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RecallError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RecallError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RecallError::Configuration(e.to_string()))?,
            _ => {
                return Err(RecallError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ease) = env_parse::<f64>("RECALL_INITIAL_EASE_FACTOR") {
            config.scheduler.initial_ease_factor = ease;
        }
        if let Some(days) = env_parse::<u32>("RECALL_INITIAL_INTERVAL_DAYS") {
            config.scheduler.initial_interval_days = days;
        }
        if let Some(days) = env_parse::<u32>("RECALL_MAXIMUM_INTERVAL_DAYS") {
            config.scheduler.maximum_interval_days = days;
        }
        if let Ok(policy) = std::env::var("RECALL_QUALITY_POLICY") {
            config.quality_policy = match policy.to_lowercase().as_str() {
                "reject" => QualityPolicy::Reject,
                _ => QualityPolicy::Clamp,
            };
        }
        if let Ok(mode) = std::env::var("RECALL_WRITE_MODE") {
            config.write_mode = match mode.to_lowercase().as_str() {
                "compare_and_swap" | "cas" => WriteMode::CompareAndSwap,
                _ => WriteMode::LastWriteWins,
            };
        }
        if let Some(limit) = env_parse::<usize>("RECALL_DUE_LIMIT_DEFAULT") {
            config.due_limit_default = limit;
        }
        if let Some(limit) = env_parse::<usize>("RECALL_DUE_LIMIT_MAX") {
            config.due_limit_max = limit;
        }
        if let Ok(path) = std::env::var("RECALL_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        config
    }

    /// Check the whole configuration for consistency.
    pub fn validate(&self) -> RecallResult<()> {
        self.scheduler.validate()?;
        if self.due_limit_max == 0 || self.due_limit_max > DUE_LIMIT_CEILING {
            return Err(RecallError::Configuration(format!(
                "due_limit_max must be within 1..={}, got {}",
                DUE_LIMIT_CEILING, self.due_limit_max
            )));
        }
        if self.due_limit_default == 0 || self.due_limit_default > self.due_limit_max {
            return Err(RecallError::Configuration(format!(
                "due_limit_default must be within 1..={}, got {}",
                self.due_limit_max, self.due_limit_default
            )));
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Builder for EngineConfig.
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set SM-2 constants.
    pub fn scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.config.scheduler = scheduler;
        self
    }

    /// Set the quality policy.
    pub fn quality_policy(mut self, policy: QualityPolicy) -> Self {
        self.config.quality_policy = policy;
        self
    }

    /// Set the write mode.
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Set the default and maximum due-list sizes.
    pub fn due_limits(mut self, default: usize, max: usize) -> Self {
        self.config.due_limit_default = default;
        self.config.due_limit_max = max;
        self
    }

    /// Set database path.
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = path.into();
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> RecallResult<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
