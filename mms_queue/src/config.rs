//! Run configuration
//!
//! A [`SimulationConfig`] describes one M/M/s system. A [`RunConfig`] is the
//! on-disk TOML form used by the binary: a horizon, an optional output
//! directory and any number of named scenarios.
//!
//! ```toml
//! horizon = 1000.0
//! output_dir = "results"
//!
//! [[scenario]]
//! name = "pooled"
//! seed = 1
//! inter_arrival_mean = 1.0
//! service_mean = 11.0
//! server_count = 11
//! mode = "single"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Leading weights may overshoot 1 by this much before it counts as an error.
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// How arriving customers pick a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum QueueingMode {
    /// One queue shared by every server
    Single,
    /// One queue per server, chosen from a weight vector
    Random,
    /// One queue per server, join the shortest
    Shortest,
}

impl QueueingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueingMode::Single => "single",
            QueueingMode::Random => "random",
            QueueingMode::Shortest => "shortest",
        }
    }

    /// Number of queues a system with `server_count` servers has under this mode
    pub fn queue_count(&self, server_count: usize) -> usize {
        match self {
            QueueingMode::Single => 1,
            QueueingMode::Random | QueueingMode::Shortest => server_count,
        }
    }
}

impl fmt::Display for QueueingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(QueueingMode::Single),
            "random" => Ok(QueueingMode::Random),
            "shortest" => Ok(QueueingMode::Shortest),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for QueueingMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parameters of a single M/M/s system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Mean time between arrivals (IAT)
    pub inter_arrival_mean: f64,
    /// Mean service duration (ST)
    pub service_mean: f64,
    pub server_count: usize,
    pub mode: QueueingMode,
    /// Queue weights for random mode; uniform when absent
    pub weights: Option<Vec<f64>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 0,
            inter_arrival_mean: 3.0,
            service_mean: 8.0,
            server_count: 3,
            mode: QueueingMode::Shortest,
            weights: None,
        }
    }
}

impl SimulationConfig {
    pub fn new(
        seed: u64,
        inter_arrival_mean: f64,
        service_mean: f64,
        server_count: usize,
        mode: QueueingMode,
    ) -> Self {
        SimulationConfig {
            seed,
            inter_arrival_mean,
            service_mean,
            server_count,
            mode,
            weights: None,
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn queue_count(&self) -> usize {
        self.mode.queue_count(self.server_count)
    }

    /// Check every parameter; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_mean("inter-arrival mean", self.inter_arrival_mean)?;
        check_mean("service mean", self.service_mean)?;
        if self.server_count == 0 {
            return Err(ConfigError::NoServers);
        }
        if self.mode == QueueingMode::Random {
            self.queue_weights()?;
        }
        Ok(())
    }

    /// Normalised queue weights for random mode
    ///
    /// Missing weights default to uniform. The last weight is always
    /// replaced by `1 - sum(others)` so the vector sums to one.
    pub fn queue_weights(&self) -> Result<Vec<f64>, ConfigError> {
        let queue_count = self.queue_count();
        let mut weights = match &self.weights {
            Some(weights) => {
                if weights.len() != queue_count {
                    return Err(ConfigError::WeightCount {
                        expected: queue_count,
                        found: weights.len(),
                    });
                }
                if let Some((index, &value)) = weights
                    .iter()
                    .enumerate()
                    .find(|(_, w)| !w.is_finite() || **w < 0.0)
                {
                    return Err(ConfigError::InvalidWeight { index, value });
                }
                weights.clone()
            }
            None => vec![1.0 / queue_count as f64; queue_count],
        };

        let Some((last, leading)) = weights.split_last_mut() else {
            return Err(ConfigError::NoServers);
        };
        let sum: f64 = leading.iter().sum();
        if sum > 1.0 + WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightsExceedOne { sum });
        }
        *last = (1.0 - sum).max(0.0);
        Ok(weights)
    }
}

fn check_mean(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveMean { name, value })
    }
}

/// A named system to simulate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub config: SimulationConfig,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: SimulationConfig) -> Self {
        Scenario {
            name: name.into(),
            config,
        }
    }
}

/// Contents of a run file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Simulated time at which every scenario stops
    pub horizon: f64,
    /// Where CSV/JSON results go; nothing is written when absent
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(rename = "scenario", default)]
    pub scenarios: Vec<Scenario>,
}

impl Default for RunConfig {
    /// Pooled versus dedicated queues on an 11-server system at ρ = 1
    fn default() -> Self {
        let base = SimulationConfig::new(1, 1.0, 11.0, 11, QueueingMode::Single);
        let mut skewed = vec![0.05; 11];
        skewed[0] = 0.5;

        RunConfig {
            horizon: 1000.0,
            output_dir: None,
            scenarios: vec![
                Scenario::new("single", base.clone()),
                Scenario::new(
                    "shortest",
                    SimulationConfig {
                        mode: QueueingMode::Shortest,
                        ..base.clone()
                    },
                ),
                Scenario::new(
                    "random-uniform",
                    SimulationConfig {
                        mode: QueueingMode::Random,
                        ..base.clone()
                    },
                ),
                Scenario::new(
                    "random-skewed",
                    SimulationConfig {
                        mode: QueueingMode::Random,
                        ..base
                    }
                    .with_weights(skewed),
                ),
            ],
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> Result<RunConfig> {
        let config: RunConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(ConfigError::InvalidHorizon(self.horizon));
        }
        for scenario in &self.scenarios {
            scenario.config.validate()?;
        }
        Ok(())
    }
}
