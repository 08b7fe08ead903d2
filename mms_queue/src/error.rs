//! Error types for configuring, running and reporting a simulation

use thiserror::Error;

pub use des::EmptyTableError;

/// Invalid construction parameters
///
/// Raised once, when a [`crate::Simulation`] is built. A simulation is never
/// created from a configuration that fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown queueing mode '{0}' (expected single, random or shortest)")]
    UnknownMode(String),

    #[error("{name} must be a positive finite number, got {value}")]
    NonPositiveMean { name: &'static str, value: f64 },

    #[error("server count must be at least 1")]
    NoServers,

    #[error("expected {expected} queue weights, got {found}")]
    WeightCount { expected: usize, found: usize },

    #[error("queue weight {index} is invalid: {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("queue weights sum to {sum}, leaving nothing for the last queue")]
    WeightsExceedOne { sum: f64 },

    #[error("queue weights cannot be sampled: {0}")]
    UnusableWeights(String),

    #[error("horizon must be a non-negative finite time, got {0}")]
    InvalidHorizon(f64),
}

/// Too few served customers for the requested measure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{measure} needs at least {required} observations, have {found}")]
pub struct InsufficientDataError {
    pub measure: &'static str,
    pub required: usize,
    pub found: usize,
}

/// Umbrella error for the configuration loader, engine and exporters
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    EmptyTable(#[from] EmptyTableError),

    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse run file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
