//! error.rs — Error taxonomy for the simulator library
//!
//! Nothing here is fatal to the process: fleet errors degrade to the
//! built-in fleet, setup errors keep the operator at the current stage,
//! and infeasible drones are a `MissionPlan` outcome rather than an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("could not read fleet file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV fleet: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed TOML fleet: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("malformed JSON fleet: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported fleet file format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid drone '{model}': {field} {reason}")]
    Validation {
        model: String,
        field: &'static str,
        reason: String,
    },
    #[error("fleet has no usable drones")]
    Empty,
}

#[derive(Error, Debug, PartialEq)]
pub enum SetupError {
    #[error("location '{0}' not found")]
    NotFound(String),
    #[error("set a base before choosing a target")]
    NoBase,
    #[error("wind must be a finite, non-negative speed, got {0}")]
    BadWind(f64),
}

#[derive(Error, Debug, PartialEq)]
pub enum SimError {
    #[error("tick count must be at least 2, got {0}")]
    TooFewTicks(usize),
    #[error("acceleration step must be positive and finite, got {0}")]
    BadAccelStep(f64),
}
