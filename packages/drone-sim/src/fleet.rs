//! fleet.rs — Drone profile sources
//!
//! Reads drone profiles from a CSV fleet sheet, a TOML (`[[drones]]`) file or
//! a JSON file, all using the legacy column names (`speed_mph` = cruise,
//! `max_speed_mph` = burst). CSV headers and cells are whitespace-trimmed.
//! Missing optional columns take defaults, records without a model are
//! dropped, and anything else malformed rejects the file. Callers that must
//! never fail use [`load_fleet_or_default`], which degrades to the built-in
//! three-drone fleet.

use std::path::Path;

use drone_types::DroneSpec;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::FleetError;

pub const DEFAULT_RECHARGE_TIME_MIN: f64 = 60.0;
pub const DEFAULT_BURST_DRAIN_FACTOR: f64 = 1.5;
pub const DEFAULT_MAX_WIND_MPH: f64 = 25.0;

/// Legacy model names and the name they are displayed under
const MODEL_ALIASES: &[(&str, &str)] = &[("Interceptor", "SKYDIO X-10")];

// ── File formats ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetFormat {
    Csv,
    Toml,
    Json,
}

impl FleetFormat {
    pub fn from_path(path: &Path) -> Result<Self, FleetError> {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
            Some(ext) if ext == "csv" => Ok(Self::Csv),
            Some(ext) if ext == "toml" => Ok(Self::Toml),
            Some(ext) if ext == "json" => Ok(Self::Json),
            other => Err(FleetError::UnsupportedFormat(other.unwrap_or_default())),
        }
    }
}

/// One fleet record as written in the file. Every column is optional here;
/// validation decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawDrone {
    model: Option<String>,
    flight_time_min: Option<f64>,
    speed_mph: Option<f64>,
    max_speed_mph: Option<f64>,
    range_miles: Option<f64>,
    recharge_time_min: Option<f64>,
    burst_drain_factor: Option<f64>,
    max_wind_mph: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FleetFile {
    #[serde(default)]
    drones: Vec<RawDrone>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonFleet {
    List(Vec<RawDrone>),
    Wrapped(FleetFile),
}

// ── Built-in fleet ────────────────────────────────────────────────────────────

/// Scout, Heavy-Lift, and the fast X-10 interceptor.
pub fn builtin_fleet() -> Vec<DroneSpec> {
    vec![
        DroneSpec {
            model: "Scout".into(),
            cruise_speed_mph: 22.0,
            burst_speed_mph: 35.0,
            flight_time_min: 25.0,
            range_miles: 6.0,
            burst_drain_factor: 1.2,
            max_wind_mph: 25.0,
            recharge_time_min: 45.0,
        },
        DroneSpec {
            model: "Heavy-Lift".into(),
            cruise_speed_mph: 18.0,
            burst_speed_mph: 25.0,
            flight_time_min: 40.0,
            range_miles: 9.0,
            burst_drain_factor: 1.3,
            max_wind_mph: 30.0,
            recharge_time_min: 60.0,
        },
        DroneSpec {
            model: "SKYDIO X-10".into(),
            cruise_speed_mph: 55.0,
            burst_speed_mph: 80.0,
            flight_time_min: 15.0,
            range_miles: 5.0,
            burst_drain_factor: 1.5,
            max_wind_mph: 40.0,
            recharge_time_min: 30.0,
        },
    ]
}

// ── Parsing & validation ──────────────────────────────────────────────────────

fn require_positive(model: &str, field: &'static str, value: Option<f64>) -> Result<f64, FleetError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(FleetError::Validation {
            model: model.to_string(),
            field,
            reason: format!("must be a positive number, got {v}"),
        }),
        None => Err(FleetError::Validation {
            model: model.to_string(),
            field,
            reason: "is missing".into(),
        }),
    }
}

fn at_least(model: &str, field: &'static str, value: f64, min: f64) -> Result<f64, FleetError> {
    if value.is_finite() && value >= min {
        Ok(value)
    } else {
        Err(FleetError::Validation {
            model: model.to_string(),
            field,
            reason: format!("must be at least {min}, got {value}"),
        })
    }
}

fn display_model(raw: &str) -> String {
    let trimmed = raw.trim();
    MODEL_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == trimmed)
        .map(|(_, shown)| shown.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn validate(raw: RawDrone, model: String) -> Result<DroneSpec, FleetError> {
    let m = model.as_str();
    Ok(DroneSpec {
        flight_time_min: require_positive(m, "flight_time_min", raw.flight_time_min)?,
        cruise_speed_mph: require_positive(m, "speed_mph", raw.speed_mph)?,
        burst_speed_mph: require_positive(m, "max_speed_mph", raw.max_speed_mph)?,
        range_miles: require_positive(m, "range_miles", raw.range_miles)?,
        recharge_time_min: at_least(
            m,
            "recharge_time_min",
            raw.recharge_time_min.unwrap_or(DEFAULT_RECHARGE_TIME_MIN),
            0.0,
        )?,
        burst_drain_factor: at_least(
            m,
            "burst_drain_factor",
            raw.burst_drain_factor.unwrap_or(DEFAULT_BURST_DRAIN_FACTOR),
            1.0,
        )?,
        max_wind_mph: at_least(m, "max_wind_mph", raw.max_wind_mph.unwrap_or(DEFAULT_MAX_WIND_MPH), 0.0)?,
        model,
    })
}

fn validate_all(records: Vec<RawDrone>) -> Result<Vec<DroneSpec>, FleetError> {
    let mut fleet = Vec::with_capacity(records.len());
    for (idx, mut raw) in records.into_iter().enumerate() {
        let model = match raw.model.take().filter(|m| !m.trim().is_empty()) {
            Some(m) => display_model(&m),
            None => {
                warn!("Fleet: record {idx} has no model, skipped");
                continue;
            }
        };
        fleet.push(validate(raw, model)?);
    }
    if fleet.is_empty() {
        return Err(FleetError::Empty);
    }
    Ok(fleet)
}

pub fn parse_fleet(text: &str, format: FleetFormat) -> Result<Vec<DroneSpec>, FleetError> {
    let records = match format {
        FleetFormat::Csv => csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes())
            .deserialize::<RawDrone>()
            .collect::<Result<Vec<_>, _>>()?,
        FleetFormat::Toml => toml::from_str::<FleetFile>(text)?.drones,
        FleetFormat::Json => match serde_json::from_str::<JsonFleet>(text)? {
            JsonFleet::List(list) => list,
            JsonFleet::Wrapped(file) => file.drones,
        },
    };
    validate_all(records)
}

pub fn load_fleet(path: &Path) -> Result<Vec<DroneSpec>, FleetError> {
    let format = FleetFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| FleetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fleet(&text, format)
}

/// Load the fleet, falling back to [`builtin_fleet`] on any failure.
pub fn load_fleet_or_default(path: Option<&Path>) -> Vec<DroneSpec> {
    let Some(path) = path else {
        info!("No fleet file configured, using built-in fleet");
        return builtin_fleet();
    };
    match load_fleet(path) {
        Ok(fleet) => {
            info!("Loaded {} drones from {}", fleet.len(), path.display());
            fleet
        }
        Err(e) => {
            warn!("Fleet: {e}; using built-in fleet");
            builtin_fleet()
        }
    }
}
