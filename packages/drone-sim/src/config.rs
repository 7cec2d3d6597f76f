//! config.rs — `config.toml` structure
//!
//! Every section and key is optional; missing ones take the defaults below,
//! which match the embedded `config.toml`.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::geo::PlaceBook;
use crate::ranking::RankPolicy;
use crate::tick_sim::{SimSettings, DEFAULT_ACCEL_STEP_MPH, DEFAULT_TICK_COUNT, IDLE_DURATION_SECONDS};
use crate::weather::DEFAULT_MAX_WIND_MPH;

/// Shipped defaults, used when no config file is found.
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FullConfig {
    pub simulation: SimulationConfig,
    pub mission: MissionConfig,
    pub weather: WeatherConfig,
    pub telemetry: TelemetryConfig,
    /// Named points: `name = [lat, lon]`
    pub places: HashMap<String, [f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_count: usize,
    /// Real-time delay between rendered ticks
    pub tick_interval_ms: u64,
    pub accel_step_mph: f64,
    pub idle_duration_s: f64,
    pub rank_policy: RankPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_count: DEFAULT_TICK_COUNT,
            tick_interval_ms: 160,
            accel_step_mph: DEFAULT_ACCEL_STEP_MPH,
            idle_duration_s: IDLE_DURATION_SECONDS,
            rank_policy: RankPolicy::FastestFirst,
        }
    }
}

impl SimulationConfig {
    pub fn settings(&self) -> SimSettings {
        SimSettings {
            tick_count: self.tick_count,
            accel_step_mph: self.accel_step_mph,
            idle_duration_seconds: self.idle_duration_s,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub burst: bool,
    pub fleet_path: Option<PathBuf>,
    pub base: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub max_wind_mph: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { max_wind_mph: DEFAULT_MAX_WIND_MPH }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// 0 disables the WebSocket feed
    pub ws_port: u16,
}

impl FullConfig {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn place_book(&self) -> PlaceBook {
        PlaceBook::from_pairs(self.places.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}
