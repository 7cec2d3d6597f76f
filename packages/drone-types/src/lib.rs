//! # drone-types
//!
//! Shared data model for the drone sortie simulator.
//!
//! These types are used by:
//! - `drone-sim` library: feasibility evaluation and tick simulation
//! - `drone-sim` binary: text rendering and the JSON telemetry feed
//!
//! ## Units
//!
//! - Speeds in miles per hour, distances in statute miles
//! - Durations in seconds unless the field name says otherwise (`_min`)
//! - Battery in percent of nominal capacity, 0–100

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Identity ──────────────────────────────────────────────────────────────────

/// Position of a drone in the loaded fleet. Model names are not unique,
/// so every per-run structure is keyed by this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DroneId(pub u32);

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Drone performance profile ─────────────────────────────────────────────────

/// Immutable performance profile for one drone model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneSpec {
    /// Display name, never empty
    pub model: String,
    /// Cruise speed used in normal mode
    pub cruise_speed_mph: f64,
    /// Top speed used in burst mode
    pub burst_speed_mph: f64,
    /// Nominal battery endurance at cruise
    pub flight_time_min: f64,
    /// Maximum one-way distance the drone may attempt
    pub range_miles: f64,
    /// Battery drain multiplier while bursting (≥ 1.0)
    pub burst_drain_factor: f64,
    /// Wind ceiling; above this the drone stays on the ground
    pub max_wind_mph: f64,
    /// Informational only
    pub recharge_time_min: f64,
}

impl DroneSpec {
    /// Absolute speed ceiling for display and rate limiting.
    /// Burst speed is expected to be the higher one but the fleet source
    /// does not guarantee it.
    pub fn max_speed_mph(&self) -> f64 {
        self.burst_speed_mph.max(self.cruise_speed_mph)
    }

    /// Full battery in seconds of cruise flight.
    pub fn battery_capacity_seconds(&self) -> f64 {
        self.flight_time_min * 60.0
    }
}

// ── Geography & weather ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// 8-point compass. Informational only, never used in feasibility math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindDirection {
    #[default]
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    pub const ALL: [WindDirection; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Weather {
    pub wind_mph: f64,
    pub direction: WindDirection,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} {}", self.wind_mph, self.direction)
    }
}

// ── Mission context ───────────────────────────────────────────────────────────

/// Immutable snapshot of one mission setup. A new base, target, wind or
/// burst setting produces a new context rather than mutating this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionContext {
    pub base: GeoPoint,
    pub target: GeoPoint,
    /// One-way distance base → target
    pub one_way_miles: f64,
    pub weather: Weather,
    /// Applies to the whole fleet for the run
    pub burst: bool,
}

// ── Mission plan (evaluator output) ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// Wind above the drone's ceiling
    Wind,
    /// Round trip costs more than the usable battery
    Fuel,
    /// Target beyond the drone's legal range
    Range,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wind => "WIND",
            Self::Fuel => "FUEL",
            Self::Range => "RANGE",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-drone go/no-go verdict and phase timings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub feasible: bool,
    /// Set only when `feasible` is false
    pub failure: Option<FailureReason>,
    pub outbound_seconds: f64,
    /// Loiter window at the target; 0 when infeasible
    pub hover_seconds: f64,
    /// `outbound * 2 + hover`
    pub total_seconds: f64,
    pub effective_speed_mph: f64,
    pub drain_factor: f64,
    /// Ceiling for the displayed speed
    pub max_speed_mph: f64,
    /// Battery-percent denominator (full battery, reserve included)
    pub battery_capacity_seconds: f64,
    /// Capacity minus the fixed reserve
    pub usable_battery_seconds: f64,
}

impl MissionPlan {
    /// End of the on-scene window.
    pub fn return_start_seconds(&self) -> f64 {
        self.outbound_seconds + self.hover_seconds
    }
}

// ── Per-tick state ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightPhase {
    Outbound,
    OnScene,
    Return,
    Complete,
    /// Terminal, entered only by infeasible drones
    Grounded,
}

impl FlightPhase {
    /// Phases in which the drone flies at its effective speed.
    pub fn is_transit(&self) -> bool {
        matches!(self, Self::Outbound | Self::Return)
    }

    /// Position in the linear OUTBOUND → ON_SCENE → RETURN → COMPLETE chain.
    /// Grounded sits outside the chain.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            Self::Outbound => Some(0),
            Self::OnScene => Some(1),
            Self::Return => Some(2),
            Self::Complete => Some(3),
            Self::Grounded => None,
        }
    }
}

/// Kinematic and battery state of one drone at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickState {
    pub phase: FlightPhase,
    /// Rate-limited displayed speed
    pub speed_mph: f64,
    /// Seconds left in the current transit leg; `None` when grounded
    pub eta_seconds: Option<f64>,
    /// Seconds spent on scene so far; `None` when grounded
    pub on_scene_seconds: Option<f64>,
    pub battery_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl TickState {
    pub fn grounded(reason: Option<FailureReason>) -> Self {
        Self {
            phase: FlightPhase::Grounded,
            speed_mph: 0.0,
            eta_seconds: None,
            on_scene_seconds: None,
            battery_percent: 0.0,
            failure: reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroneTick {
    pub id: DroneId,
    #[serde(flatten)]
    pub state: TickState,
}

/// Every drone's state at one tick, in fleet order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickFrame {
    pub tick: usize,
    pub sim_time_seconds: f64,
    pub drones: Vec<DroneTick>,
}

impl TickFrame {
    pub fn state_of(&self, id: DroneId) -> Option<&TickState> {
        self.drones.iter().find(|d| d.id == id).map(|d| &d.state)
    }
}

// ── Rank tiers ────────────────────────────────────────────────────────────────

/// Display emphasis for feasible drones. Has no effect on physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Lead,
    Wing,
    Reserve,
}

impl Tier {
    /// Tier for a 0-based position in the ranking.
    pub fn from_position(pos: usize) -> Self {
        match pos {
            0 => Self::Lead,
            1 => Self::Wing,
            _ => Self::Reserve,
        }
    }

    pub fn callsign(&self) -> &'static str {
        match self {
            Self::Lead => "RED ONE",
            Self::Wing => "YELLOW TWO",
            Self::Reserve => "GREEN THREE",
        }
    }

    /// Hex color used by the legacy console
    pub fn color(&self) -> &'static str {
        match self {
            Self::Lead => "#ff0000",
            Self::Wing => "#ffff00",
            Self::Reserve => "#00ff00",
        }
    }
}

pub const GROUNDED_CALLSIGN: &str = "GROUNDED";
pub const GROUNDED_COLOR: &str = "#888888";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reason_serializes_screaming() {
        let json = serde_json::to_string(&FailureReason::Range).unwrap();
        assert_eq!(json, "\"RANGE\"");
        assert_eq!(FailureReason::Wind.to_string(), "WIND");
    }

    #[test]
    fn drone_tick_flattens_state() {
        let tick = DroneTick {
            id: DroneId(2),
            state: TickState::grounded(Some(FailureReason::Fuel)),
        };
        let v = serde_json::to_value(tick).unwrap();
        assert_eq!(v["id"], 2);
        assert_eq!(v["phase"], "GROUNDED");
        assert_eq!(v["failure"], "FUEL");
        assert!(v["eta_seconds"].is_null());
    }

    #[test]
    fn tier_positions() {
        assert_eq!(Tier::from_position(0), Tier::Lead);
        assert_eq!(Tier::from_position(1), Tier::Wing);
        assert_eq!(Tier::from_position(7), Tier::Reserve);
        assert_eq!(Tier::Wing.callsign(), "YELLOW TWO");
    }

    #[test]
    fn max_speed_tolerates_inverted_profile() {
        let spec = DroneSpec {
            model: "Odd".into(),
            cruise_speed_mph: 30.0,
            burst_speed_mph: 20.0,
            flight_time_min: 10.0,
            range_miles: 3.0,
            burst_drain_factor: 1.0,
            max_wind_mph: 10.0,
            recharge_time_min: 30.0,
        };
        assert_eq!(spec.max_speed_mph(), 30.0);
        assert_eq!(spec.battery_capacity_seconds(), 600.0);
    }

    #[test]
    fn phase_chain_is_linear() {
        assert!(FlightPhase::Outbound.ordinal() < FlightPhase::OnScene.ordinal());
        assert!(FlightPhase::Return.ordinal() < FlightPhase::Complete.ordinal());
        assert_eq!(FlightPhase::Grounded.ordinal(), None);
        assert!(FlightPhase::Return.is_transit());
        assert!(!FlightPhase::OnScene.is_transit());
    }
}
