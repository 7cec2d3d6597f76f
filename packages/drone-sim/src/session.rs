//! session.rs — Mission setup stages
//!
//! AWAITING_BASE → AWAITING_TARGET → READY. The orchestrator owns one
//! `MissionSetup`; the simulation core only ever sees the immutable
//! `MissionContext` snapshots it hands out.

use drone_types::{GeoPoint, MissionContext, Weather};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::error::SetupError;
use crate::geo::distance_miles;
use crate::weather::random_weather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupStage {
    AwaitingBase,
    AwaitingTarget,
    Ready,
}

#[derive(Debug, Clone)]
pub struct MissionSetup {
    stage: SetupStage,
    base: Option<GeoPoint>,
    target: Option<GeoPoint>,
    weather: Weather,
    burst: bool,
    max_wind_mph: u32,
}

impl MissionSetup {
    pub fn new(max_wind_mph: u32) -> Self {
        Self {
            stage: SetupStage::AwaitingBase,
            base: None,
            target: None,
            weather: Weather::default(),
            burst: false,
            max_wind_mph,
        }
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn burst(&self) -> bool {
        self.burst
    }

    /// Place (or move) the base. New weather is drawn.
    pub fn set_base<R: Rng + ?Sized>(&mut self, point: GeoPoint, rng: &mut R) {
        self.base = Some(point);
        self.weather = random_weather(rng, self.max_wind_mph);
        self.stage = if self.target.is_some() { SetupStage::Ready } else { SetupStage::AwaitingTarget };
        info!("📍 Base set at {point} — wind {}", self.weather);
    }

    /// Place the target. Returns `Ok(false)` when the point equals the
    /// current target, in which case nothing changes (weather included).
    pub fn set_target<R: Rng + ?Sized>(&mut self, point: GeoPoint, rng: &mut R) -> Result<bool, SetupError> {
        if self.base.is_none() {
            return Err(SetupError::NoBase);
        }
        if self.target == Some(point) {
            return Ok(false);
        }
        self.target = Some(point);
        self.weather = random_weather(rng, self.max_wind_mph);
        self.stage = SetupStage::Ready;
        info!("🎯 Target set at {point} — wind {}", self.weather);
        Ok(true)
    }

    pub fn set_burst(&mut self, burst: bool) {
        self.burst = burst;
    }

    /// Replace the drawn weather with an explicit reading. Wind must be a
    /// finite, non-negative speed; a rejected reading leaves the weather as is.
    pub fn set_weather(&mut self, weather: Weather) -> Result<(), SetupError> {
        if !weather.wind_mph.is_finite() || weather.wind_mph < 0.0 {
            return Err(SetupError::BadWind(weather.wind_mph));
        }
        self.weather = weather;
        Ok(())
    }

    /// Back to AWAITING_BASE. Burst mode and weather survive a reset.
    pub fn reset(&mut self) {
        self.base = None;
        self.target = None;
        self.stage = SetupStage::AwaitingBase;
    }

    /// Snapshot for one run, once both points are set.
    pub fn context(&self) -> Option<MissionContext> {
        let (base, target) = (self.base?, self.target?);
        Some(MissionContext {
            base,
            target,
            one_way_miles: distance_miles(base, target),
            weather: self.weather,
            burst: self.burst,
        })
    }
}
