//! tick_sim.rs — Fixed-tick flight-phase simulation
//!
//! Advances a virtual clock over the longest feasible mission and derives,
//! for every drone at every tick, its phase, rate-limited displayed speed,
//! time-to-event, on-scene time, and battery remaining.
//!
//! The run is synchronous. Each tick is one yield point: either one
//! `Iterator::next` on [`SimulationRun`] or one batch of callbacks in
//! [`simulate`]. Pacing for a watchable animation belongs to the caller.
//! The only interruption is the [`CancelToken`], checked before each tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use drone_types::{DroneId, DroneTick, FlightPhase, MissionPlan, TickFrame, TickState};
use serde::Deserialize;
use tracing::info;

use crate::error::SimError;

pub const DEFAULT_TICK_COUNT: usize = 101;
/// Displayed-speed change allowed per tick
pub const DEFAULT_ACCEL_STEP_MPH: f64 = 1.0;
/// Clock span used when no drone is feasible, so grounded drones still render
pub const IDLE_DURATION_SECONDS: f64 = 5.0;

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub tick_count: usize,
    pub accel_step_mph: f64,
    pub idle_duration_seconds: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            tick_count: DEFAULT_TICK_COUNT,
            accel_step_mph: DEFAULT_ACCEL_STEP_MPH,
            idle_duration_seconds: IDLE_DURATION_SECONDS,
        }
    }
}

impl SimSettings {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_count < 2 {
            return Err(SimError::TooFewTicks(self.tick_count));
        }
        if !(self.accel_step_mph.is_finite() && self.accel_step_mph > 0.0) {
            return Err(SimError::BadAccelStep(self.accel_step_mph));
        }
        Ok(())
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

/// Shared flag that aborts an in-flight run at the next tick boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { ticks: usize },
    Cancelled { ticks_emitted: usize },
}

// ── Phase & battery math ──────────────────────────────────────────────────────

/// Phase of a feasible plan at `t` seconds into the run.
/// Windows are half-open: `[0,out)`, `[out,out+hover)`, `[out+hover,total)`, `[total,∞)`.
pub fn phase_at(plan: &MissionPlan, t: f64) -> FlightPhase {
    if !plan.feasible {
        FlightPhase::Grounded
    } else if t < plan.outbound_seconds {
        FlightPhase::Outbound
    } else if t < plan.return_start_seconds() {
        FlightPhase::OnScene
    } else if t < plan.total_seconds {
        FlightPhase::Return
    } else {
        FlightPhase::Complete
    }
}

/// Seconds spent flying and hovering by `t`.
pub fn elapsed_split(plan: &MissionPlan, t: f64) -> (f64, f64) {
    match phase_at(plan, t) {
        FlightPhase::Grounded => (0.0, 0.0),
        FlightPhase::Outbound => (t, 0.0),
        FlightPhase::OnScene => (plan.outbound_seconds, t - plan.outbound_seconds),
        FlightPhase::Return => (
            plan.outbound_seconds + (t - plan.return_start_seconds()),
            plan.hover_seconds,
        ),
        FlightPhase::Complete => (plan.outbound_seconds * 2.0, plan.hover_seconds),
    }
}

/// Battery left at `t`, as a percentage of full capacity.
pub fn battery_percent_at(plan: &MissionPlan, t: f64) -> f64 {
    if !plan.feasible || plan.battery_capacity_seconds <= 0.0 {
        return 0.0;
    }
    let (flying, hovering) = elapsed_split(plan, t);
    let used = flying * plan.drain_factor + hovering;
    (100.0 - used / plan.battery_capacity_seconds * 100.0).clamp(0.0, 100.0)
}

fn approach(current: f64, target: f64, step: f64) -> f64 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

// ── Per-drone track ───────────────────────────────────────────────────────────

/// Owns the only mutable per-drone state of a run: the displayed speed.
#[derive(Debug, Clone)]
struct DroneTrack {
    id: DroneId,
    plan: MissionPlan,
    speed_mph: f64,
}

impl DroneTrack {
    fn advance(&mut self, t: f64, accel_step_mph: f64) -> TickState {
        let plan = &self.plan;
        if !plan.feasible {
            return TickState::grounded(plan.failure);
        }

        let phase = phase_at(plan, t);
        if phase == FlightPhase::Complete {
            // No residual reading once the drone is home
            self.speed_mph = 0.0;
        } else {
            let target = if phase.is_transit() { plan.effective_speed_mph } else { 0.0 };
            self.speed_mph = approach(self.speed_mph, target, accel_step_mph)
                .max(0.0)
                .min(plan.max_speed_mph);
        }

        let eta_seconds = match phase {
            FlightPhase::Outbound => plan.outbound_seconds - t,
            FlightPhase::Return => plan.total_seconds - t,
            _ => 0.0,
        };
        let on_scene_seconds = match phase {
            FlightPhase::OnScene => t - plan.outbound_seconds,
            FlightPhase::Return | FlightPhase::Complete => plan.hover_seconds,
            _ => 0.0,
        };

        TickState {
            phase,
            speed_mph: self.speed_mph,
            eta_seconds: Some(eta_seconds),
            on_scene_seconds: Some(on_scene_seconds),
            battery_percent: battery_percent_at(plan, t),
            failure: None,
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// One simulation run, yielding a [`TickFrame`] per tick.
pub struct SimulationRun {
    tracks: Vec<DroneTrack>,
    settings: SimSettings,
    sim_duration: f64,
    next_tick: usize,
    cancel: Option<CancelToken>,
}

impl SimulationRun {
    pub fn new(plans: &[(DroneId, MissionPlan)], settings: SimSettings) -> Result<Self, SimError> {
        settings.validate()?;

        let feasible_totals = plans
            .iter()
            .filter(|(_, p)| p.feasible)
            .map(|(_, p)| p.total_seconds);
        let sim_duration = feasible_totals
            .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))))
            .unwrap_or(settings.idle_duration_seconds);

        let tracks: Vec<DroneTrack> = plans
            .iter()
            .map(|(id, plan)| DroneTrack { id: *id, plan: *plan, speed_mph: 0.0 })
            .collect();

        info!(
            "🚁 Run ready — {} drones ({} feasible), {:.1}s over {} ticks",
            tracks.len(),
            tracks.iter().filter(|t| t.plan.feasible).count(),
            sim_duration,
            settings.tick_count
        );

        Ok(Self { tracks, settings, sim_duration, next_tick: 0, cancel: None })
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn sim_duration(&self) -> f64 {
        self.sim_duration
    }

    pub fn tick_count(&self) -> usize {
        self.settings.tick_count
    }

    pub fn ticks_emitted(&self) -> usize {
        self.next_tick
    }

    /// Virtual clock at a tick index.
    pub fn time_at(&self, tick: usize) -> f64 {
        tick as f64 / (self.settings.tick_count - 1) as f64 * self.sim_duration
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.next_tick >= self.settings.tick_count {
            RunOutcome::Completed { ticks: self.next_tick }
        } else {
            RunOutcome::Cancelled { ticks_emitted: self.next_tick }
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }
}

impl Iterator for SimulationRun {
    type Item = TickFrame;

    fn next(&mut self) -> Option<TickFrame> {
        if self.next_tick >= self.settings.tick_count || self.cancelled() {
            return None;
        }

        let tick = self.next_tick;
        let t = self.time_at(tick);
        let step = self.settings.accel_step_mph;

        let drones = self
            .tracks
            .iter_mut()
            .map(|track| DroneTick { id: track.id, state: track.advance(t, step) })
            .collect();

        self.next_tick += 1;
        Some(TickFrame { tick, sim_time_seconds: t, drones })
    }
}

/// Run to completion (or cancellation), calling `on_tick` for every drone at
/// every tick. All drones of a tick are reported before the next tick starts.
pub fn simulate<F>(
    plans: &[(DroneId, MissionPlan)],
    settings: SimSettings,
    cancel: &CancelToken,
    mut on_tick: F,
) -> Result<RunOutcome, SimError>
where
    F: FnMut(usize, DroneId, &TickState),
{
    let mut run = SimulationRun::new(plans, settings)?.with_cancel(cancel.clone());
    for frame in run.by_ref() {
        for drone in &frame.drones {
            on_tick(frame.tick, drone.id, &drone.state);
        }
    }
    Ok(run.outcome())
}
