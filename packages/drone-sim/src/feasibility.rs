//! feasibility.rs — Go/no-go verdict and phase timings per drone
//!
//! Pure computation: the same inputs always produce a bit-identical plan.
//!
//! Failure precedence is fixed as WIND > RANGE > FUEL. The legal range
//! ceiling is checked before the energy budget, so a target that is both
//! out of range and beyond the battery reports RANGE.

use drone_types::{DroneId, DroneSpec, FailureReason, MissionContext, MissionPlan};
use tracing::debug;

/// Fraction of the battery always withheld as landing reserve
pub const BATTERY_RESERVE_FRACTION: f64 = 0.20;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Evaluate one drone against a one-way distance, wind, and burst setting.
///
/// Outbound/return legs are still reported for infeasible drones so the
/// summary can show what the sortie would have cost; hover is forced to 0.
/// A zero-distance mission (base == target) has no on-scene window and a
/// total duration of 0.
pub fn evaluate(spec: &DroneSpec, one_way_miles: f64, wind_mph: f64, burst: bool) -> MissionPlan {
    let effective_speed_mph = if burst { spec.burst_speed_mph } else { spec.cruise_speed_mph };
    let drain_factor = if burst { spec.burst_drain_factor } else { 1.0 };

    // A drone that cannot make headway never leaves the pad
    let makes_headway = effective_speed_mph.is_finite() && effective_speed_mph > 0.0;
    let outbound_seconds = if makes_headway {
        one_way_miles / (effective_speed_mph / SECONDS_PER_HOUR)
    } else {
        0.0
    };

    let battery_capacity_seconds = spec.battery_capacity_seconds();
    let usable_battery_seconds = battery_capacity_seconds * (1.0 - BATTERY_RESERVE_FRACTION);
    let round_trip_cost_seconds = outbound_seconds * 2.0 * drain_factor;
    let hover_budget = usable_battery_seconds - round_trip_cost_seconds;

    let failure = if wind_mph > spec.max_wind_mph {
        Some(FailureReason::Wind)
    } else if !makes_headway || one_way_miles > spec.range_miles {
        Some(FailureReason::Range)
    } else if hover_budget < 0.0 {
        Some(FailureReason::Fuel)
    } else {
        None
    };

    let hover_seconds = match failure {
        Some(_) => 0.0,
        None if one_way_miles <= 0.0 => 0.0,
        None => hover_budget,
    };

    MissionPlan {
        feasible: failure.is_none(),
        failure,
        outbound_seconds,
        hover_seconds,
        total_seconds: outbound_seconds * 2.0 + hover_seconds,
        effective_speed_mph,
        drain_factor,
        max_speed_mph: spec.max_speed_mph(),
        battery_capacity_seconds,
        usable_battery_seconds,
    }
}

/// Evaluate every drone in the fleet against one mission context.
/// Ids are fleet positions.
pub fn evaluate_fleet(fleet: &[DroneSpec], ctx: &MissionContext) -> Vec<(DroneId, MissionPlan)> {
    fleet
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let id = DroneId(idx as u32);
            let plan = evaluate(spec, ctx.one_way_miles, ctx.weather.wind_mph, ctx.burst);
            debug!(
                "{id} {}: feasible={} failure={:?} out={:.1}s hover={:.1}s total={:.1}s",
                spec.model, plan.feasible, plan.failure,
                plan.outbound_seconds, plan.hover_seconds, plan.total_seconds
            );
            (id, plan)
        })
        .collect()
}
