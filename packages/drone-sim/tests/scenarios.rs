//! End-to-end sortie scenarios and run-wide invariants.

use drone_sim::fleet::builtin_fleet;
use drone_sim::{
    assign_ranks, evaluate, evaluate_fleet, simulate, CancelToken, Geocoder, MissionSetup, PlaceBook, RankPolicy,
    RunOutcome, SimSettings, SimulationRun,
};
use drone_types::{DroneId, DroneSpec, FailureReason, FlightPhase, GeoPoint, MissionPlan, TickFrame, Tier, Weather};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scout() -> DroneSpec {
    builtin_fleet().into_iter().find(|d| d.model == "Scout").unwrap()
}

fn run_all(plans: &[(DroneId, MissionPlan)], settings: SimSettings) -> Vec<TickFrame> {
    SimulationRun::new(plans, settings).unwrap().collect()
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

// ── Named scenarios ───────────────────────────────────────────────────────────

#[test]
fn scenario_a_scout_three_miles() {
    let plan = evaluate(&scout(), 3.0, 10.0, false);
    assert!(plan.feasible);
    assert!(close(plan.outbound_seconds, 490.909, 0.01), "outbound {}", plan.outbound_seconds);
    assert!(close(plan.usable_battery_seconds, 1200.0, 1e-9));
    assert!(close(plan.hover_seconds, 218.18, 0.01), "hover {}", plan.hover_seconds);
    assert!(close(plan.total_seconds, 1200.0, 1e-6), "total {}", plan.total_seconds);

    let frames = run_all(&[(DroneId(0), plan)], SimSettings::default());
    let last = frames.last().unwrap().drones[0].state;
    assert_eq!(last.phase, FlightPhase::Complete);
    // 1200 s of 1500 s capacity used, reserve left over
    assert!(close(last.battery_percent, 20.0, 1e-6), "battery {}", last.battery_percent);
}

#[test]
fn scenario_b_wind_grounds_scout() {
    let plan = evaluate(&scout(), 3.0, 30.0, false);
    assert!(!plan.feasible);
    assert_eq!(plan.failure, Some(FailureReason::Wind));
    assert_eq!(plan.hover_seconds, 0.0);
}

#[test]
fn scenario_c_out_of_range_reports_range() {
    let plan = evaluate(&scout(), 8.0, 10.0, false);
    assert_eq!(plan.failure, Some(FailureReason::Range));
}

#[test]
fn scenario_d_zero_distance_is_complete_immediately() {
    let plan = evaluate(&scout(), 0.0, 10.0, false);
    assert!(plan.feasible);
    assert_eq!(plan.outbound_seconds, 0.0);
    assert_eq!(plan.total_seconds, 0.0);

    let frames = run_all(&[(DroneId(0), plan)], SimSettings::default());
    assert_eq!(frames[0].drones[0].state.phase, FlightPhase::Complete);
    for frame in &frames {
        let st = frame.drones[0].state;
        assert_eq!(st.phase, FlightPhase::Complete, "tick {}", frame.tick);
        assert_eq!(st.battery_percent, 100.0, "tick {}", frame.tick);
        assert_eq!(st.speed_mph, 0.0);
    }
}

// ── Evaluator properties ──────────────────────────────────────────────────────

#[test]
fn wind_over_ceiling_always_grounds() {
    for spec in builtin_fleet() {
        for extra in [0.5, 1.0, 7.0, 50.0] {
            for miles in [0.0, 0.5, 3.0, 20.0] {
                for burst in [false, true] {
                    let plan = evaluate(&spec, miles, spec.max_wind_mph + extra, burst);
                    assert_eq!(
                        plan.failure,
                        Some(FailureReason::Wind),
                        "{} at {miles} mi, wind +{extra}",
                        spec.model
                    );
                }
            }
        }
    }
}

#[test]
fn feasible_plans_add_up() {
    for spec in builtin_fleet() {
        for tenth in 1..=90 {
            let miles = tenth as f64 / 10.0;
            for burst in [false, true] {
                let plan = evaluate(&spec, miles, 0.0, burst);
                if plan.feasible {
                    assert!(plan.hover_seconds >= 0.0);
                    assert_eq!(plan.total_seconds, plan.outbound_seconds * 2.0 + plan.hover_seconds);
                }
            }
        }
    }
}

#[test]
fn evaluation_is_idempotent() {
    let spec = scout();
    for burst in [false, true] {
        let a = evaluate(&spec, 2.7, 12.0, burst);
        let b = evaluate(&spec, 2.7, 12.0, burst);
        assert_eq!(a, b);
        assert_eq!(a.total_seconds.to_bits(), b.total_seconds.to_bits());
    }
}

#[test]
fn longer_trips_never_buy_more_hover() {
    for spec in builtin_fleet() {
        let mut prev: Option<MissionPlan> = None;
        for quarter in 1..=48 {
            let plan = evaluate(&spec, quarter as f64 / 4.0, 5.0, false);
            if let Some(p) = prev {
                assert!(plan.outbound_seconds >= p.outbound_seconds, "{} outbound shrank", spec.model);
                assert!(plan.hover_seconds <= p.hover_seconds, "{} hover grew", spec.model);
            }
            prev = Some(plan);
        }
    }
}

// ── Run invariants ────────────────────────────────────────────────────────────

fn fleet_plans(miles: f64, wind: f64, burst: bool) -> Vec<(DroneId, MissionPlan)> {
    builtin_fleet()
        .iter()
        .enumerate()
        .map(|(i, s)| (DroneId(i as u32), evaluate(s, miles, wind, burst)))
        .collect()
}

#[test]
fn battery_at_last_tick_matches_plan() {
    for burst in [false, true] {
        let plans = fleet_plans(2.0, 0.0, burst);
        let frames = run_all(&plans, SimSettings::default());
        let last = frames.last().unwrap();
        for (id, plan) in plans.iter().filter(|(_, p)| p.feasible) {
            let st = last.state_of(*id).unwrap();
            assert_eq!(st.phase, FlightPhase::Complete);
            let used = plan.outbound_seconds * 2.0 * plan.drain_factor + plan.hover_seconds;
            let expected = 100.0 - used / plan.battery_capacity_seconds * 100.0;
            assert!(close(st.battery_percent, expected, 1e-6), "{id}: {} vs {expected}", st.battery_percent);
            assert!(st.battery_percent >= 0.0);
        }
    }
}

#[test]
fn displayed_speed_is_rate_limited() {
    for step in [1.0, 4.0] {
        let settings = SimSettings { accel_step_mph: step, ..SimSettings::default() };
        let plans = fleet_plans(2.0, 0.0, true);
        let frames = run_all(&plans, settings);
        for pair in frames.windows(2) {
            for (prev, cur) in pair[0].drones.iter().zip(&pair[1].drones) {
                if cur.state.phase == FlightPhase::Complete {
                    assert_eq!(cur.state.speed_mph, 0.0);
                    continue;
                }
                let delta = (cur.state.speed_mph - prev.state.speed_mph).abs();
                assert!(delta <= step + 1e-9, "{} jumped {delta} at tick {}", cur.id, pair[1].tick);
            }
        }
    }
}

#[test]
fn callback_run_matches_iterator_run() {
    let plans = fleet_plans(2.5, 10.0, false);
    let frames = run_all(&plans, SimSettings::default());

    let mut seen = Vec::new();
    let outcome = simulate(&plans, SimSettings::default(), &CancelToken::new(), |tick, id, st| {
        seen.push((tick, id, *st));
    })
    .unwrap();

    assert_eq!(outcome, RunOutcome::Completed { ticks: frames.len() });
    let flat: Vec<_> = frames
        .iter()
        .flat_map(|f| f.drones.iter().map(move |d| (f.tick, d.id, d.state)))
        .collect();
    assert_eq!(seen, flat);
}

#[test]
fn runs_are_deterministic() {
    let plans = fleet_plans(1.7, 12.0, true);
    let a = serde_json::to_string(&run_all(&plans, SimSettings::default())).unwrap();
    let b = serde_json::to_string(&run_all(&plans, SimSettings::default())).unwrap();
    assert_eq!(a, b);
}

// ── Full pipeline ─────────────────────────────────────────────────────────────

#[test]
fn setup_to_ranked_run() {
    let mut places = PlaceBook::new();
    places.insert("base", GeoPoint::new(42.0, -89.0));
    let base = places.lookup("Base").unwrap();
    let target = places.lookup(&format!("42.0,{}", -89.0 + 3.0 / 69.0)).unwrap();
    assert!(places.lookup("atlantis").is_err());

    let mut rng = StdRng::seed_from_u64(99);
    let mut setup = MissionSetup::new(40);
    setup.set_base(base, &mut rng);
    assert!(setup.set_target(target, &mut rng).unwrap());
    let fixed = Weather { wind_mph: 10.0, ..setup.weather() };
    setup.set_weather(fixed).unwrap();

    let ctx = setup.context().unwrap();
    assert!(close(ctx.one_way_miles, 3.0, 1e-6));

    let fleet = builtin_fleet();
    let plans = evaluate_fleet(&fleet, &ctx);
    assert!(plans.iter().all(|(_, p)| p.feasible));

    // Totals: X-10 720 s, Scout 1200 s, Heavy-Lift 1920 s
    let ranks = assign_ranks(&plans, RankPolicy::FastestFirst);
    assert_eq!(ranks[&DroneId(2)], Tier::Lead);
    assert_eq!(ranks[&DroneId(0)], Tier::Wing);
    assert_eq!(ranks[&DroneId(1)], Tier::Reserve);

    let frames = run_all(&plans, SimSettings::default());
    let last = frames.last().unwrap();
    assert!(close(last.sim_time_seconds, 1920.0, 1e-3));
    assert!(last.drones.iter().all(|d| d.state.phase == FlightPhase::Complete));
}

#[test]
fn cancelled_run_stops_at_tick_boundary() {
    let plans = fleet_plans(2.0, 0.0, false);
    let cancel = CancelToken::new();
    let outcome = simulate(&plans, SimSettings::default(), &cancel, |tick, _, _| {
        if tick == 4 {
            cancel.cancel();
        }
    })
    .unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled { ticks_emitted: 5 });
}
