//! ranking.rs — Display tiers for feasible drones
//!
//! Computed once per run from total mission time. Display only; nothing in
//! the physics reads a tier.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use drone_types::{DroneId, MissionPlan, Tier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankPolicy {
    /// Shortest total mission gets the lead tier
    #[default]
    FastestFirst,
    /// Longest total mission (most time on scene) gets the lead tier
    SlowestFirst,
}

/// Tier per feasible drone. Grounded drones are absent from the map.
/// Ties on total time are broken by id, so input order never matters.
pub fn assign_ranks(plans: &[(DroneId, MissionPlan)], policy: RankPolicy) -> BTreeMap<DroneId, Tier> {
    let mut feasible: Vec<(DroneId, f64)> = plans
        .iter()
        .filter(|(_, p)| p.feasible)
        .map(|(id, p)| (*id, p.total_seconds))
        .collect();

    feasible.sort_by(|a, b| {
        let by_time = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
        let by_time = match policy {
            RankPolicy::FastestFirst => by_time,
            RankPolicy::SlowestFirst => by_time.reverse(),
        };
        by_time.then(a.0.cmp(&b.0))
    });

    feasible
        .into_iter()
        .enumerate()
        .map(|(pos, (id, _))| (id, Tier::from_position(pos)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::evaluate;
    use crate::fleet::builtin_fleet;

    fn fleet_plans(miles: f64, wind: f64) -> Vec<(DroneId, MissionPlan)> {
        builtin_fleet()
            .iter()
            .enumerate()
            .map(|(i, s)| (DroneId(i as u32), evaluate(s, miles, wind, false)))
            .collect()
    }

    #[test]
    fn fastest_first_orders_by_total() {
        // 2 mi, calm: Scout 1200 s, Heavy-Lift 1920 s, X-10 720 s
        let ranks = assign_ranks(&fleet_plans(2.0, 0.0), RankPolicy::FastestFirst);
        assert_eq!(ranks[&DroneId(2)], Tier::Lead);
        assert_eq!(ranks[&DroneId(0)], Tier::Wing);
        assert_eq!(ranks[&DroneId(1)], Tier::Reserve);
    }

    #[test]
    fn slowest_first_inverts() {
        let ranks = assign_ranks(&fleet_plans(2.0, 0.0), RankPolicy::SlowestFirst);
        assert_eq!(ranks[&DroneId(1)], Tier::Lead);
        assert_eq!(ranks[&DroneId(2)], Tier::Reserve);
    }

    #[test]
    fn grounded_drones_are_unranked() {
        // 28 mph wind grounds Scout (25) only
        let ranks = assign_ranks(&fleet_plans(2.0, 28.0), RankPolicy::FastestFirst);
        assert!(!ranks.contains_key(&DroneId(0)));
        assert_eq!(ranks[&DroneId(2)], Tier::Lead);
        assert_eq!(ranks[&DroneId(1)], Tier::Wing);
    }

    #[test]
    fn independent_of_input_order() {
        let plans = fleet_plans(2.0, 0.0);
        let mut reversed = plans.clone();
        reversed.reverse();
        assert_eq!(
            assign_ranks(&plans, RankPolicy::FastestFirst),
            assign_ranks(&reversed, RankPolicy::FastestFirst)
        );
    }

    #[test]
    fn ties_break_by_id() {
        let plan = fleet_plans(2.0, 0.0)[0].1;
        let plans = vec![(DroneId(5), plan), (DroneId(3), plan)];
        let ranks = assign_ranks(&plans, RankPolicy::FastestFirst);
        assert_eq!(ranks[&DroneId(3)], Tier::Lead);
        assert_eq!(ranks[&DroneId(5)], Tier::Wing);
    }
}
