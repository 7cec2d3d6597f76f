//! render.rs — Text presentation of plans and tick frames
//!
//! Pure string formatting; the binary decides where it goes and how fast.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use drone_types::{
    DroneId, DroneSpec, FlightPhase, MissionContext, MissionPlan, TickFrame, TickState, Tier,
    GROUNDED_CALLSIGN, GROUNDED_COLOR,
};

pub const SPEED_BAR_WIDTH: usize = 20;

/// Everything needed to label drones for one run.
#[derive(Debug, Clone, Copy)]
pub struct Roster<'a> {
    pub fleet: &'a [DroneSpec],
    pub plans: &'a [(DroneId, MissionPlan)],
    pub ranks: &'a BTreeMap<DroneId, Tier>,
}

impl<'a> Roster<'a> {
    fn model(&self, id: DroneId) -> &'a str {
        self.fleet.get(id.0 as usize).map(|s| s.model.as_str()).unwrap_or("?")
    }

    fn plan(&self, id: DroneId) -> Option<&'a MissionPlan> {
        self.plans.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    /// "RED ONE (Scout)" or "GROUNDED (Heavy-Lift)"
    pub fn label(&self, id: DroneId) -> String {
        let call = self.ranks.get(&id).map(Tier::callsign).unwrap_or(GROUNDED_CALLSIGN);
        format!("{call} ({})", self.model(id))
    }

    /// Tier color, gray for grounded drones
    pub fn color(&self, id: DroneId) -> &'static str {
        self.ranks.get(&id).map(Tier::color).unwrap_or(GROUNDED_COLOR)
    }
}

/// `mm:ss`, truncating fractional seconds.
pub fn format_clock(seconds: f64) -> String {
    let s = seconds.max(0.0);
    format!("{:02}:{:02}", (s / 60.0) as u64, (s % 60.0) as u64)
}

pub fn phase_tag(state: &TickState) -> &'static str {
    match state.phase {
        FlightPhase::Outbound => ">> OUT",
        FlightPhase::OnScene => "HOVER",
        FlightPhase::Return => "<< RTB",
        FlightPhase::Complete => "✓ SECURE",
        FlightPhase::Grounded => state.failure.map(|f| f.as_str()).unwrap_or(GROUNDED_CALLSIGN),
    }
}

pub fn speed_bar(speed_mph: f64, max_speed_mph: f64, width: usize) -> String {
    let fill = if max_speed_mph > 0.0 { (speed_mph / max_speed_mph).clamp(0.0, 1.0) } else { 0.0 };
    let cells = (fill * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(cells), ".".repeat(width - cells))
}

pub fn plan_summary(ctx: &MissionContext, roster: &Roster<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "TARGET {:.2} mi | WIND {} | {}",
        ctx.one_way_miles,
        ctx.weather,
        if ctx.burst { "🔥 BURST" } else { "CRUISE" }
    );
    for (id, plan) in roster.plans {
        let verdict = match plan.failure {
            None => "GO".to_string(),
            Some(reason) => format!("NO-GO {reason}"),
        };
        let _ = writeln!(
            out,
            "  {:<28} {:<12} out {}  site {}  total {}",
            roster.label(*id),
            verdict,
            format_clock(plan.outbound_seconds),
            format_clock(plan.hover_seconds),
            format_clock(plan.total_seconds),
        );
    }
    out
}

pub fn tick_panel(frame: &TickFrame, roster: &Roster<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── T+{} (tick {}) ──", format_clock(frame.sim_time_seconds), frame.tick);
    for drone in &frame.drones {
        let st = &drone.state;
        let max_speed = roster.plan(drone.id).map(|p| p.max_speed_mph).unwrap_or(0.0);
        let (eta, site) = match (st.eta_seconds, st.on_scene_seconds) {
            (Some(e), Some(s)) => (format_clock(e), format_clock(s)),
            _ => ("--".to_string(), "--".to_string()),
        };
        let _ = writeln!(
            out,
            "  {:<28} {:<9} MPH {:>3}  BAT {:>3}%  ETA {:>5}  SITE {:>5}  {}",
            roster.label(drone.id),
            phase_tag(st),
            st.speed_mph as u32,
            st.battery_percent as u32,
            eta,
            site,
            speed_bar(st.speed_mph, max_speed, SPEED_BAR_WIDTH),
        );
    }
    out
}
