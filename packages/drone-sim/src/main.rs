//! main.rs — Drone sortie simulator entry point
//!
//! Resolves base and target, evaluates every drone in the fleet, prints the
//! go/no-go summary and then replays the sortie tick by tick:
//!   1. Tick loop: paced by a tokio interval, prints a panel per tick
//!   2. Telemetry (optional): WebSocket feed of the same frames
//!   3. Ctrl-C: cancels the run at the next tick boundary

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::interval;
use tracing::{info, warn};

use drone_sim::config::{FullConfig, DEFAULT_CONFIG};
use drone_sim::fleet::load_fleet_or_default;
use drone_sim::render::{plan_summary, tick_panel, Roster};
use drone_sim::telemetry::{self, TelemetryHub};
use drone_sim::{assign_ranks, evaluate_fleet, CancelToken, Geocoder, MissionSetup, RunOutcome, SimulationRun};
use drone_types::{FlightPhase, Weather};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "drone-sim", about = "Round-trip drone sortie simulator")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Fleet file (.csv, .toml or .json); overrides the config
    #[arg(short, long)]
    fleet: Option<PathBuf>,
    /// Base: place name or "lat,lon"
    #[arg(long)]
    base: Option<String>,
    /// Target: place name or "lat,lon"
    #[arg(long)]
    target: Option<String>,
    /// Fly at burst speed
    #[arg(long)]
    burst: bool,
    /// Fixed wind speed in mph instead of random weather
    #[arg(long)]
    wind: Option<f64>,
    /// Weather RNG seed, for replayable runs
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks per run
    #[arg(long)]
    ticks: Option<usize>,
    /// Real-time delay between ticks
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Telemetry WebSocket port
    #[arg(long)]
    ws_port: Option<u16>,
    /// Print the plan summary only, no tick panels
    #[arg(short, long)]
    quiet: bool,
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drone_sim=info".into()),
        )
        .init();

    let args = Args::parse();

    let config_str = match std::fs::read_to_string(&args.config) {
        Ok(s) => s,
        Err(_) => {
            info!("No {} found, using built-in defaults", args.config.display());
            DEFAULT_CONFIG.to_string()
        }
    };
    let cfg = FullConfig::parse(&config_str)
        .with_context(|| format!("invalid config {}", args.config.display()))?;

    let fleet_path = args.fleet.clone().or_else(|| cfg.mission.fleet_path.clone());
    let fleet = load_fleet_or_default(fleet_path.as_deref());

    // ── Mission setup ─────────────────────────────────────────────────────────

    let places = cfg.place_book();
    let Some(base_id) = args.base.clone().or_else(|| cfg.mission.base.clone()) else {
        bail!("no base given (use --base or [mission].base)");
    };
    let Some(target_id) = args.target.clone().or_else(|| cfg.mission.target.clone()) else {
        bail!("no target given (use --target or [mission].target)");
    };
    let base = places.lookup(&base_id).context("base lookup failed")?;
    let target = places.lookup(&target_id).context("target lookup failed")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut setup = MissionSetup::new(cfg.weather.max_wind_mph);
    setup.set_base(base, &mut rng);
    setup.set_target(target, &mut rng)?;
    setup.set_burst(args.burst || cfg.mission.burst);
    if let Some(wind_mph) = args.wind {
        let fixed = Weather { wind_mph, ..setup.weather() };
        setup.set_weather(fixed).context("invalid --wind")?;
    }
    let Some(ctx) = setup.context() else {
        bail!("mission setup incomplete");
    };

    info!(
        "🚁 Drone sim starting — {} drones, {:.2} mi one way, wind {}",
        fleet.len(),
        ctx.one_way_miles,
        ctx.weather
    );

    // ── Plan ──────────────────────────────────────────────────────────────────

    let plans = evaluate_fleet(&fleet, &ctx);
    let ranks = assign_ranks(&plans, cfg.simulation.rank_policy);
    let roster = Roster { fleet: &fleet, plans: &plans, ranks: &ranks };
    print!("{}", plan_summary(&ctx, &roster));

    let hub = match args.ws_port.unwrap_or(cfg.telemetry.ws_port) {
        0 => None,
        port => {
            let hub = TelemetryHub::new();
            let server = hub.clone();
            tokio::spawn(async move {
                if let Err(e) = telemetry::serve(server, port).await {
                    warn!("Telemetry feed stopped: {e}");
                }
            });
            Some(hub)
        }
    };
    if let Some(hub) = &hub {
        hub.publish_plan(&ctx, &roster).await;
    }

    // ── Replay ────────────────────────────────────────────────────────────────

    let mut settings = cfg.simulation.settings();
    if let Some(ticks) = args.ticks {
        settings.tick_count = ticks;
    }

    let cancel = CancelToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, cancelling run");
            on_signal.cancel();
        }
    });

    let mut run = SimulationRun::new(&plans, settings)?.with_cancel(cancel);
    let tick_ms = args.tick_ms.unwrap_or(cfg.simulation.tick_interval_ms).max(1);
    let mut ticker = interval(Duration::from_millis(tick_ms));

    info!("⏱ Replaying {:.0}s of flight at {tick_ms}ms per tick", run.sim_duration());

    loop {
        ticker.tick().await;
        let Some(frame) = run.next() else { break };

        if !args.quiet {
            print!("{}", tick_panel(&frame, &roster));
        }
        if let Some(hub) = &hub {
            hub.publish_frame(&frame);
        }
        if frame.tick % 20 == 0 {
            let airborne = frame
                .drones
                .iter()
                .filter(|d| matches!(d.state.phase, FlightPhase::Outbound | FlightPhase::OnScene | FlightPhase::Return))
                .count();
            info!("⏱ tick {}/{} | T+{:.0}s | airborne={airborne}", frame.tick, run.tick_count(), frame.sim_time_seconds);
        }
    }

    let outcome = run.outcome();
    if let Some(hub) = &hub {
        hub.publish_outcome(outcome);
    }
    match outcome {
        RunOutcome::Completed { ticks } => info!("✅ Run complete — {ticks} ticks"),
        RunOutcome::Cancelled { ticks_emitted } => warn!("Run cancelled after {ticks_emitted} ticks"),
    }
    Ok(())
}
