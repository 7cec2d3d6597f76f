//! drone-sim — Round-trip sortie feasibility and flight replay
//!
//! Given a fleet, a base and a target, decides which drones can fly the
//! mission (wind, range, battery), how long each leg takes, and replays the
//! sortie as a fixed number of ticks with rate-limited displayed speed.

pub mod config;
pub mod error;
pub mod feasibility;
pub mod fleet;
pub mod geo;
pub mod ranking;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod tick_sim;
pub mod weather;

pub use error::{FleetError, SetupError, SimError};
pub use feasibility::{evaluate, evaluate_fleet};
pub use geo::{distance_miles, Geocoder, PlaceBook};
pub use ranking::{assign_ranks, RankPolicy};
pub use session::{MissionSetup, SetupStage};
pub use tick_sim::{simulate, CancelToken, RunOutcome, SimSettings, SimulationRun};
