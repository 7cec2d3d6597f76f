//! telemetry.rs — Live JSON feed of a run over WebSocket
//!
//! Relays plan summaries and tick frames to any number of browser or
//! dashboard clients:
//!   - `GET /ws`: WebSocket, one JSON text message per event
//!   - `GET /health`: liveness probe
//!
//! Every message carries the run id, so a client that sees a new id knows
//! the previous run was superseded. Slow clients skip frames rather than
//! stall the run.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use drone_types::{MissionContext, TickFrame};
use serde_json::json;
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};
use uuid::Uuid;

use crate::render::Roster;
use crate::tick_sim::RunOutcome;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct TelemetryHub {
    tx: Arc<broadcast::Sender<String>>,
    /// Last plan message, replayed to clients that connect mid-run
    latest_plan: Arc<RwLock<Option<String>>>,
    run_id: Uuid,
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel::<String>(CHANNEL_CAPACITY);
        Self {
            tx: Arc::new(tx),
            latest_plan: Arc::new(RwLock::new(None)),
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub async fn publish_plan(&self, ctx: &MissionContext, roster: &Roster<'_>) {
        let drones: Vec<_> = roster
            .plans
            .iter()
            .map(|(id, plan)| {
                json!({
                    "id":    id,
                    "label": roster.label(*id),
                    "tier":  roster.ranks.get(id),
                    "color": roster.color(*id),
                    "plan":  plan,
                })
            })
            .collect();
        let msg = json!({
            "type":    "plan",
            "run_id":  self.run_id.to_string(),
            "context": ctx,
            "drones":  drones,
        })
        .to_string();

        *self.latest_plan.write().await = Some(msg.clone());
        // No subscribers is fine
        let _ = self.tx.send(msg);
    }

    pub fn publish_frame(&self, frame: &TickFrame) {
        let msg = json!({
            "type":   "tick",
            "run_id": self.run_id.to_string(),
            "frame":  frame,
        });
        let _ = self.tx.send(msg.to_string());
    }

    pub fn publish_outcome(&self, outcome: RunOutcome) {
        let (status, ticks) = match outcome {
            RunOutcome::Completed { ticks } => ("complete", ticks),
            RunOutcome::Cancelled { ticks_emitted } => ("cancelled", ticks_emitted),
        };
        let msg = json!({
            "type":   status,
            "run_id": self.run_id.to_string(),
            "ticks":  ticks,
        });
        let _ = self.tx.send(msg.to_string());
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_handler))
            .route("/health", get(|| async { "drone-sim ok" }))
            .with_state(self.clone())
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    }
}

/// Serve the feed until the process exits.
pub async fn serve(hub: TelemetryHub, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🖥  Telemetry feed at ws://{addr}/ws");
    axum::serve(listener, hub.router()).await
}

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<TelemetryHub>) -> Response {
    ws.on_upgrade(move |socket| handle_ws(socket, hub))
}

async fn handle_ws(mut socket: WebSocket, hub: TelemetryHub) {
    let mut rx = hub.subscribe();

    let latest = hub.latest_plan.read().await.clone();
    if let Some(plan) = latest {
        if socket.send(Message::Text(plan)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            Ok(msg) = rx.recv() => {
                if socket.send(Message::Text(msg)).await.is_err() { break; }
            }
            incoming = socket.recv() => match incoming {
                // Read-only feed: client messages are ignored
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!("Telemetry client disconnected");
}
