//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use discord_commands::Outcome;
use serde::{Deserialize, Serialize};
use serenity::prelude::TypeMapKey;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub bot_username: Option<String>,
    pub uptime_secs: u64,
    /// Commands that ran, whether they succeeded or not
    pub commands_handled: u64,
    pub commands_failed: u64,
}

/// Shared application state for health checks
#[derive(Clone)]
pub struct AppState {
    pub start_time: SystemTime,
    pub bot_username: Arc<RwLock<Option<String>>>,
    commands_handled: Arc<AtomicU64>,
    commands_failed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            start_time: SystemTime::now(),
            bot_username: Arc::new(RwLock::new(None)),
            commands_handled: Arc::new(AtomicU64::new(0)),
            commands_failed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn set_bot_username(&self, username: String) {
        let mut guard = self.bot_username.write().await;
        *guard = Some(username);
    }

    /// Count a dispatch. Ignored messages are not counted.
    pub fn record(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Ignored(_) => {}
            Outcome::Completed { .. } => {
                self.commands_handled.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Failed { .. } => {
                self.commands_handled.fetch_add(1, Ordering::Relaxed);
                self.commands_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub async fn snapshot(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            bot_username: self.bot_username.read().await.clone(),
            uptime_secs: self.start_time.elapsed().unwrap_or_default().as_secs(),
            commands_handled: self.commands_handled.load(Ordering::Relaxed),
            commands_failed: self.commands_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapKey for AppState {
    type Value = AppState;
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(state.snapshot().await))
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start the health check server
pub async fn start_health_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use discord_commands::{CommandError, Skip};

    #[tokio::test]
    async fn test_app_state_new() {
        let state = AppState::new();
        assert!(state.bot_username.read().await.is_none());
        let status = state.snapshot().await;
        assert_eq!(status.commands_handled, 0);
        assert_eq!(status.commands_failed, 0);
    }

    #[tokio::test]
    async fn test_set_bot_username() {
        let state = AppState::new();
        state.set_bot_username("mybot".to_string()).await;
        assert_eq!(*state.bot_username.read().await, Some("mybot".to_string()));
    }

    #[tokio::test]
    async fn test_record_outcomes() {
        let state = AppState::new();
        state.record(&Outcome::Ignored(Skip::MissingPrefix));
        state.record(&Outcome::Completed {
            command: "ping".to_string(),
        });
        state.record(&Outcome::Failed {
            command: "kick".to_string(),
            error: CommandError::rejected("You lack permission."),
        });

        let status = state.snapshot().await;
        assert_eq!(status.commands_handled, 2);
        assert_eq!(status.commands_failed, 1);
    }

    #[tokio::test]
    async fn test_counters_shared_between_clones() {
        let state = AppState::new();
        let clone = state.clone();
        clone.record(&Outcome::Completed {
            command: "flip".to_string(),
        });
        assert_eq!(state.snapshot().await.commands_handled, 1);
    }

    #[tokio::test]
    async fn test_health_handler_reports_counters() {
        let state = AppState::new();
        state.set_bot_username("testbot".to_string()).await;
        state.record(&Outcome::Completed {
            command: "ping".to_string(),
        });

        let (code, Json(body)) = health_handler(State(state)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.bot_username.as_deref(), Some("testbot"));
        assert_eq!(body.commands_handled, 1);
    }

    #[test]
    fn test_health_status_serde() {
        let status = HealthStatus {
            status: "ok".to_string(),
            bot_username: Some("testbot".to_string()),
            uptime_secs: 100,
            commands_handled: 7,
            commands_failed: 2,
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: HealthStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, "ok");
        assert_eq!(back.uptime_secs, 100);
        assert_eq!(back.commands_failed, 2);
        assert_eq!(back.bot_username, Some("testbot".to_string()));
    }
}
