//! Agent listing. Agents are seed-only; the API exposes the active roster.

use axum::{extract::State, Json};
use serde_json::json;
use std::sync::Arc;

use crate::errors::{AppError, ResultExt};
use crate::models::Agent;

use super::AppState;

/// GET /api/agents
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let agents: Vec<Agent> = sqlx::query_as(
        "SELECT * FROM agents WHERE status = 'active' ORDER BY last_name, first_name",
    )
    .fetch_all(&state.db)
    .await
    .context("Failed to fetch agents")?;

    Ok(Json(json!({
        "success": true,
        "data": agents,
        "count": agents.len(),
    })))
}
