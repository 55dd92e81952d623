//! Topic publish and snapshot endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::types::ApiError;
use crate::engine::{Engine, TopicSnapshot};

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<TopicSnapshot>,
    /// When the registry was last wiped by a configuration load, if ever —
    /// a "recently reset" hint for UI consumers.
    pub last_clear_time: Option<DateTime<Utc>>,
}

/// `POST /api/v1/topics/{name}/publish` — publish a value onto an existing,
/// non-protected topic.
///
/// Delivery to a wrapped agent whose queue is full blocks the caller until
/// space frees up (the backpressure guarantee), so the call runs on the
/// blocking pool rather than the async executor.
pub async fn publish(
    State(engine): State<Arc<Engine>>,
    Path(name): Path<String>,
    Json(body): Json<PublishRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tokio::task::spawn_blocking(move || engine.publish(&name, &body.value))
        .await
        .map_err(|e| ApiError::internal(format!("publish task panicked: {e}")))??;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/topics` — snapshot of every known topic: name, last value,
/// wiring, and derived role.
pub async fn list_topics(State(engine): State<Arc<Engine>>) -> Json<TopicsResponse> {
    Json(TopicsResponse {
        topics: engine.topic_snapshot(),
        last_clear_time: engine.last_clear_time(),
    })
}
