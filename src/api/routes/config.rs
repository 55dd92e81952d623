//! Configuration load endpoint

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use super::super::types::ApiError;
use crate::engine::Engine;

#[derive(Debug, Deserialize)]
pub struct LoadConfigQuery {
    /// File name to persist the payload under; a timestamp-based name is
    /// generated when omitted.
    pub name: Option<String>,
}

/// `POST /api/v1/config` — body is the raw configuration text. Replaces the
/// active configuration: persists the payload, tears down every agent from
/// the previous load, clears the topic registry, and instantiates the new
/// agents.
pub async fn load_config(
    State(engine): State<Arc<Engine>>,
    Query(query): Query<LoadConfigQuery>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    engine.load_config(query.name.as_deref(), &body)?;
    Ok(StatusCode::NO_CONTENT)
}
