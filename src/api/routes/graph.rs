//! Topic/agent wiring graph endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::domain::Graph;
use crate::engine::Engine;

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    #[serde(flatten)]
    pub graph: Graph,
    pub has_cycles: bool,
}

/// `GET /api/v1/graph` — the current bipartite topic/agent wiring, plus
/// whether it currently contains a cycle.
pub async fn graph(State(engine): State<Arc<Engine>>) -> Json<GraphResponse> {
    let graph = engine.graph_snapshot();
    let has_cycles = graph.has_cycles();
    Json(GraphResponse { graph, has_cycles })
}
