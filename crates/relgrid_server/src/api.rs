//! HTTP routes over one editing session.

use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use relgrid_core::{CellValue, RowId, TableId};
use relgrid_table::GridRecord;
use relgrid_view::{ActionEngine, EventOutput, Layout, LayoutConfig, UiEvent, ViewState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Shared state of the routes
///
/// The engine sits behind one lock so events are handled strictly one at a
/// time.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<ActionEngine>>,
    layout: LayoutConfig,
}

impl AppState {
    /// Serve the given session
    #[must_use]
    pub fn new(engine: ActionEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            layout: LayoutConfig::default(),
        }
    }

    /// Set layout configuration
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}

/// Body of a cell edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEdit {
    /// Column name
    pub column: String,
    /// New value
    pub value: serde_json::Value,
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/layout", get(layout))
        .route("/api/view", get(view))
        .route("/api/events", post(dispatch))
        .route("/api/tables/{table}/rows/{row}", put(update_cell).delete(delete_row))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn layout(State(state): State<AppState>) -> Json<Layout> {
    let engine = state.engine.lock().await;
    Json(engine.layout(&state.layout))
}

async fn view(State(state): State<AppState>) -> Json<ViewState> {
    let engine = state.engine.lock().await;
    Json(engine.view().clone())
}

async fn dispatch(
    State(state): State<AppState>,
    Json(event): Json<UiEvent>,
) -> Result<Json<EventOutput>, ApiError> {
    let mut engine = state.engine.lock().await;
    Ok(Json(engine.dispatch(&event)?))
}

async fn update_cell(
    State(state): State<AppState>,
    Path((table, row)): Path<(TableId, RowId)>,
    Json(edit): Json<CellEdit>,
) -> Result<Json<GridRecord>, ApiError> {
    let mut engine = state.engine.lock().await;
    let value = CellValue::from_json(&edit.value);
    let record = engine.update_cell(&table, row, &edit.column, value)?;
    Ok(Json(record))
}

async fn delete_row(
    State(state): State<AppState>,
    Path((table, row)): Path<(TableId, RowId)>,
) -> Result<Json<Vec<GridRecord>>, ApiError> {
    let mut engine = state.engine.lock().await;
    let output = engine.delete_row(&table, row)?;
    Ok(Json(output.get(&table).rows.clone().unwrap_or_default()))
}
