use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::error::ApiError;
use crate::flatten::{self, SheetWindow};
use crate::record::{EditableField, Record};
use crate::source::{CellMode, TabularSource};
use crate::ui;

/// Liveness text served on `/`
pub const LIVENESS: &str = "Inquiry Compilation API running";

/// Shared state handed to every handler
pub struct AppState<S> {
    pub source: S,
    pub window: SheetWindow,
    pub mode: CellMode,
}

impl<S: TabularSource> AppState<S> {
    pub fn new(source: S, window: SheetWindow, mode: CellMode) -> Arc<Self> {
        Arc::new(AppState {
            source,
            window,
            mode,
        })
    }

    pub async fn list_systems(&self) -> Result<Vec<Record>, ApiError> {
        flatten::list_systems(&self.source, self.window, self.mode).await
    }

    pub async fn update(
        &self,
        id: &str,
        field: EditableField,
        value: &str,
    ) -> Result<(), ApiError> {
        flatten::update_field(&self.source, self.window, id, field.column(), value).await
    }
}

/// Build the full router: JSON API, browser UI and liveness
pub fn router<S: TabularSource>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/api/systems", get(list_systems::<S>))
        .route("/api/systems/:id/scope", post(update_scope::<S>))
        .route("/api/systems/:id/observations", post(update_observations::<S>))
        .route("/ui", get(ui::list_page::<S>))
        .route("/ui/systems/:id", get(ui::detail_page::<S>))
        .route("/ui/systems/:id/scope", post(ui::save_scope::<S>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on the configured address until the process is stopped
pub async fn run<S: TabularSource>(
    source: S,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(source, config.window, config.cell_mode);
    let app = router(state);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    log::info!("Server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn liveness() -> &'static str {
    LIVENESS
}

async fn list_systems<S: TabularSource>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    match state.list_systems().await {
        Ok(records) => {
            log::info!("GET /api/systems: {} systems", records.len());
            Ok(Json(records))
        }
        Err(e) => {
            log::error!("Error in GET /api/systems: {}", e);
            Err(e)
        }
    }
}

async fn update_scope<S: TabularSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    update_editable(&state, &id, EditableField::Scope, body).await
}

async fn update_observations<S: TabularSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    update_editable(&state, &id, EditableField::Observations, body).await
}

/// Shared body of the write endpoints; a missing or non-string value is `""`
async fn update_editable<S: TabularSource>(
    state: &AppState<S>,
    id: &str,
    field: EditableField,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let value = body
        .as_ref()
        .and_then(|Json(body)| body.get(field.body_key()))
        .and_then(Value::as_str)
        .unwrap_or("");

    match state.update(id, field, value).await {
        Ok(()) => Ok(Json(json!({ "ok": true }))),
        Err(e) => {
            log::error!(
                "Error in POST /api/systems/{}/{}: {}",
                id,
                field.body_key(),
                e
            );
            Err(e)
        }
    }
}
