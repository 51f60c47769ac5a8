//! JSON API handlers — one handler per user action.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::{self, ChartConfig, ChartError, ChartKind, ChartSpec};
use crate::services::clean::{self, CleanError};
use crate::services::insight::{self, InsightError};
use crate::state::AppState;
use crate::table::DataTable;

/// Built-in messy example populated by the "Load Sample Data" action.
pub const SAMPLE_DATA: &str = "Monthly Product Sales - 2025\n\
Product A, Jan, $12,500\n\
Product B, Jan, $18,000\n\
Product A, Feb, 14,200 USD\n\
Product B, Feb, $19,500\n\
Product A, Mar, $16,000\n\
Product B, March, $22,100\n";

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// User-visible API error: HTTP status plus a message body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

impl From<CleanError> for ApiError {
    fn from(err: CleanError) -> Self {
        let status = match &err {
            CleanError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            CleanError::EmptyInput => StatusCode::BAD_REQUEST,
            CleanError::Envelope(_) | CleanError::Csv(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CleanError::Llm(_) => StatusCode::BAD_GATEWAY,
        };
        Self { status, message: err.to_string() }
    }
}

impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        let status = match &err {
            InsightError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            InsightError::NoTable => StatusCode::CONFLICT,
        };
        Self { status, message: err.to_string() }
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        Self { status: StatusCode::UNPROCESSABLE_ENTITY, message: err.to_string() }
    }
}

fn session_not_found(session_id: Uuid) -> ApiError {
    ApiError { status: StatusCode::NOT_FOUND, message: format!("session not found: {session_id}") }
}

// =============================================================================
// DTOS
// =============================================================================

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// Full session snapshot the page renders from.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub raw_input: String,
    pub table: Option<DataTable>,
    pub suggested_chart: ChartKind,
    pub insight_text: String,
    /// Chart configuration defaults; `None` when there is no table or it
    /// has fewer than two columns (configuration disabled).
    pub config: Option<ChartConfig>,
}

#[derive(Deserialize)]
pub struct CleanBody {
    pub raw_text: String,
}

#[derive(Serialize)]
pub struct SampleResponse {
    pub text: &'static str,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/session` — start a fresh session with default state.
pub async fn create_session(State(state): State<AppState>) -> Json<SessionCreated> {
    let session_id = state.create_session().await;
    tracing::info!(%session_id, "session created");
    Json(SessionCreated { session_id })
}

/// `GET /api/session/:id` — current session snapshot.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let config = session
        .cleaned_table
        .as_ref()
        .and_then(|table| ChartConfig::defaults(table, session.suggested_chart));

    Ok(Json(SessionSnapshot {
        session_id,
        raw_input: session.raw_input.clone(),
        table: session.cleaned_table.clone(),
        suggested_chart: session.suggested_chart,
        insight_text: session.insight_text.clone(),
        config,
    }))
}

/// `GET /api/sample` — the built-in messy example.
pub async fn sample() -> Json<SampleResponse> {
    Json(SampleResponse { text: SAMPLE_DATA })
}

/// `POST /api/session/:id/clean` — run the cleaning request and return
/// the new snapshot.
pub async fn clean(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<CleanBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let outcome = clean::handle_clean(&state, session_id, &body.raw_text).await?;
    Ok(Json(SessionSnapshot {
        session_id,
        raw_input: body.raw_text,
        table: Some(outcome.table),
        suggested_chart: outcome.suggested_chart,
        insight_text: String::new(),
        config: outcome.config,
    }))
}

/// `POST /api/session/:id/chart` — build a renderable chart from the
/// stored table. Never mutates the session; a bad configuration is a
/// 422 with the render error message.
pub async fn chart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(config): Json<ChartConfig>,
) -> Result<Json<ChartSpec>, ApiError> {
    let table = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        session
            .cleaned_table
            .clone()
            .ok_or_else(|| ApiError { status: StatusCode::CONFLICT, message: "no cleaned table yet".into() })?
    };

    let spec = chart::build_chart(&table, &config)?;
    Ok(Json(spec))
}

/// `POST /api/session/:id/insight` — run the insight request. The
/// response always carries displayable text (genuine insight or an
/// error description).
pub async fn insight(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<InsightResponse>, ApiError> {
    let text = insight::handle_insight(&state, session_id).await?;
    Ok(Json(InsightResponse { insight: text }))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
