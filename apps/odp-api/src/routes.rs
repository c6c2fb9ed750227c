use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/bot/ask", post(ask))
		.route("/bot/ask/{deal_id}", post(ask_scoped))
		.route("/bot/generate-draft", post(generate_draft))
		.route("/bot/conversation/{session_id}", get(get_conversation).delete(clear_conversation))
		.route("/bot/sessions/{user_id}", get(list_sessions))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/healthz", get(healthz))
		.route("/admin/ensure-schema", post(ensure_schema))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct AskRequest {
	question: String,
	user_id: String,
	session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateDraftRequest {
	session_id: String,
	user_id: String,
}

#[derive(Debug, Deserialize)]
struct ConversationQuery {
	limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ClearConversationResponse {
	session_id: String,
	cleared: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
	status: &'static str,
}

async fn ask(State(state): State<AppState>, Json(payload): Json<AskRequest>) -> Result<Json<Envelope<odp_service::AskResponse>>, ApiError> {
	let response = state
		.service
		.ask(&payload.question, &payload.user_id, payload.session_id.as_deref(), None)
		.await?;

	Ok(Json(Envelope::success(response)))
}

async fn ask_scoped(
	State(state): State<AppState>,
	Path(deal_id): Path<Uuid>,
	Json(payload): Json<AskRequest>,
) -> Result<Json<Envelope<odp_service::AskResponse>>, ApiError> {
	let response = state
		.service
		.ask(&payload.question, &payload.user_id, payload.session_id.as_deref(), Some(deal_id))
		.await?;

	Ok(Json(Envelope::success(response)))
}

async fn generate_draft(
	State(state): State<AppState>,
	Json(payload): Json<GenerateDraftRequest>,
) -> Result<Json<Envelope<odp_service::AskResponse>>, ApiError> {
	let response = state.service.generate_draft(&payload.session_id, &payload.user_id).await?;

	Ok(Json(Envelope::success(response)))
}

async fn get_conversation(
	State(state): State<AppState>,
	Path(session_id): Path<String>,
	Query(query): Query<ConversationQuery>,
) -> Result<Json<Envelope<odp_service::ConversationResponse>>, ApiError> {
	let response = state.service.get_conversation(&session_id, query.limit).await?;

	Ok(Json(Envelope::success(response)))
}

async fn clear_conversation(
	State(state): State<AppState>,
	Path(session_id): Path<String>,
) -> Result<Json<Envelope<ClearConversationResponse>>, ApiError> {
	let cleared = state.service.clear_conversation(&session_id).await?;

	Ok(Json(Envelope::success(ClearConversationResponse { session_id, cleared })))
}

async fn list_sessions(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<Json<Envelope<Vec<odp_service::SessionSummary>>>, ApiError> {
	let sessions = state.service.list_sessions(&user_id).await?;

	Ok(Json(Envelope::success(sessions)))
}

async fn healthz() -> Json<HealthResponse> {
	Json(HealthResponse { status: "ok" })
}

async fn ensure_schema(State(state): State<AppState>) -> Result<Json<Envelope<HealthResponse>>, ApiError> {
	state.service.ensure_schema().await.map_err(|err| {
		tracing::error!(error = %err, "schema bootstrap failed");
		ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "SCHEMA_BOOTSTRAP_FAILED", err.to_string())
	})?;

	Ok(Json(Envelope::success(HealthResponse { status: "ok" })))
}

/// §6's `{status:"success", data:<response>}` success envelope.
#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
	status: &'static str,
	data: T,
}

impl<T: Serialize> Envelope<T> {
	fn success(data: T) -> Self {
		Self { status: "success", data }
	}
}

/// §6's `{status:"error", error_code, message, details?}` error envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
	status: &'static str,
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<odp_service::Error> for ApiError {
	fn from(err: odp_service::Error) -> Self {
		let status = match err.code() {
			"NO_CONVERSATION" | "NO_QUESTION" => StatusCode::NOT_FOUND,
			"INVALID_REQUEST" => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		ApiError::new(status, err.code(), err.to_string())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { status: "error", error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
