//! API routes for papod

use crate::server::AppState;
use crate::service::ServiceError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use papo_shared::{CommandResponse, NewUser, UserRecord, UserRole, UserUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

type AppStateArc = Arc<AppState>;

type ApiResult<T> = Result<T, (StatusCode, String)>;

fn reject(e: ServiceError) -> (StatusCode, String) {
    let status = e.status();
    if status.is_server_error() {
        error!("  Request failed: {}", e);
    }
    (status, e.to_string())
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub users: usize,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "online".to_string(),
        message: "Papo Social API está funcionando!".to_string(),
    })
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        users: state.service.store().count().await,
    })
}

// ============================================================================
// User Routes
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<UserRole>,
}

/// XP as sent by clients: a number, or a string holding one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XpValue {
    Number(i64),
    Text(String),
}

/// Body of `PUT /users/:id/xp`. A missing `xp` counts as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XpRequest {
    #[serde(default)]
    pub xp: Option<XpValue>,
}

impl XpRequest {
    pub fn amount(&self) -> Option<i64> {
        match &self.xp {
            None => Some(0),
            Some(XpValue::Number(n)) => Some(*n),
            Some(XpValue::Text(t)) => t.trim().parse().ok(),
        }
    }
}

const INVALID_XP_FORMAT: &str = "Formato de XP inválido";

pub fn user_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/", post(create_user).get(list_users))
        .route("/users/:id", get(get_user).put(update_user))
        .route("/users/:id/xp", put(add_xp))
}

async fn create_user(
    State(state): State<AppStateArc>,
    Json(req): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<UserRecord>)> {
    let user = state.service.create_user(req).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(
    State(state): State<AppStateArc>,
    Query(query): Query<ListUsersQuery>,
) -> Json<Vec<UserRecord>> {
    Json(state.service.list_users(query.role).await)
}

async fn get_user(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserRecord>> {
    state.service.get_user(&id).await.map(Json).map_err(reject)
}

async fn update_user(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<Json<UserRecord>> {
    state.service.update_profile(&id, update).await.map(Json).map_err(reject)
}

async fn add_xp(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    payload: Result<Json<XpRequest>, JsonRejection>,
) -> ApiResult<Json<UserRecord>> {
    let amount = match payload {
        Ok(Json(req)) => req.amount(),
        Err(e) => {
            debug!("  Rejected XP body for {}: {}", id, e);
            None
        }
    };
    let amount = amount.ok_or((StatusCode::BAD_REQUEST, INVALID_XP_FORMAT.to_string()))?;
    state.service.add_xp(&id, amount).await.map(Json).map_err(reject)
}

// ============================================================================
// Voice Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommandRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

pub fn voice_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/onboarding/voice", post(onboard_from_voice))
        .route("/voice-command", post(voice_command))
        .route("/voice-command/", post(voice_command))
}

async fn onboard_from_voice(
    State(state): State<AppStateArc>,
    Json(req): Json<OnboardingRequest>,
) -> ApiResult<Json<UserRecord>> {
    state
        .service
        .onboard_from_voice(&req.transcript)
        .await
        .map(Json)
        .map_err(reject)
}

async fn voice_command(
    State(state): State<AppStateArc>,
    Json(req): Json<VoiceCommandRequest>,
) -> Json<CommandResponse> {
    Json(
        state
            .service
            .handle_voice_command(&req.text, req.user_id.as_deref())
            .await,
    )
}
