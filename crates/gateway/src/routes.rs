use {
    axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
        routing::{delete, get, post},
    },
    serde::Deserialize,
    tracing::info,
};

use crate::{AppState, Result, registration::register_channel};

const DEFAULT_ANNOUNCEMENT_LIMIT: u32 = 50;
const MAX_ANNOUNCEMENT_LIMIT: u32 = 500;

/// Build the admin API router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/channels", get(list_channels).post(add_channel))
        .route("/api/channels/{id}", delete(remove_channel))
        .route("/api/channels/{id}/active", post(set_channel_active))
        .route("/api/announcements", get(list_announcements))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
    }))
}

async fn list_channels(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let channels = state.channels.list_all().await?;
    Ok(Json(serde_json::json!({ "channels": channels })))
}

#[derive(Debug, Deserialize)]
pub struct AddChannelRequest {
    pub channel_identifier: String,
    pub channel_name: String,
    #[serde(default)]
    pub added_by: Option<String>,
}

async fn add_channel(
    State(state): State<AppState>,
    Json(body): Json<AddChannelRequest>,
) -> Result<impl IntoResponse> {
    let channel = register_channel(
        state.channels.as_ref(),
        state.platform.as_ref(),
        &body.channel_identifier,
        &body.channel_name,
        body.added_by.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "channel": channel })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

async fn set_channel_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SetActiveRequest>,
) -> Result<impl IntoResponse> {
    state.channels.set_active(id, body.active).await?;
    info!(channel_id = id, active = body.active, "channel active flag updated");
    Ok(Json(serde_json::json!({ "ok": true })))
}

async fn remove_channel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.channels.remove(id).await?;
    info!(channel_id = id, "channel removed");
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct AnnouncementQuery {
    pub limit: Option<u32>,
}

async fn list_announcements(
    State(state): State<AppState>,
    Query(query): Query<AnnouncementQuery>,
) -> Result<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ANNOUNCEMENT_LIMIT)
        .clamp(1, MAX_ANNOUNCEMENT_LIMIT);
    let announcements = state.announcements.list_recent(limit).await?;
    Ok(Json(serde_json::json!({ "announcements": announcements })))
}
