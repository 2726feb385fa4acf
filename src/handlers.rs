use axum::{Json, extract::Query, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    AppState,
    auth::verify_token,
    error::ApiError,
    generator::{generate, section_by_day},
    models::{Booking, FeedSnapshot, LoadOutcome, Section},
    validation::{parse_start, validate_days},
};

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub start: Option<String>,
    pub days: Option<i64>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratedFeed {
    pub total: usize,
    pub sections: Vec<Section>,
}

type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

fn authorize(state: &AppState, auth: BearerHeader, token: Option<&str>) -> Result<(), ApiError> {
    verify_token(&state.settings.auth_token, auth.map(|TypedHeader(a)| a), token)
}

#[utoipa::path(get, path = "/", tag = "bookings")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Booking Feed API",
        "endpoints": {
            "/bookings": "Held bookings grouped by day",
            "/bookings/more": "Load the next page of bookings",
            "/bookings/refresh": "Discard held bookings and reload from the anchor date",
            "/bookings/generate": "Generate a one-off batch without touching the feed",
            "/bookings.ical": "Download held bookings as iCal file"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "bookings")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "bookings")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/bookings",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Held bookings grouped by day", body = FeedSnapshot),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn get_bookings(
    State(state): State<AppState>,
    auth: BearerHeader,
    Query(query): Query<TokenQuery>,
) -> Result<Json<FeedSnapshot>, ApiError> {
    authorize(&state, auth, query.token.as_deref())?;
    Ok(Json(state.feed.snapshot().await))
}

#[utoipa::path(
    post,
    path = "/bookings/more",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Outcome of the load", body = LoadOutcome),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn load_more(
    State(state): State<AppState>,
    auth: BearerHeader,
    Query(query): Query<TokenQuery>,
) -> Result<Json<LoadOutcome>, ApiError> {
    authorize(&state, auth, query.token.as_deref())?;
    Ok(Json(state.feed.load_more().await))
}

#[utoipa::path(
    post,
    path = "/bookings/refresh",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Outcome of the load", body = LoadOutcome),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn refresh(
    State(state): State<AppState>,
    auth: BearerHeader,
    Query(query): Query<TokenQuery>,
) -> Result<Json<LoadOutcome>, ApiError> {
    authorize(&state, auth, query.token.as_deref())?;
    Ok(Json(state.feed.refresh().await))
}

#[utoipa::path(
    get,
    path = "/bookings/generate",
    params(
        ("start" = Option<String>, Query, description = "First day, YYYY-MM-DD (defaults to the anchor date)"),
        ("days" = Option<i64>, Query, description = "Number of days (0-366)"),
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "Generated bookings grouped by day", body = GeneratedFeed),
        (status = 400, description = "Invalid start date or day count"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn generate_bookings(
    State(state): State<AppState>,
    auth: BearerHeader,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<GeneratedFeed>, ApiError> {
    authorize(&state, auth, query.token.as_deref())?;

    let config = state.feed.config();
    let start = parse_start(query.start.as_deref(), config.anchor_date)?;
    let days = validate_days(query.days.unwrap_or(config.initial_days.into()))?;

    let bookings: Vec<Booking> = generate(start, days);
    Ok(Json(GeneratedFeed {
        total: bookings.len(),
        sections: section_by_day(&bookings),
    }))
}

#[utoipa::path(
    get,
    path = "/bookings.ical",
    params(
        ("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 401, description = "Invalid authentication token"),
        (status = 404, description = "No bookings loaded")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "bookings"
)]
pub async fn get_ical(
    State(state): State<AppState>,
    auth: BearerHeader,
    Query(query): Query<TokenQuery>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, auth, query.token.as_deref())?;

    let bookings = state.feed.bookings().await;
    if bookings.is_empty() {
        return Err(ApiError::NotFound("No bookings loaded".into()));
    }

    let body = state.exporter.generate(&bookings);
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            (
                "content-disposition",
                "attachment; filename=bookings.ics",
            ),
        ],
        body,
    ))
}
