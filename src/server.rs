//! HTTP API in front of the planner, the gazetteer and the report store.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Timelike;
use geo::{BoundingRect, LineString};
use h3o::Resolution;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::config::Config;
use crate::distance::format_distance;
use crate::error::{LocateError, PlanError, ReportError};
use crate::gazetteer::{Gazetteer, LocationInput};
use crate::models::{GeoPoint, NamedLocation, ReportType, RouteVariant, SafetyReport, TravelMode};
use crate::planner::plan_routes;
use crate::reports::{NewReport, ReportPatch, ReportStore};
use crate::safety::{DEFAULT_RESOLUTION, Hexbin, SafetyMap};
use crate::travel::format_duration;

// Shared State for concurrency
pub struct AppState {
    pub gazetteer: Gazetteer,
    pub reports: ReportStore,
}

impl AppState {
    /// Builds the gazetteer and seeds the report store from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured location or seed report is invalid.
    pub fn from_config(config: &Config) -> Result<Self, crate::error::ConfigError> {
        Ok(Self {
            gazetteer: config.gazetteer()?,
            reports: ReportStore::with_reports(config.seed_reports()?),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // Allows the map frontend to talk to this API from any origin
    let cors = CorsLayer::new()
        .allow_methods(tower_http::cors::Any)
        .allow_origin(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/routes", post(calculate_routes))
        .route("/api/locations", get(search_locations))
        .route("/api/locations/nearest", get(nearest_location))
        .route("/api/reports", get(list_reports).post(create_report))
        .route("/api/reports/:id", put(update_report))
        .route("/api/reports/:id/upvote", post(upvote_report))
        .route("/api/hexbins", get(hexbins))
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until the process exits.
///
/// # Errors
///
/// Returns an error if the state cannot be built from `config` or the
/// listener cannot bind.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    log::info!(
        "Gazetteer has {} locations, report store has {} reports",
        state.gazetteer.len(),
        state.reports.len().await
    );

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("API server running on http://{addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

// --- Errors ---

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0}")]
    NotFound(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Plan(_)
            | Self::Locate(LocateError::Invalid(_))
            | Self::Report(ReportError::InvalidLocation(_)) => StatusCode::BAD_REQUEST,
            Self::Locate(LocateError::Unknown(_))
            | Self::Report(ReportError::NotFound(_))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("Request failed with {status}: {self}");
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

// --- API DTOs ---

#[derive(Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    origin: Option<LocationInput>,
    #[serde(default)]
    destination: Option<LocationInput>,
    #[serde(default)]
    mode: Option<String>,
    /// Local hour 0-23; defaults to the server clock.
    #[serde(default)]
    hour: Option<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    origin: NamedLocation,
    destination: NamedLocation,
    mode: TravelMode,
    hour: u8,
    routes: Vec<RouteSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    #[serde(flatten)]
    route: RouteVariant,
    geometry: GeoJsonLineString,
    distance_text: String,
    duration_text: String,
}

#[derive(Serialize)]
pub struct GeoJsonLineString {
    r#type: String,
    coordinates: Vec<[f64; 2]>, // [lon, lat] standard for GeoJSON
    /// `[min_lon, min_lat, max_lon, max_lat]`, absent for an empty path.
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<[f64; 4]>,
}

impl From<&[GeoPoint]> for GeoJsonLineString {
    fn from(points: &[GeoPoint]) -> Self {
        let coordinates: Vec<[f64; 2]> = points.iter().map(|p| [p.lng, p.lat]).collect();
        let bbox = LineString::<f64>::from(coordinates.clone())
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

        Self {
            r#type: "LineString".to_string(),
            coordinates,
            bbox,
        }
    }
}

impl From<RouteVariant> for RouteSummary {
    fn from(route: RouteVariant) -> Self {
        Self {
            geometry: GeoJsonLineString::from(route.coordinates.as_slice()),
            distance_text: format_distance(route.distance_meters),
            duration_text: format_duration(route.duration_seconds),
            route,
        }
    }
}

#[derive(Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
pub struct PointQuery {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
pub struct ReportFilter {
    #[serde(default, rename = "type")]
    report_type: Option<ReportType>,
}

#[derive(Deserialize)]
pub struct HexbinQuery {
    #[serde(default)]
    resolution: Option<u8>,
}

// --- Handlers ---

async fn calculate_routes(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Json(payload) = payload?;

    let mode = match payload.mode.as_deref() {
        None => TravelMode::Driving,
        Some(mode) => TravelMode::from_str(mode.trim())
            .map_err(|_| ApiError::BadRequest(format!("unknown travel mode {mode:?}")))?,
    };
    let hour = match payload.hour {
        Some(hour) if hour > 23 => {
            return Err(ApiError::BadRequest(format!(
                "hour {hour} is outside 0-23"
            )));
        }
        Some(hour) => hour,
        None => current_hour(),
    };

    let origin = state.gazetteer.locate(payload.origin, "origin")?;
    let destination = state.gazetteer.locate(payload.destination, "destination")?;

    let reports = state.reports.active_snapshot().await;
    let routes = plan_routes(&origin, &destination, mode, &reports, hour)?;

    log::info!(
        "Planned {mode} routes {:?} -> {:?} (safety score {})",
        origin.name,
        destination.name,
        routes[2].safety_score.unwrap_or_default()
    );

    Ok(Json(RouteResponse {
        origin,
        destination,
        mode,
        hour,
        routes: routes.into_iter().map(RouteSummary::from).collect(),
    }))
}

async fn search_locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Json<Vec<NamedLocation>> {
    Json(
        state
            .gazetteer
            .suggest(&query.q)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn nearest_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointQuery>,
) -> Result<Json<NamedLocation>, ApiError> {
    let point = GeoPoint::new(query.lat, query.lng).map_err(LocateError::from)?;
    state
        .gazetteer
        .nearest(point)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no locations configured".to_string()))
}

async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ReportFilter>,
) -> Json<Vec<SafetyReport>> {
    Json(state.reports.list(filter.report_type).await)
}

async fn create_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewReport>, JsonRejection>,
) -> Result<(StatusCode, Json<SafetyReport>), ApiError> {
    let Json(payload) = payload?;
    let report = state.reports.create(payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn update_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ReportPatch>, JsonRejection>,
) -> Result<Json<SafetyReport>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.reports.update(id, patch).await?))
}

async fn upvote_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SafetyReport>, ApiError> {
    Ok(Json(state.reports.upvote(id).await?))
}

async fn hexbins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HexbinQuery>,
) -> Result<Json<Vec<Hexbin>>, ApiError> {
    let resolution = match query.resolution {
        None => DEFAULT_RESOLUTION,
        Some(value) => Resolution::try_from(value)
            .map_err(|_| ApiError::BadRequest(format!("invalid H3 resolution {value}")))?,
    };

    let reports = state.reports.active_snapshot().await;
    Ok(Json(SafetyMap::from_reports(&reports, resolution).hexbins()))
}

fn current_hour() -> u8 {
    u8::try_from(chrono::Local::now().hour()).unwrap_or_default()
}
