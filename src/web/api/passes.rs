use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::predict::{find_passes, Observer};
use crate::report::PredictionReport;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PassesQuery {
    /// Window start; defaults to now.
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub start: Option<DateTime<Utc>>,
    /// Window end; defaults to start + 24h.
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub min_elevation: Option<f64>,
    /// IANA timezone for report times; defaults to the configured one.
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PassesResponse {
    pub satellite: String,
    pub count: usize,
    pub passes: Vec<PredictionReport>,
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "predict",
    params(
        ("start" = Option<String>, Query, description = "Window start (RFC3339), default now"),
        ("end" = Option<String>, Query, description = "Window end (RFC3339), default start + 24h"),
        ("min_elevation" = Option<f64>, Query, description = "Minimum elevation (degrees)"),
        ("timezone" = Option<String>, Query, description = "IANA timezone for report times")
    ),
    responses(
        (status = 200, description = "Complete passes in the window", body = PassesResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Satellite not in catalog"),
        (status = 503, description = "Catalog unreachable")
    )
)]
pub async fn list_passes(
    State(state): State<AppState>,
    Query(query): Query<PassesQuery>,
) -> ApiResult<impl IntoResponse> {
    let config = &state.config;
    let station = Observer::from_coordinates(
        &config.station.coordinates,
        Some(config.station.altitude_m),
    )
    .ok_or_else(|| ApiError::Validation("Invalid station coordinates".into()))?;

    let start = query.start.unwrap_or_else(Utc::now);
    let end = query.end.unwrap_or(start + Duration::hours(24));
    if end <= start {
        return Err(ApiError::Validation("end must be after start".into()));
    }

    let min_elevation = query
        .min_elevation
        .unwrap_or(config.predict.default_min_elevation);

    let timezone = match &query.timezone {
        Some(name) => name
            .parse()
            .map_err(|e| ApiError::Validation(format!("invalid timezone: {e}")))?,
        None => config.predict.timezone,
    };

    let satellite = state.satellite().await?;
    let passes = find_passes(
        &satellite.elements,
        &satellite.constants,
        &station,
        start,
        end,
        min_elevation,
    )?;

    let reports: Vec<PredictionReport> = passes
        .iter()
        .map(|pass| PredictionReport::build(&satellite.name, pass, timezone))
        .collect();

    Ok((
        StatusCode::OK,
        Json(PassesResponse {
            satellite: satellite.name.clone(),
            count: reports.len(),
            passes: reports,
        }),
    ))
}

fn deserialize_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
