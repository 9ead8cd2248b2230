use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::{subpoint, SubPoint};
use crate::web::api::error::ApiResult;
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionResponse {
    pub satellite: String,
    pub position: SubPoint,
}

#[utoipa::path(
    get,
    path = "/api/position",
    tag = "predict",
    responses(
        (status = 200, description = "Current ground position", body = PositionResponse),
        (status = 404, description = "Satellite not in catalog"),
        (status = 503, description = "Catalog unreachable")
    )
)]
pub async fn current_position(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let satellite = state.satellite().await?;
    let position = subpoint(&satellite.elements, &satellite.constants, Utc::now())?;

    Ok((
        StatusCode::OK,
        Json(PositionResponse {
            satellite: satellite.name.clone(),
            position,
        }),
    ))
}
