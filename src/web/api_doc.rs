use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::passes::{PassesQuery, PassesResponse};
use super::api::position::PositionResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::passes::list_passes,
        super::api::position::current_position,
    ),
    components(
        schemas(
            PassesQuery,
            PassesResponse,
            PositionResponse,
            ErrorResponse,
            crate::report::PredictionReport,
            crate::report::ReportEvent,
            crate::report::Cardinal,
            crate::predict::SubPoint,
        )
    ),
    info(
        title = "Overpass API",
        description = "Satellite pass prediction for a configured ground station",
        version = "0.1.0"
    ),
    tags(
        (name = "predict", description = "Pass prediction and current position")
    )
)]
pub struct ApiDoc;
