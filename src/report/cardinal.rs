use serde::Serialize;
use utoipa::ToSchema;

/// 16-point compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, Serialize, ToSchema)]
pub enum Cardinal {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

const SECTOR_DEG: f64 = 22.5;

impl Cardinal {
    const ROSE: [Cardinal; 16] = [
        Cardinal::N,
        Cardinal::NNE,
        Cardinal::NE,
        Cardinal::ENE,
        Cardinal::E,
        Cardinal::ESE,
        Cardinal::SE,
        Cardinal::SSE,
        Cardinal::S,
        Cardinal::SSW,
        Cardinal::SW,
        Cardinal::WSW,
        Cardinal::W,
        Cardinal::WNW,
        Cardinal::NW,
        Cardinal::NNW,
    ];

    /// Nearest compass point for an azimuth, wrapping at 360°. Ties at
    /// sector boundaries settle to the even index, so 11.25° stays N
    /// while 11.26° becomes NNE.
    pub fn from_azimuth(azimuth_deg: f64) -> Cardinal {
        let sector = (azimuth_deg.rem_euclid(360.0) / SECTOR_DEG).round_ties_even();
        Self::ROSE[sector as usize % 16]
    }
}
