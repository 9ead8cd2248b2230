use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Topocentric look angles toward a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PositionSample {
    pub time: DateTime<Utc>,
    /// Elevation above the horizon; negative when the satellite is below it.
    pub elevation_deg: f64,
    /// Compass azimuth, 0..360 from north through east.
    pub azimuth_deg: f64,
    /// Slant range from observer to satellite.
    pub range_km: f64,
}

/// One complete pass over an observer.
///
/// Always a full rise/culmination/set triple; passes cut off by the
/// search window are never emitted.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Pass {
    pub rise: PositionSample,
    pub culmination: PositionSample,
    pub set: PositionSample,
}

impl Pass {
    pub fn duration(&self) -> Duration {
        self.set.time - self.rise.time
    }
}
