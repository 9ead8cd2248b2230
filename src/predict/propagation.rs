use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use crate::predict::error::PredictError;
use crate::predict::observer::{Observer, WGS84_A_KM, WGS84_E2};
use crate::predict::types::PositionSample;

/// Element sets older than this are refused. TLE accuracy decays within
/// days; a month out the state vector is no longer meaningful.
pub const MAX_ELEMENT_AGE_DAYS: i64 = 30;

/// Geodetic point directly beneath a satellite.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SubPoint {
    pub time: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Topocentric look angles for `observer` at `instant`.
///
/// Pure function of its inputs. The line of sight from the site to the
/// propagated satellite position is resolved along the site's local
/// east/north/up axes; azimuth and elevation fall out of that
/// decomposition and the slant range is the vector's length.
pub fn observe(
    elements: &Elements,
    constants: &Constants,
    observer: &Observer,
    instant: DateTime<Utc>,
) -> Result<PositionSample, PredictError> {
    let sat = propagate_ecef(elements, constants, instant)?;
    let site = observer.position_ecef_km();
    let dx = sat[0] - site[0];
    let dy = sat[1] - site[1];
    let dz = sat[2] - site[2];
    let range_km = (dx * dx + dy * dy + dz * dz).sqrt();

    let (sin_lat, cos_lat) = observer.lat_rad().sin_cos();
    let (sin_lon, cos_lon) = observer.lon_rad().sin_cos();
    // component of the line of sight pointing away from the pole axis,
    // in the site's meridian plane
    let meridian = cos_lon * dx + sin_lon * dy;
    let east = cos_lon * dy - sin_lon * dx;
    let north = cos_lat * dz - sin_lat * meridian;
    let up = cos_lat * meridian + sin_lat * dz;

    Ok(PositionSample {
        time: instant,
        // clamp guards asin against rounding when the satellite is at zenith
        elevation_deg: (up / range_km).clamp(-1.0, 1.0).asin().to_degrees(),
        azimuth_deg: east.atan2(north).to_degrees().rem_euclid(360.0),
        range_km,
    })
}

/// Geodetic sub-point of the satellite at `instant`.
pub fn subpoint(
    elements: &Elements,
    constants: &Constants,
    instant: DateTime<Utc>,
) -> Result<SubPoint, PredictError> {
    let ecef = propagate_ecef(elements, constants, instant)?;
    let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(ecef);
    Ok(SubPoint {
        time: instant,
        latitude_deg,
        longitude_deg,
        altitude_km,
    })
}

/// SGP4 state at `instant`, rotated from TEME into the Earth-fixed frame
/// about the pole by Greenwich sidereal time.
fn propagate_ecef(
    elements: &Elements,
    constants: &Constants,
    instant: DateTime<Utc>,
) -> Result<[f64; 3], PredictError> {
    let age_days = (instant.naive_utc() - elements.datetime).num_days();
    if age_days.abs() > MAX_ELEMENT_AGE_DAYS {
        return Err(PredictError::StaleElements {
            age_days,
            max_days: MAX_ELEMENT_AGE_DAYS,
        });
    }

    let minutes = elements
        .datetime_to_minutes_since_epoch(&instant.naive_utc())
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| PredictError::Propagation(e.to_string()))?;

    let gmst =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()));
    let (sin_g, cos_g) = gmst.sin_cos();
    let [x, y, z] = prediction.position;

    Ok([x * cos_g + y * sin_g, y * cos_g - x * sin_g, z])
}

/// Iterative ECEF to WGS-84 geodetic conversion. Converges to well under
/// a meter in a handful of rounds for near-Earth orbits.
fn ecef_to_geodetic(ecef: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = ecef;
    let longitude = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut latitude = z.atan2(p * (1.0 - WGS84_E2));
    let mut altitude_km = 0.0;
    for _ in 0..5 {
        let sin_lat = latitude.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        altitude_km = p / latitude.cos() - n;
        latitude = z.atan2(p * (1.0 - WGS84_E2 * n / (n + altitude_km)));
    }

    (
        latitude.to_degrees(),
        longitude.to_degrees(),
        altitude_km,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::Duration;

    const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn iss() -> crate::catalog::Satellite {
        Catalog::from_tle_text(ISS_TLE)
            .expect("valid TLE")
            .take("ISS (ZARYA)")
            .expect("present")
    }

    #[test]
    fn observe_is_deterministic() {
        let sat = iss();
        let obs = Observer::new(38.7, -9.1, 0.0);
        let t = sat.epoch() + Duration::minutes(30);
        let a = observe(&sat.elements, &sat.constants, &obs, t).expect("propagates");
        let b = observe(&sat.elements, &sat.constants, &obs, t).expect("propagates");
        assert_eq!(a, b);
    }

    #[test]
    fn observe_angles_are_in_range() {
        let sat = iss();
        let obs = Observer::new(38.7, -9.1, 0.0);
        for minute in (0..180).step_by(7) {
            let t = sat.epoch() + Duration::minutes(minute);
            let sample = observe(&sat.elements, &sat.constants, &obs, t).expect("propagates");
            assert!(
                (0.0..360.0).contains(&sample.azimuth_deg),
                "azimuth {} out of range",
                sample.azimuth_deg
            );
            assert!(sample.elevation_deg >= -90.0 && sample.elevation_deg <= 90.0);
            // LEO slant range: overhead altitude up to past-the-horizon
            assert!(
                sample.range_km > 300.0 && sample.range_km < 13000.0,
                "range {} km unexpected for LEO",
                sample.range_km
            );
        }
    }

    #[test]
    fn stale_elements_are_refused() {
        let sat = iss();
        let obs = Observer::new(38.7, -9.1, 0.0);
        let t = sat.epoch() + Duration::days(MAX_ELEMENT_AGE_DAYS + 1);
        match observe(&sat.elements, &sat.constants, &obs, t) {
            Err(PredictError::StaleElements { age_days, .. }) => {
                assert!(age_days > MAX_ELEMENT_AGE_DAYS)
            }
            other => panic!("expected StaleElements, got {other:?}"),
        }
    }

    #[test]
    fn site_ecef_inverts_to_its_geodetic_coordinates() {
        let obs = Observer::new(38.7, -9.1, 250.0);
        let (lat, lon, alt) = ecef_to_geodetic(obs.position_ecef_km());
        assert!((lat - 38.7).abs() < 1e-6, "latitude drifted to {lat}");
        assert!((lon + 9.1).abs() < 1e-6, "longitude drifted to {lon}");
        assert!((alt - 0.25).abs() < 1e-3, "altitude drifted to {alt} km");
    }

    #[test]
    fn subpoint_stays_within_orbit_bounds() {
        let sat = iss();
        let t = sat.epoch() + Duration::minutes(10);
        let sp = subpoint(&sat.elements, &sat.constants, t).expect("propagates");
        // inclination bounds the reachable latitudes
        assert!(sp.latitude_deg.abs() <= 52.0, "latitude {}", sp.latitude_deg);
        assert!((-180.0..=180.0).contains(&sp.longitude_deg));
        assert!(
            sp.altitude_km > 300.0 && sp.altitude_km < 450.0,
            "ISS altitude {} km unexpected",
            sp.altitude_km
        );
    }

    #[test]
    fn geodetic_round_trip_at_equator() {
        let (lat, lon, alt) = ecef_to_geodetic([WGS84_A_KM + 400.0, 0.0, 0.0]);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!((alt - 400.0).abs() < 0.01);
    }
}
