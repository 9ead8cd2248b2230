use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::observer::Observer;
use crate::predict::propagation::observe;
use crate::predict::types::{Pass, PositionSample};

/// Coarse scan step. Must stay well under a LEO pass length (minutes)
/// so no full pass fits between two samples.
const COARSE_STEP_SECONDS: i64 = 60;
/// Crossings and culminations are refined until the bracket is this small.
const REFINE_TOLERANCE_MS: i64 = 500;

const INV_PHI: f64 = 0.618_033_988_749_895;

/// Find every complete pass of the satellite above `min_elevation_deg`
/// within `[start, end]`, ordered by time.
///
/// Only complete rise/culmination/set triples are returned: a pass still
/// in progress when the window ends is dropped, and a pass already in
/// progress when the window begins (no observable rise) is skipped until
/// it sets. A window with no passes yields an empty vector.
pub fn find_passes(
    elements: &Elements,
    constants: &Constants,
    observer: &Observer,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_elevation_deg: f64,
) -> Result<Vec<Pass>, PredictError> {
    let step = Duration::seconds(COARSE_STEP_SECONDS);
    let mut passes = Vec::new();

    let first = observe(elements, constants, observer, start)?;
    let mut prev_above = first.elevation_deg >= min_elevation_deg;
    let mut rise: Option<PositionSample> = None;
    let mut peak_time = start;
    let mut peak_elevation = f64::NEG_INFINITY;

    let mut cursor = start + step;
    while cursor <= end {
        let sample = observe(elements, constants, observer, cursor)?;
        let above = sample.elevation_deg >= min_elevation_deg;

        if above && !prev_above {
            let crossing = refine_crossing(
                elements,
                constants,
                observer,
                cursor - step,
                cursor,
                min_elevation_deg,
                true,
            )?;
            rise = Some(crossing);
            peak_time = cursor;
            peak_elevation = sample.elevation_deg;
        } else if above && rise.is_some() {
            if sample.elevation_deg > peak_elevation {
                peak_elevation = sample.elevation_deg;
                peak_time = cursor;
            }
        } else if !above && prev_above {
            if let Some(rise_sample) = rise.take() {
                let set_sample = refine_crossing(
                    elements,
                    constants,
                    observer,
                    cursor - step,
                    cursor,
                    min_elevation_deg,
                    false,
                )?;
                let culmination = refine_culmination(
                    elements,
                    constants,
                    observer,
                    rise_sample.time.max(peak_time - step),
                    set_sample.time.min(peak_time + step),
                )?;
                passes.push(Pass {
                    rise: rise_sample,
                    culmination,
                    set: set_sample,
                });
            }
        }

        prev_above = above;
        cursor += step;
    }

    // A rise with no matching set before the window ends is an
    // incomplete pass; it is dropped, not returned.
    Ok(passes)
}

/// Bisect the threshold crossing between a below and an above sample.
fn refine_crossing(
    elements: &Elements,
    constants: &Constants,
    observer: &Observer,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    min_elevation_deg: f64,
    rising: bool,
) -> Result<PositionSample, PredictError> {
    let mut low = before;
    let mut high = after;
    let tolerance = Duration::milliseconds(REFINE_TOLERANCE_MS);

    while high - low > tolerance {
        let mid = low + (high - low) / 2;
        let sample = observe(elements, constants, observer, mid)?;
        let above = sample.elevation_deg >= min_elevation_deg;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    observe(elements, constants, observer, high)
}

/// Golden-section search for the elevation maximum between two instants.
/// Elevation is treated as unimodal over a single pass; orbits with more
/// than one culmination per pass collapse to whichever peak the bracket
/// converges on.
fn refine_culmination(
    elements: &Elements,
    constants: &Constants,
    observer: &Observer,
    bracket_start: DateTime<Utc>,
    bracket_end: DateTime<Utc>,
) -> Result<PositionSample, PredictError> {
    let at = |offset_ms: f64| bracket_start + Duration::milliseconds(offset_ms.round() as i64);
    let elevation = |offset_ms: f64| -> Result<f64, PredictError> {
        Ok(observe(elements, constants, observer, at(offset_ms))?.elevation_deg)
    };

    let mut lo = 0.0;
    let mut hi = (bracket_end - bracket_start).num_milliseconds().max(0) as f64;
    let mut c = hi - (hi - lo) * INV_PHI;
    let mut d = lo + (hi - lo) * INV_PHI;
    let mut elevation_c = elevation(c)?;
    let mut elevation_d = elevation(d)?;

    while hi - lo > REFINE_TOLERANCE_MS as f64 {
        if elevation_c > elevation_d {
            hi = d;
            d = c;
            elevation_d = elevation_c;
            c = hi - (hi - lo) * INV_PHI;
            elevation_c = elevation(c)?;
        } else {
            lo = c;
            c = d;
            elevation_c = elevation_d;
            d = lo + (hi - lo) * INV_PHI;
            elevation_d = elevation(d)?;
        }
    }

    observe(elements, constants, observer, at((lo + hi) / 2.0))
}
