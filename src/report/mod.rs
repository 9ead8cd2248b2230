mod cardinal;

pub use cardinal::Cardinal;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::{Pass, PositionSample};

/// One pass event localized for presentation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportEvent {
    /// Wall-clock time in the observer's timezone.
    pub time: DateTime<FixedOffset>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub direction: Cardinal,
    pub range_km: f64,
}

/// A complete pass, localized and ready to present.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PredictionReport {
    pub satellite: String,
    pub rise: ReportEvent,
    pub culmination: ReportEvent,
    pub set: ReportEvent,
    pub duration_seconds: i64,
}

impl PredictionReport {
    /// Localize a complete pass. Total for well-formed triples; timezone
    /// conversion goes through the IANA database, so times on either
    /// side of a DST transition carry their own offsets.
    pub fn build(satellite: &str, pass: &Pass, timezone: Tz) -> PredictionReport {
        PredictionReport {
            satellite: satellite.to_string(),
            rise: localize(&pass.rise, timezone),
            culmination: localize(&pass.culmination, timezone),
            set: localize(&pass.set, timezone),
            duration_seconds: pass.duration().num_seconds(),
        }
    }

    /// Visible duration as minutes and zero-padded seconds.
    pub fn duration_min_sec(&self) -> String {
        format_min_sec(self.duration_seconds)
    }
}

fn localize(sample: &PositionSample, timezone: Tz) -> ReportEvent {
    ReportEvent {
        time: sample.time.with_timezone(&timezone).fixed_offset(),
        elevation_deg: hundredths(sample.elevation_deg),
        // rounding can land exactly on 360.0, wrap again
        azimuth_deg: hundredths(sample.azimuth_deg).rem_euclid(360.0),
        direction: Cardinal::from_azimuth(sample.azimuth_deg),
        range_km: hundredths(sample.range_km),
    }
}

// hundredths of a degree are plenty for naked-eye spotting
fn hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `85 -> "1:25"`. The minutes field never rolls over into hours, so
/// `3600 -> "60:00"`.
pub fn format_min_sec(total_seconds: i64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};

    fn sample(time: chrono::DateTime<Utc>, elevation_deg: f64, azimuth_deg: f64) -> PositionSample {
        PositionSample {
            time,
            elevation_deg,
            azimuth_deg,
            range_km: 500.0,
        }
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_min_sec(85), "1:25");
        assert_eq!(format_min_sec(3600), "60:00");
        assert_eq!(format_min_sec(0), "0:00");
        assert_eq!(format_min_sec(59), "0:59");
        assert_eq!(format_min_sec(600), "10:00");
    }

    #[test]
    fn report_localizes_and_measures_duration() {
        let rise_utc = Utc.with_ymd_and_hms(2024, 6, 1, 21, 10, 0).single().expect("valid");
        let pass = Pass {
            rise: sample(rise_utc, 0.0, 310.0),
            culmination: sample(rise_utc + chrono::Duration::seconds(290), 64.0, 40.0),
            set: sample(rise_utc + chrono::Duration::seconds(585), 0.0, 130.0),
        };
        let report = PredictionReport::build("ISS (ZARYA)", &pass, chrono_tz::Europe::Lisbon);

        assert_eq!(report.duration_seconds, 585);
        assert_eq!(report.duration_min_sec(), "9:45");
        assert_eq!(report.rise.direction, Cardinal::NW);
        assert_eq!(report.culmination.direction, Cardinal::NE);
        assert_eq!(report.set.direction, Cardinal::SE);
        // Lisbon is UTC+1 in June
        assert_eq!(report.rise.time.hour(), 22);
        assert_eq!(report.rise.time.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn events_across_a_dst_transition_carry_their_own_offsets() {
        // Lisbon springs forward at 01:00 UTC on 2024-03-31
        let rise_utc = Utc.with_ymd_and_hms(2024, 3, 31, 0, 55, 0).single().expect("valid");
        let pass = Pass {
            rise: sample(rise_utc, 0.0, 200.0),
            culmination: sample(rise_utc + chrono::Duration::seconds(300), 30.0, 270.0),
            set: sample(rise_utc + chrono::Duration::seconds(600), 0.0, 340.0),
        };
        let report = PredictionReport::build("ISS (ZARYA)", &pass, chrono_tz::Europe::Lisbon);

        assert_eq!(report.rise.time.offset().local_minus_utc(), 0);
        assert_eq!(report.set.time.offset().local_minus_utc(), 3600);
        assert_eq!(report.rise.time.hour(), 0);
        assert_eq!(report.set.time.hour(), 2);
        // wall-clock skips an hour, the duration does not
        assert_eq!(report.duration_seconds, 600);
    }
}
