//! Daily forecast model and the noon sampling over 3-hour buckets

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Largest distance from local noon a bucket may have to represent its day
const NOON_TOLERANCE_MINUTES: i64 = 90;

/// One forecast point representing a day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    /// Start of the forecast bucket
    pub timestamp: DateTime<Utc>,
    /// Offset of the forecast location from UTC, in seconds
    pub utc_offset_seconds: i32,
    /// Temperature in Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity percentage
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

impl DailyForecast {
    /// Bucket time in the forecast location's local time
    #[must_use]
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix());
        self.timestamp.with_timezone(&offset)
    }

    /// Short weekday name ("Mon", "Tue", ...)
    #[must_use]
    pub fn weekday_short(&self) -> String {
        self.local_time().format("%a").to_string()
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature.round() as i64)
    }

    fn minutes_from_noon(&self) -> i64 {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
        (self.local_time().time() - noon).num_minutes().abs()
    }
}

/// Keep the bucket closest to local noon for each local day, first `days` days.
///
/// A day whose closest bucket is more than 90 minutes away from noon (a
/// partial first or last day) is skipped. With 3-hour buckets and a
/// whole-hour multiple-of-three offset this is exactly the 12:00 bucket.
#[must_use]
pub fn pick_daily_noon(entries: Vec<DailyForecast>, days: usize) -> Vec<DailyForecast> {
    let mut per_day: Vec<(NaiveDate, i64, DailyForecast)> = Vec::new();

    for entry in entries {
        let date = entry.local_time().date_naive();
        let distance = entry.minutes_from_noon();
        match per_day.last_mut() {
            Some((last_date, best, kept)) if *last_date == date => {
                if distance < *best {
                    *best = distance;
                    *kept = entry;
                }
            }
            _ => per_day.push((date, distance, entry)),
        }
    }

    per_day
        .into_iter()
        .filter(|(_, distance, _)| *distance <= NOON_TOLERANCE_MINUTES)
        .map(|(_, _, entry)| entry)
        .take(days)
        .collect()
}
