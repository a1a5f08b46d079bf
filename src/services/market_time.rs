use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, Result};

/// Formats the stock provider uses for its "Last Refreshed" stamp.
const REFRESH_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"];

/// Parse an IANA-style timezone name from provider metadata (e.g.
/// "US/Eastern").
pub fn parse_market_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|e| AppError::Parse(format!("unknown market timezone '{}': {}", name, e)))
}

/// Parse a timestamp string in `fmt` and attach `tz` as its zone. A
/// date-only format yields midnight in that zone.
pub fn parse_in_zone(value: &str, fmt: &str, tz: Tz) -> Result<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(value, fmt)
        .or_else(|_| NaiveDate::parse_from_str(value, fmt).map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|e| AppError::Parse(format!("invalid timestamp '{}': {}", value, e)))?;
    tz.from_local_datetime(&naive).single().ok_or_else(|| {
        AppError::Parse(format!(
            "ambiguous or nonexistent local time '{}' in {}",
            value, tz
        ))
    })
}

/// Parse the provider's "Last Refreshed" stamp, which is sometimes a full
/// timestamp and sometimes a bare date.
pub fn parse_refresh_stamp(value: &str, tz: Tz) -> Result<DateTime<Tz>> {
    for fmt in REFRESH_FORMATS {
        if let Ok(parsed) = parse_in_zone(value, fmt, tz) {
            return Ok(parsed);
        }
    }
    Err(AppError::Parse(format!(
        "unrecognized refresh stamp '{}'",
        value
    )))
}

/// The most recent fully-closed calendar day in the market's timezone,
/// relative to `now_utc` (injected so tests can pin the clock).
pub fn yesterday_in(tz: Tz, now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.with_timezone(&tz).date_naive() - Days::new(1)
}

/// Start of an inclusive `window_days`-day window ending on `end`.
pub fn news_window_start(end: NaiveDate, window_days: u64) -> NaiveDate {
    end - Days::new(window_days.saturating_sub(1))
}
