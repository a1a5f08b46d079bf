use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::{AppError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One trading day as reported by the stock provider, with the derived
/// prior-close and day-over-day delta filled in for records that have a
/// predecessor in the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: u64,
    pub prior_day_close: Option<f64>,
    /// Relative change of adjusted close versus the prior trading day.
    pub dod_close_delta: Option<f64>,
}

/// Daily records sorted ascending by date, unique per date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    records: Vec<DailyPriceRecord>,
}

impl PriceSeries {
    /// Build a series from the provider's day -> fields map. Field names
    /// carry a numeric prefix ("5. adjusted close") which is stripped and
    /// normalized before lookup. Pure function of its input: rebuilding
    /// from the same map yields an identical series.
    pub fn from_raw(raw: &Map<String, Value>) -> Result<Self> {
        let mut by_date: BTreeMap<NaiveDate, DailyPriceRecord> = BTreeMap::new();

        for (day, fields) in raw {
            let date = NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|e| {
                AppError::Parse(format!("invalid series date '{}': {}", day, e))
            })?;
            let fields = fields.as_object().ok_or_else(|| {
                AppError::Parse(format!("{}: expected an object of price fields", day))
            })?;

            let fields: HashMap<String, &Value> = fields
                .iter()
                .map(|(key, value)| (normalize_key(key), value))
                .collect();

            let record = DailyPriceRecord {
                date,
                open: field_f64(&fields, date, "open")?,
                high: field_f64(&fields, date, "high")?,
                low: field_f64(&fields, date, "low")?,
                close: field_f64(&fields, date, "close")?,
                adjusted_close: field_f64(&fields, date, "adjusted_close")?,
                volume: field_u64(&fields, date, "volume")?,
                prior_day_close: None,
                dod_close_delta: None,
            };
            by_date.insert(date, record);
        }

        let mut records: Vec<DailyPriceRecord> = by_date.into_values().collect();
        for i in 1..records.len() {
            let prior = records[i - 1].adjusted_close;
            records[i].prior_day_close = Some(prior);
            records[i].dod_close_delta = Some((records[i].adjusted_close - prior) / prior);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[DailyPriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for an exact calendar date. Weekends and holidays have no
    /// record, so callers must handle `None` as "no trigger".
    pub fn record_for(&self, date: NaiveDate) -> Option<&DailyPriceRecord> {
        self.records
            .binary_search_by(|record| record.date.cmp(&date))
            .ok()
            .map(|index| &self.records[index])
    }
}

/// Trigger evaluation: does the move warrant fetching news and alerting?
pub fn breaches_threshold(delta: f64, threshold: f64) -> bool {
    delta.abs() >= threshold
}

/// "5. adjusted close" -> "adjusted_close"; keys without a numeric prefix
/// pass through unchanged.
fn normalize_key(raw: &str) -> String {
    let stripped = raw
        .split_once(". ")
        .filter(|(prefix, _)| prefix.chars().all(|c| c.is_ascii_digit()))
        .map(|(_, rest)| rest)
        .unwrap_or(raw);
    stripped.trim().replace(' ', "_")
}

fn field_f64(fields: &HashMap<String, &Value>, date: NaiveDate, name: &str) -> Result<f64> {
    let value = fields
        .get(name)
        .ok_or_else(|| AppError::Parse(format!("{}: missing '{}' field", date, name)))?;
    match value {
        Value::String(s) => s.trim().parse::<f64>().map_err(|e| {
            AppError::Parse(format!("{}: invalid '{}' value '{}': {}", date, name, s, e))
        }),
        other => other
            .as_f64()
            .ok_or_else(|| AppError::Parse(format!("{}: invalid '{}' value", date, name))),
    }
}

fn field_u64(fields: &HashMap<String, &Value>, date: NaiveDate, name: &str) -> Result<u64> {
    let value = fields
        .get(name)
        .ok_or_else(|| AppError::Parse(format!("{}: missing '{}' field", date, name)))?;
    match value {
        Value::String(s) => s.trim().parse::<u64>().map_err(|e| {
            AppError::Parse(format!("{}: invalid '{}' value '{}': {}", date, name, s, e))
        }),
        other => other
            .as_u64()
            .or_else(|| other.as_f64().map(|v| v as u64))
            .ok_or_else(|| AppError::Parse(format!("{}: invalid '{}' value", date, name))),
    }
}
