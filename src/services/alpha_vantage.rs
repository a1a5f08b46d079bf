use serde_json::{Map, Value};
use tracing::info;

use super::http;
use crate::error::{AppError, Result};
use crate::models::PriceSeries;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
const STOCK_FUNCTION: &str = "TIME_SERIES_DAILY_ADJUSTED";
const STOCK_INTERVAL: &str = "60min";

/// Metadata block of the daily series response.
#[derive(Debug, Clone)]
pub struct StockMeta {
    pub symbol: String,
    pub last_refreshed: String,
    pub timezone: String,
}

/// One fetched series plus the raw payload, kept so the caller can write
/// the optional debug dump.
#[derive(Debug, Clone)]
pub struct DailySeries {
    pub meta: StockMeta,
    pub series: PriceSeries,
    pub raw: Value,
}

/// Client for the Alpha Vantage daily adjusted time series endpoint.
pub struct AlphaVantageClient {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            client: http::build_client(None)?,
            api_key,
        })
    }

    pub async fn fetch_daily_series(&self, symbol: &str) -> Result<DailySeries> {
        let url = format!("{}/query", DEFAULT_BASE_URL);
        let query = [
            ("function", STOCK_FUNCTION),
            ("symbol", symbol),
            ("interval", STOCK_INTERVAL),
            ("apikey", self.api_key.as_str()),
        ];

        info!("fetching daily series for {}", symbol);
        let value = http::get_json(&self.client, &url, &query).await?;
        let (meta, series) = parse_response(&value)?;
        info!(
            "fetched {} daily record(s) for {} ({})",
            series.len(),
            meta.symbol,
            meta.timezone
        );

        Ok(DailySeries {
            meta,
            series,
            raw: value,
        })
    }
}

fn parse_response(value: &Value) -> Result<(StockMeta, PriceSeries)> {
    // Alpha Vantage reports rejections and throttling as 200s with a
    // message body instead of an HTTP error.
    if let Some(message) = value.get("Error Message").and_then(Value::as_str) {
        return Err(AppError::Network(format!(
            "stock provider rejected the request: {}",
            message
        )));
    }
    if let Some(note) = value.get("Note").and_then(Value::as_str) {
        return Err(AppError::Network(format!(
            "stock provider throttled the request: {}",
            note
        )));
    }

    let meta = value
        .get("Meta Data")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::Parse("missing 'Meta Data' object".to_string()))?;
    let meta = StockMeta {
        symbol: meta_field(meta, "2. Symbol")?,
        last_refreshed: meta_field(meta, "3. Last Refreshed")?,
        timezone: meta_field(meta, "5. Time Zone")?,
    };

    let raw_series = value
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::Parse("missing 'Time Series (Daily)' object".to_string()))?;
    let series = PriceSeries::from_raw(raw_series)?;

    Ok((meta, series))
}

fn meta_field(meta: &Map<String, Value>, key: &str) -> Result<String> {
    meta.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::Parse(format!("missing '{}' in Meta Data", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_fixture() -> Value {
        json!({
            "Meta Data": {
                "1. Information": "Daily Time Series with Splits and Dividend Events",
                "2. Symbol": "TSLA",
                "3. Last Refreshed": "2024-01-03",
                "4. Output Size": "Compact",
                "5. Time Zone": "US/Eastern"
            },
            "Time Series (Daily)": {
                "2024-01-03": {
                    "1. open": "101.0000",
                    "2. high": "111.0000",
                    "3. low": "100.5000",
                    "4. close": "110.0000",
                    "5. adjusted close": "110.0000",
                    "6. volume": "21453292",
                    "7. dividend amount": "0.0000",
                    "8. split coefficient": "1.0"
                },
                "2024-01-02": {
                    "1. open": "99.0000",
                    "2. high": "101.0000",
                    "3. low": "98.0000",
                    "4. close": "100.0000",
                    "5. adjusted close": "100.0000",
                    "6. volume": "19786438",
                    "7. dividend amount": "0.0000",
                    "8. split coefficient": "1.0"
                }
            }
        })
    }

    #[test]
    fn test_parse_response() {
        let (meta, series) = parse_response(&response_fixture()).unwrap();
        assert_eq!(meta.symbol, "TSLA");
        assert_eq!(meta.timezone, "US/Eastern");
        assert_eq!(meta.last_refreshed, "2024-01-03");
        assert_eq!(series.len(), 2);
        let last = &series.records()[1];
        assert!((last.dod_close_delta.unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_parse_response_missing_meta() {
        let err = parse_response(&json!({ "Time Series (Daily)": {} })).unwrap_err();
        assert!(err.to_string().contains("Meta Data"));
    }

    #[test]
    fn test_parse_response_provider_error_message() {
        let payload = json!({ "Error Message": "Invalid API call." });
        let err = parse_response(&payload).unwrap_err();
        assert!(err.to_string().contains("Invalid API call."));
    }

    #[test]
    fn test_parse_response_throttle_note() {
        let payload = json!({ "Note": "Thank you for using Alpha Vantage!" });
        let err = parse_response(&payload).unwrap_err();
        assert!(err.to_string().contains("throttled"));
    }
}
