use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::models::{breaches_threshold, NotificationMessage};
use crate::services::market_time;
use crate::services::{AlphaVantageClient, NewsApiClient, TwilioClient};

/// News lookback window, in days, ending on the evaluated trading day.
const NEWS_WINDOW_DAYS: u64 = 3;

pub fn run(dump_response: Option<PathBuf>, dry_run: bool) {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Run 'stockpulse check' to see which variables are missing.");
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(run_once(&config, dump_response.as_deref(), dry_run)) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Alert run failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// One pass of the pipeline: fetch prices, evaluate yesterday's move,
/// and when it breaches the threshold, fetch news and send the SMS.
async fn run_once(config: &Config, dump_path: Option<&Path>, dry_run: bool) -> Result<()> {
    let stocks = AlphaVantageClient::new(config.stock_api_key.clone())?;
    let fetched = stocks.fetch_daily_series(&config.symbol).await?;

    if let Some(path) = dump_path {
        let pretty = serde_json::to_string_pretty(&fetched.raw)?;
        tokio::fs::write(path, pretty).await?;
        info!("wrote raw provider response to {}", path.display());
    }

    if fetched.series.is_empty() {
        println!(
            "⚪ Provider returned an empty series for {}, nothing to do",
            config.symbol
        );
        return Ok(());
    }

    let tz = market_time::parse_market_timezone(&fetched.meta.timezone)?;
    match market_time::parse_refresh_stamp(&fetched.meta.last_refreshed, tz) {
        Ok(refreshed) => info!("{} data last refreshed {}", fetched.meta.symbol, refreshed),
        Err(e) => warn!("unparseable refresh stamp: {}", e),
    }

    let yesterday = market_time::yesterday_in(tz, Utc::now());
    let record = match fetched.series.record_for(yesterday) {
        Some(record) => record,
        None => {
            println!(
                "⚪ No close for {} on {} (weekend or holiday), nothing to do",
                config.symbol, yesterday
            );
            return Ok(());
        }
    };
    let delta = match record.dod_close_delta {
        Some(delta) => delta,
        None => {
            println!(
                "⚪ No prior close to compare against for {}, nothing to do",
                yesterday
            );
            return Ok(());
        }
    };
    info!(
        "{} adjusted close {} on {}: day-over-day move {:+.2}%",
        config.symbol,
        record.adjusted_close,
        yesterday,
        delta * 100.0
    );

    if !breaches_threshold(delta, config.trigger_threshold) {
        println!(
            "⚪ {} moved {:+.2}% on {}, below the {:.2}% alert threshold",
            config.symbol,
            delta * 100.0,
            yesterday,
            config.trigger_threshold * 100.0
        );
        return Ok(());
    }

    let news = NewsApiClient::new(config.news_api_key.clone())?;
    let window_start = market_time::news_window_start(yesterday, NEWS_WINDOW_DAYS);
    let articles = news.fetch_articles(&config.company_name, window_start).await?;
    info!(
        "fetched {} article(s) for '{}'",
        articles.len(),
        config.company_name
    );
    if let Some(latest) = articles.first() {
        info!("latest article published {}", latest.published_at);
    }

    let message = NotificationMessage::new(config.symbol.clone(), delta, articles);
    let body = message.body();

    if dry_run {
        println!("📝 Dry run, message not sent:\n{}", body);
        return Ok(());
    }

    let sms = TwilioClient::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.https_proxy.as_deref(),
    )?;
    let delivery_status = sms.send_sms(&config.sms_from, &config.sms_to, &body).await?;
    println!(
        "✅ Alert sent to {} (delivery status: {})",
        config.sms_to, delivery_status
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::models::{breaches_threshold, NotificationMessage, PriceSeries};

    fn day(close: &str) -> serde_json::Value {
        json!({
            "1. open": close,
            "2. high": close,
            "3. low": close,
            "4. close": close,
            "5. adjusted close": close,
            "6. volume": "1000",
        })
    }

    #[test]
    fn test_trigger_scenario_formats_alert() {
        let raw = json!({
            "2024-01-02": day("100.0"),
            "2024-01-03": day("110.0"),
        });
        let series = PriceSeries::from_raw(raw.as_object().unwrap()).unwrap();

        let yesterday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let record = series.record_for(yesterday).expect("record for yesterday");
        let delta = record.dod_close_delta.expect("delta");

        assert!(breaches_threshold(delta, 0.05));
        let message = NotificationMessage::new("TSLA".to_string(), delta, vec![]);
        assert!(message.body().starts_with("TSLA: 🔺10"));
    }

    #[test]
    fn test_below_threshold_scenario_stays_silent() {
        let raw = json!({
            "2024-01-02": day("100.0"),
            "2024-01-03": day("102.0"),
        });
        let series = PriceSeries::from_raw(raw.as_object().unwrap()).unwrap();

        let yesterday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let delta = series
            .record_for(yesterday)
            .and_then(|record| record.dod_close_delta)
            .expect("delta");
        assert!(!breaches_threshold(delta, 0.05));
    }

    #[test]
    fn test_weekend_lookup_is_a_clean_no_trigger() {
        let raw = json!({ "2024-01-05": day("100.0") });
        let series = PriceSeries::from_raw(raw.as_object().unwrap()).unwrap();

        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert!(series.record_for(saturday).is_none());
    }
}
