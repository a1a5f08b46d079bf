use crate::error::{AppError, Result};

/// Environment variables that must be present for a run to start.
pub const REQUIRED_VARS: &[&str] = &[
    "ALPHAVANTAGE_API_KEY",
    "NEWSAPI_API_KEY",
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "SMS_FROM_NUMBER",
    "SMS_TO_NUMBER",
];

/// Environment variables with defaults or optional behavior.
pub const OPTIONAL_VARS: &[&str] = &[
    "STOCK_SYMBOL",
    "COMPANY_NAME",
    "TRIGGER_THRESHOLD",
    "HTTPS_PROXY",
];

/// Minimum absolute day-over-day move required to send an alert (5%).
pub const DEFAULT_TRIGGER_THRESHOLD: f64 = 0.05;

const DEFAULT_SYMBOL: &str = "TSLA";
const DEFAULT_COMPANY_NAME: &str = "Tesla Inc";

/// All settings for one run, read from the environment exactly once at
/// startup and passed through the pipeline explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub stock_api_key: String,
    pub news_api_key: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub sms_from: String,
    pub sms_to: String,
    pub symbol: String,
    pub company_name: String,
    pub trigger_threshold: f64,
    /// Applied to the messaging client only, matching the original job.
    pub https_proxy: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup function so tests do not have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .ok_or_else(|| AppError::Config(format!("missing environment variable {}", name)))
        };

        let trigger_threshold = match lookup("TRIGGER_THRESHOLD") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|e| {
                AppError::Config(format!("invalid TRIGGER_THRESHOLD '{}': {}", raw, e))
            })?,
            None => DEFAULT_TRIGGER_THRESHOLD,
        };
        if trigger_threshold <= 0.0 {
            return Err(AppError::Config(format!(
                "TRIGGER_THRESHOLD must be positive, got {}",
                trigger_threshold
            )));
        }

        Ok(Self {
            stock_api_key: required("ALPHAVANTAGE_API_KEY")?,
            news_api_key: required("NEWSAPI_API_KEY")?,
            twilio_account_sid: required("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: required("TWILIO_AUTH_TOKEN")?,
            sms_from: required("SMS_FROM_NUMBER")?,
            sms_to: required("SMS_TO_NUMBER")?,
            symbol: lookup("STOCK_SYMBOL").unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            company_name: lookup("COMPANY_NAME")
                .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            trigger_threshold,
            https_proxy: lookup("HTTPS_PROXY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ALPHAVANTAGE_API_KEY", "av-key"),
            ("NEWSAPI_API_KEY", "news-key"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "token"),
            ("SMS_FROM_NUMBER", "+17753414072"),
            ("SMS_TO_NUMBER", "+13038159390"),
        ]
    }

    fn lookup_from(pairs: Vec<(&'static str, &'static str)>) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(full_env())).unwrap();
        assert_eq!(config.symbol, "TSLA");
        assert_eq!(config.company_name, "Tesla Inc");
        assert_eq!(config.trigger_threshold, DEFAULT_TRIGGER_THRESHOLD);
        assert!(config.https_proxy.is_none());
    }

    #[test]
    fn test_missing_required_var() {
        let mut env = full_env();
        env.retain(|(key, _)| *key != "NEWSAPI_API_KEY");
        let err = Config::from_lookup(lookup_from(env)).unwrap_err();
        assert!(err.to_string().contains("NEWSAPI_API_KEY"));
    }

    #[test]
    fn test_threshold_override() {
        let mut env = full_env();
        env.push(("TRIGGER_THRESHOLD", "0.1"));
        let config = Config::from_lookup(lookup_from(env)).unwrap();
        assert_eq!(config.trigger_threshold, 0.1);
    }

    #[test]
    fn test_threshold_must_parse() {
        let mut env = full_env();
        env.push(("TRIGGER_THRESHOLD", "five percent"));
        assert!(Config::from_lookup(lookup_from(env)).is_err());
    }

    #[test]
    fn test_threshold_must_be_positive() {
        let mut env = full_env();
        env.push(("TRIGGER_THRESHOLD", "-0.05"));
        assert!(Config::from_lookup(lookup_from(env)).is_err());
    }
}
