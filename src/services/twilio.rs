use serde_json::Value;
use tracing::info;

use super::http;
use crate::error::{AppError, Result};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

/// Client for the Twilio transactional SMS API.
pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub fn new(
        account_sid: String,
        auth_token: String,
        https_proxy: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            client: http::build_client(https_proxy)?,
            account_sid,
            auth_token,
        })
    }

    /// Send one SMS and return the provider's delivery status. Sent in a
    /// single attempt: a blind retry after a lost response could deliver
    /// the same message twice.
    pub async fn send_sms(&self, from: &str, to: &str, body: &str) -> Result<String> {
        let url = self.message_url();

        info!("sending SMS to {}", to);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("SMS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!(
                "messaging provider returned {}: {}",
                status, body
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("invalid messaging response: {}", e)))?;
        let delivery_status = value
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::Parse("missing 'status' in messaging response".to_string())
            })?
            .to_string();

        Ok(delivery_status)
    }

    fn message_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            DEFAULT_BASE_URL, self.account_sid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_url() {
        let client = TwilioClient::new("AC123".to_string(), "token".to_string(), None).unwrap();
        assert_eq!(
            client.message_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
