mod alpha_vantage;
mod http;
mod news_api;
mod twilio;
pub mod market_time;

pub use alpha_vantage::{AlphaVantageClient, DailySeries, StockMeta};
pub use news_api::NewsApiClient;
pub use twilio::TwilioClient;
