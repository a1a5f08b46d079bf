mod message;
mod news;
mod price_series;

pub use message::{Direction, NotificationMessage};
pub use news::NewsArticle;
pub use price_series::{breaches_threshold, DailyPriceRecord, PriceSeries};
