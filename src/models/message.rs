use super::news::NewsArticle;

/// Band around zero classified as "flat" in the message arrow. Independent
/// of the trigger threshold: the threshold decides whether an alert exists
/// at all, the band only picks the glyph.
pub const FLAT_BAND: f64 = 0.049;

const MAX_ARTICLES: usize = 3;

/// Price movement direction shown in the outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Flat,
    Down,
}

impl Direction {
    pub fn classify(delta: f64) -> Self {
        if delta > 0.0 {
            Direction::Up
        } else if delta < -FLAT_BAND {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "🔺",
            Direction::Flat => "➖",
            Direction::Down => "🔻",
        }
    }
}

/// The outbound SMS: symbol, move, and up to the first three articles.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub symbol: String,
    pub direction: Direction,
    pub delta: f64,
    pub articles: Vec<NewsArticle>,
}

impl NotificationMessage {
    pub fn new(symbol: String, delta: f64, mut articles: Vec<NewsArticle>) -> Self {
        articles.truncate(MAX_ARTICLES);
        Self {
            symbol,
            direction: Direction::classify(delta),
            delta,
            articles,
        }
    }

    /// Render the SMS body:
    ///
    /// ```text
    /// TSLA: 🔺10%
    /// Headline: ...
    /// Brief: ...
    /// Read More: https://...
    /// ```
    pub fn body(&self) -> String {
        let mut lines = vec![format!(
            "{}: {}{:.0}%",
            self.symbol,
            self.direction.arrow(),
            self.delta * 100.0
        )];
        for article in &self.articles {
            lines.push(format!("Headline: {}", article.title));
            lines.push(format!("Brief: {}", article.brief()));
            lines.push(format!("Read More: {}", article.url));
        }
        lines.join("\n")
    }
}
