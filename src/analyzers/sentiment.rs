use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued sentiment derived from a rating.
///
/// | Range            | Sentiment |
/// |------------------|-----------|
/// | >= 4.0           | Positive  |
/// | >= 3.0, < 4.0    | Neutral   |
/// | < 3.0            | Negative  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn from_rating(rating: f64) -> Self {
        match rating {
            r if r >= 4.0 => Sentiment::Positive,
            r if r >= 3.0 => Sentiment::Neutral,
            _ => Sentiment::Negative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_boundaries() {
        assert_eq!(Sentiment::from_rating(5.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(4.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(3.999), Sentiment::Neutral);
        assert_eq!(Sentiment::from_rating(3.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_rating(2.999), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(0.0), Sentiment::Negative);
    }

    #[test]
    fn test_display() {
        assert_eq!(Sentiment::Neutral.to_string(), "Neutral");
    }
}
