//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::sentiment::Sentiment;
use crate::filter::FilterParams;
use crate::stats::DashboardMetrics;

/// Mean rating of one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRating {
    pub location: String,
    pub avg_rating: f64,
    pub restaurants: usize,
}

/// Number of restaurants listing a cuisine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineCount {
    pub cuisine: String,
    pub count: usize,
}

/// One equal-width histogram bin, `[lower, upper)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Five-number summary plus mean of a group of ratings (box plot input).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Ratings split by the online-order flag. A group with no rows is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OnlineOrderComparison {
    pub yes: Option<RatingSummary>,
    pub no: Option<RatingSummary>,
}

/// Counts per sentiment category; all three are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// One row of the sentiment-by-location cross-tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSentiment {
    pub location: String,
    #[serde(flatten)]
    pub counts: SentimentCounts,
}

/// A restaurant in the top-rated table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRestaurant {
    pub rank: usize,
    pub name: String,
    pub cuisines: String,
    pub rating: f64,
    pub cost: Option<f64>,
}

/// A single point of the cost-versus-rating scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostRatingPoint {
    pub cost: f64,
    pub rating: f64,
}

/// Missing-value count for one column of the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub column: String,
    pub missing: usize,
}

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Summary statistics of the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub rating: NumericSummary,
    pub cost: NumericSummary,
}

/// Shape, column info and summary statistics of the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub describe: Describe,
}

/// Everything the dashboard renders for one set of filter selections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub filter: FilterParams,
    pub metrics: DashboardMetrics,
    pub overview: DatasetOverview,
    pub top_locations: Vec<LocationRating>,
    pub top_cuisines: Vec<CuisineCount>,
    pub rating_histogram: Vec<HistogramBin>,
    pub online_order_vs_rating: OnlineOrderComparison,
    pub cost_vs_rating: Vec<CostRatingPoint>,
    pub sentiment: SentimentCounts,
    pub sentiment_by_location: Vec<LocationSentiment>,
    pub top_restaurants: Vec<TopRestaurant>,
}
