use chrono::Utc;
use tracing::debug;

use crate::analyzers::aggregate::{
    column_overview, cost_vs_rating, cuisine_counts, describe, online_order_comparison,
    rating_histogram, sentiment_by_location, sentiment_counts, top_locations, top_restaurants,
};
use crate::analyzers::types::{DashboardReport, DatasetOverview};
use crate::config::DashboardConfig;
use crate::dataset::CleanTable;
use crate::filter::{FilterParams, filter};
use crate::stats::DashboardMetrics;

const SCHEMA_VERSION: u8 = 1;

/// Filters `table` and computes every aggregate the dashboard displays.
///
/// An empty filtered view is not an error; each aggregate degrades to an
/// empty or `None` value.
#[tracing::instrument(skip_all, fields(location = %params.location))]
pub fn analyze(
    table: &CleanTable,
    params: &FilterParams,
    config: &DashboardConfig,
) -> DashboardReport {
    let view = filter(table, params);

    if view.is_empty() {
        debug!("Filtered view is empty");
    }

    DashboardReport {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        filter: params.clone(),
        metrics: DashboardMetrics::from_view(&view),
        overview: DatasetOverview {
            rows: view.len(),
            columns: column_overview(&view, table.headers()),
            describe: describe(&view),
        },
        top_locations: top_locations(&view, config.top_locations),
        top_cuisines: cuisine_counts(&view, config.top_cuisines),
        rating_histogram: rating_histogram(&view, config.histogram_bins),
        online_order_vs_rating: online_order_comparison(&view),
        cost_vs_rating: cost_vs_rating(&view),
        sentiment: sentiment_counts(&view),
        sentiment_by_location: sentiment_by_location(&view),
        top_restaurants: top_restaurants(&view, config.top_restaurants),
    }
}
