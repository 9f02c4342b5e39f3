use serde::Serialize;

use crate::analyzers::utility::mean;
use crate::filter::FilteredView;

/// Headline figures for the filtered view.
///
/// Averages and the online share are `None` when the view is empty.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_restaurants: usize,
    pub avg_rating: Option<f64>,
    pub avg_cost: Option<f64>,
    pub online_order_pct: Option<f64>,

    // supporting counts
    pub with_cost: usize,
    pub with_online_order: usize,
}

impl DashboardMetrics {
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let mut s = DashboardMetrics {
            total_restaurants: view.len(),
            ..Default::default()
        };

        let costs = view.costs();
        s.with_cost = costs.len();
        s.with_online_order = view.iter().filter(|r| r.online_order == Some(true)).count();

        s.avg_rating = mean(&view.ratings());
        s.avg_cost = mean(&costs);
        s.online_order_pct = Self::pct(s.with_online_order, s.total_restaurants);

        s
    }

    pub fn pct(part: usize, total: usize) -> Option<f64> {
        if total == 0 {
            None
        } else {
            Some((part as f64 / total as f64) * 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::dataset::{CleanTable, RawTable, clean};

    fn table(body: &str) -> CleanTable {
        let csv = format!("name,online_order,rate,location,cuisines,approx_cost(for two people)\n{body}");
        clean(RawTable::from_reader(csv.as_bytes()).unwrap(), &ColumnNames::default()).unwrap()
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(DashboardMetrics::pct(10, 0), None);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(DashboardMetrics::pct(50, 100), Some(50.0));
        assert_eq!(DashboardMetrics::pct(1, 4), Some(25.0));
    }

    #[test]
    fn test_from_view_empty() {
        let table = table("");
        let stats = DashboardMetrics::from_view(&FilteredView::all(&table));

        assert_eq!(stats.total_restaurants, 0);
        assert_eq!(stats.avg_rating, None);
        assert_eq!(stats.avg_cost, None);
        assert_eq!(stats.online_order_pct, None);
    }

    #[test]
    fn test_from_view_with_rows() {
        let table = table(
            "A,Yes,4.5/5,X,Cafe,500\n\
             B,No,2.0/5,X,Cafe,300\n\
             C,No,3.5/5,X,Cafe,\n\
             D,Yes,4.0/5,X,Cafe,400\n",
        );
        let stats = DashboardMetrics::from_view(&FilteredView::all(&table));

        assert_eq!(stats.total_restaurants, 4);
        assert_eq!(stats.avg_rating, Some(3.5));
        assert_eq!(stats.avg_cost, Some(400.0));
        assert_eq!(stats.with_cost, 3);
        assert_eq!(stats.online_order_pct, Some(50.0));
    }
}
