use std::collections::{BTreeMap, HashMap};

use crate::analyzers::types::{
    ColumnInfo, CostRatingPoint, CuisineCount, Describe, HistogramBin, LocationRating,
    LocationSentiment, NumericSummary, OnlineOrderComparison, RatingSummary, SentimentCounts,
    TopRestaurant,
};
use crate::analyzers::utility::{mean, quantile, sorted, stddev};
use crate::filter::FilteredView;

/// Ranks locations by mean rating, highest first, and keeps the first `n`.
///
/// Locations with equal means keep the order in which they first appear in
/// the view. Rows without a location are ignored.
pub fn top_locations(view: &FilteredView<'_>, n: usize) -> Vec<LocationRating> {
    let mut order: Vec<(&str, f64, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in view.iter() {
        let Some(location) = row.location.as_deref() else {
            continue;
        };
        let i = *index.entry(location).or_insert_with(|| {
            order.push((location, 0.0, 0));
            order.len() - 1
        });
        order[i].1 += row.rating;
        order[i].2 += 1;
    }

    let mut ranked: Vec<LocationRating> = order
        .into_iter()
        .map(|(location, sum, count)| LocationRating {
            location: location.to_string(),
            avg_rating: sum / count as f64,
            restaurants: count,
        })
        .collect();

    // stable: ties keep first-appearance order
    ranked.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));
    ranked.truncate(n);
    ranked
}

/// Counts cuisine mentions across the view and returns the `n` most frequent.
///
/// Each row's cuisines string is split on `", "`. Equal counts keep the order
/// in which the cuisines were first encountered.
pub fn cuisine_counts(view: &FilteredView<'_>, n: usize) -> Vec<CuisineCount> {
    let mut counts: Vec<CuisineCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in view.iter() {
        for cuisine in row.cuisine_list() {
            match index.get(cuisine) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(cuisine, counts.len());
                    counts.push(CuisineCount {
                        cuisine: cuisine.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Equal-width histogram of the ratings in the view.
///
/// Bins span the observed rating range; a single-valued range is widened by
/// 0.5 either side. Returns an empty vector for an empty view or zero bins.
pub fn rating_histogram(view: &FilteredView<'_>, bins: usize) -> Vec<HistogramBin> {
    let ratings = view.ratings();
    if ratings.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for r in ratings {
        let i = (((r - lo) / width).floor() as usize).min(bins - 1);
        out[i].count += 1;
    }

    out
}

fn rating_summary(values: &[f64]) -> Option<RatingSummary> {
    let s = sorted(values);
    Some(RatingSummary {
        count: s.len(),
        mean: mean(&s)?,
        min: *s.first()?,
        q1: quantile(&s, 0.25)?,
        median: quantile(&s, 0.5)?,
        q3: quantile(&s, 0.75)?,
        max: *s.last()?,
    })
}

/// Rating summaries for restaurants with and without online ordering.
///
/// Rows whose flag is missing or unrecognised belong to neither group.
pub fn online_order_comparison(view: &FilteredView<'_>) -> OnlineOrderComparison {
    let (mut yes, mut no) = (Vec::new(), Vec::new());
    for row in view.iter() {
        match row.online_order {
            Some(true) => yes.push(row.rating),
            Some(false) => no.push(row.rating),
            None => {}
        }
    }

    OnlineOrderComparison {
        yes: rating_summary(&yes),
        no: rating_summary(&no),
    }
}

/// Overall sentiment distribution of the view.
pub fn sentiment_counts(view: &FilteredView<'_>) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for row in view.iter() {
        counts.add(row.sentiment);
    }
    counts
}

/// Cross-tabulates sentiment by location, sorted by location name.
pub fn sentiment_by_location(view: &FilteredView<'_>) -> Vec<LocationSentiment> {
    let mut table: BTreeMap<&str, SentimentCounts> = BTreeMap::new();
    for row in view.iter() {
        if let Some(location) = row.location.as_deref() {
            table.entry(location).or_default().add(row.sentiment);
        }
    }

    table
        .into_iter()
        .map(|(location, counts)| LocationSentiment {
            location: location.to_string(),
            counts,
        })
        .collect()
}

/// The `n` highest-rated restaurants, one entry per name.
///
/// Rows are ordered by rating (stable, so equal ratings keep view order) and
/// the first row seen for each name supplies its cuisines and cost. Rows
/// without a name are skipped.
pub fn top_restaurants(view: &FilteredView<'_>, n: usize) -> Vec<TopRestaurant> {
    let mut rows: Vec<_> = view.iter().filter(|r| r.name.is_some()).collect();
    rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if out.len() == n {
            break;
        }
        let Some(name) = row.name.as_deref() else {
            continue;
        };
        if !seen.insert(name) {
            continue;
        }
        out.push(TopRestaurant {
            rank: out.len() + 1,
            name: name.to_string(),
            cuisines: row.cuisines.clone(),
            rating: row.rating,
            cost: row.cost,
        });
    }

    out
}

/// Cost/rating pairs for every row that has a cost.
pub fn cost_vs_rating(view: &FilteredView<'_>) -> Vec<CostRatingPoint> {
    view.iter()
        .filter_map(|r| {
            r.cost.map(|cost| CostRatingPoint {
                cost,
                rating: r.rating,
            })
        })
        .collect()
}

/// Missing-value count of every column in the view.
pub fn column_overview(view: &FilteredView<'_>, headers: &[String]) -> Vec<ColumnInfo> {
    headers
        .iter()
        .enumerate()
        .map(|(i, column)| ColumnInfo {
            column: column.clone(),
            missing: view
                .iter()
                .filter(|r| r.fields.get(i).is_none_or(|v| v.trim().is_empty()))
                .count(),
        })
        .collect()
}

fn numeric_summary(values: &[f64]) -> NumericSummary {
    let s = sorted(values);
    let avg = mean(&s);
    NumericSummary {
        count: s.len(),
        mean: avg,
        std: avg.and_then(|m| stddev(&s, m)),
        min: s.first().copied(),
        p25: quantile(&s, 0.25),
        p50: quantile(&s, 0.5),
        p75: quantile(&s, 0.75),
        max: s.last().copied(),
    }
}

/// Descriptive statistics of the rating and cost columns.
pub fn describe(view: &FilteredView<'_>) -> Describe {
    Describe {
        rating: numeric_summary(&view.ratings()),
        cost: numeric_summary(&view.costs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::dataset::{CleanTable, RawTable, clean};

    fn table(body: &str) -> CleanTable {
        let csv = format!(
            "name,online_order,rate,location,cuisines,approx_cost(for two people)\n{body}"
        );
        clean(RawTable::from_reader(csv.as_bytes()).unwrap(), &ColumnNames::default()).unwrap()
    }

    fn sample() -> CleanTable {
        table(
            "A,Yes,4.5/5,X,\"Chinese, Thai\",500\n\
             B,No,2.0/5,X,Chinese,300\n\
             C,Yes,3.5/5,Y,\"Cafe, Thai\",700\n\
             D,No,4.5/5,Z,Cafe,\n\
             A,No,3.0/5,Y,Biryani,200\n",
        )
    }

    #[test]
    fn test_top_locations_ranked_with_stable_ties() {
        let table = sample();
        let view = FilteredView::all(&table);
        let top = top_locations(&view, 10);

        let names: Vec<&str> = top.iter().map(|l| l.location.as_str()).collect();
        // X and Y both average 3.25, X seen first
        assert_eq!(names, vec!["Z", "X", "Y"]);
        assert_eq!(top[1].avg_rating, 3.25);
        assert_eq!(top[1].restaurants, 2);

        assert_eq!(top_locations(&view, 1).len(), 1);
    }

    #[test]
    fn test_cuisine_counts() {
        let table = sample();
        let view = FilteredView::all(&table);
        let counts = cuisine_counts(&view, 10);

        let pairs: Vec<(&str, usize)> =
            counts.iter().map(|c| (c.cuisine.as_str(), c.count)).collect();
        assert_eq!(
            pairs,
            vec![("Chinese", 2), ("Thai", 2), ("Cafe", 2), ("Biryani", 1)]
        );

        let top2 = cuisine_counts(&view, 2);
        assert_eq!(top2.len(), 2);
        let total_mentions: usize = view.iter().map(|r| r.cuisine_list().count()).sum();
        assert!(top2.iter().map(|c| c.count).sum::<usize>() <= total_mentions);
    }

    #[test]
    fn test_rating_histogram() {
        let table = sample();
        let view = FilteredView::all(&table);
        let hist = rating_histogram(&view, 5);

        assert_eq!(hist.len(), 5);
        assert_eq!(hist[0].lower, 2.0);
        assert_eq!(hist[4].upper, 4.5);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 5);
        // max value falls in the closed last bin
        assert_eq!(hist[4].count, 2);
    }

    #[test]
    fn test_rating_histogram_single_value() {
        let table = table("A,Yes,4.0/5,X,Cafe,100\nB,Yes,4.0/5,X,Cafe,200\n");
        let hist = rating_histogram(&FilteredView::all(&table), 2);

        assert_eq!(hist[0].lower, 3.5);
        assert_eq!(hist[1].upper, 4.5);
        assert_eq!(hist[1].count, 2);
    }

    #[test]
    fn test_online_order_comparison() {
        let table = sample();
        let cmp = online_order_comparison(&FilteredView::all(&table));

        let yes = cmp.yes.unwrap();
        assert_eq!(yes.count, 2);
        assert_eq!(yes.mean, 4.0);
        assert_eq!(yes.median, 4.0);

        let no = cmp.no.unwrap();
        assert_eq!(no.count, 3);
        assert_eq!(no.min, 2.0);
        assert_eq!(no.median, 3.0);
        assert_eq!(no.max, 4.5);
    }

    #[test]
    fn test_online_order_comparison_missing_group() {
        let table = table("A,Yes,4.0/5,X,Cafe,100\n");
        let cmp = online_order_comparison(&FilteredView::all(&table));
        assert!(cmp.yes.is_some());
        assert!(cmp.no.is_none());
    }

    #[test]
    fn test_sentiment_by_location_row_sums() {
        let table = sample();
        let view = FilteredView::all(&table);
        let tab = sentiment_by_location(&view);

        let names: Vec<&str> = tab.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);

        for row in &tab {
            let expected = view
                .iter()
                .filter(|r| r.location.as_deref() == Some(row.location.as_str()))
                .count();
            assert_eq!(row.counts.total(), expected);
        }

        assert_eq!(tab[0].counts.positive, 1);
        assert_eq!(tab[0].counts.neutral, 0);
        assert_eq!(tab[0].counts.negative, 1);
    }

    #[test]
    fn test_top_restaurants_dedup_by_name() {
        let table = sample();
        let top = top_restaurants(&FilteredView::all(&table), 20);

        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        // A and D tie at 4.5; A comes first in the view
        assert_eq!(names, vec!["A", "D", "C", "B"]);
        assert_eq!(top[0].cuisines, "Chinese, Thai");
        assert_eq!(top[0].cost, Some(500.0));
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[3].rank, 4);

        assert_eq!(top_restaurants(&FilteredView::all(&table), 2).len(), 2);
    }

    #[test]
    fn test_cost_vs_rating_skips_missing_cost() {
        let table = sample();
        assert_eq!(cost_vs_rating(&FilteredView::all(&table)).len(), 4);
    }

    #[test]
    fn test_column_overview_and_describe() {
        let table = sample();
        let view = FilteredView::all(&table);

        let overview = column_overview(&view, table.headers());
        let cost = overview
            .iter()
            .find(|c| c.column == "approx_cost(for two people)")
            .unwrap();
        assert_eq!(cost.missing, 1);

        let d = describe(&view);
        assert_eq!(d.rating.count, 5);
        assert_eq!(d.rating.min, Some(2.0));
        assert_eq!(d.rating.p50, Some(3.5));
        assert_eq!(d.cost.count, 4);
        assert_eq!(d.cost.mean, Some(425.0));
    }

    #[test]
    fn test_empty_view_is_safe() {
        let table = sample();
        let view: FilteredView<'_> = table.rows().iter().filter(|_| false).collect();

        assert!(top_locations(&view, 10).is_empty());
        assert!(cuisine_counts(&view, 10).is_empty());
        assert!(rating_histogram(&view, 20).is_empty());
        assert_eq!(online_order_comparison(&view), OnlineOrderComparison::default());
        assert_eq!(sentiment_counts(&view).total(), 0);
        assert!(sentiment_by_location(&view).is_empty());
        assert!(top_restaurants(&view, 20).is_empty());
        assert!(cost_vs_rating(&view).is_empty());

        let d = describe(&view);
        assert_eq!(d.rating.count, 0);
        assert_eq!(d.rating.mean, None);
        assert_eq!(d.rating.std, None);
    }
}
