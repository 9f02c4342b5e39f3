//! Filtering of the cleaned table by the dashboard's sidebar selections.

use serde::{Deserialize, Serialize};

use crate::dataset::{CleanTable, Restaurant};
use crate::error::FilterError;

/// Active filter selections. All three predicates apply conjunctively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Exact-match location.
    pub location: String,
    /// Inclusive lower bound on rating.
    pub min_rating: f64,
    /// Inclusive upper bound on cost for two.
    pub max_cost: f64,
}

impl FilterParams {
    /// Dashboard defaults: the first location in sorted order, no rating
    /// floor, and the observed maximum cost. `None` for a table with no
    /// locations.
    pub fn defaults_for(table: &CleanTable) -> Option<Self> {
        let location = table.locations().into_iter().next()?;
        Some(Self {
            location,
            min_rating: 0.0,
            max_cost: table.max_cost().unwrap_or(0.0),
        })
    }

    /// Checks the selections against the ranges the dashboard offers.
    pub fn validate(&self, table: &CleanTable) -> Result<(), FilterError> {
        if !table.locations().iter().any(|l| *l == self.location) {
            return Err(FilterError::UnknownLocation(self.location.clone()));
        }

        if !(0.0..=5.0).contains(&self.min_rating) {
            return Err(FilterError::RatingOutOfRange(self.min_rating));
        }

        let max = table.max_cost().unwrap_or(0.0);
        if !(0.0..=max).contains(&self.max_cost) {
            return Err(FilterError::CostOutOfRange {
                value: self.max_cost,
                max,
            });
        }

        Ok(())
    }

    /// Returns `true` if `row` satisfies every predicate. Rows with a missing
    /// location or cost never match.
    pub fn matches(&self, row: &Restaurant) -> bool {
        row.location.as_deref() == Some(self.location.as_str())
            && row.rating >= self.min_rating
            && row.cost.is_some_and(|c| c <= self.max_cost)
    }
}

/// Rows of a [`CleanTable`] matching a [`FilterParams`], in table order.
///
/// Borrows from the table; the table itself is never modified.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Restaurant>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row of `table`.
    pub fn all(table: &'a CleanTable) -> Self {
        Self {
            rows: table.rows().iter().collect(),
        }
    }

    pub fn rows(&self) -> &[&'a Restaurant] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Restaurant> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ratings(&self) -> Vec<f64> {
        self.iter().map(|r| r.rating).collect()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.iter().filter_map(|r| r.cost).collect()
    }
}

impl<'a> FromIterator<&'a Restaurant> for FilteredView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Restaurant>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Applies `params` to `table`.
#[tracing::instrument(skip(table), fields(location = %params.location, min_rating = params.min_rating, max_cost = params.max_cost))]
pub fn filter<'a>(table: &'a CleanTable, params: &FilterParams) -> FilteredView<'a> {
    let view: FilteredView<'a> = table.rows().iter().filter(|r| params.matches(r)).collect();
    tracing::debug!(matched = view.len(), total = table.len(), "Filter applied");
    view
}

/// Number of rows shown in the preview table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewSize(usize);

impl PreviewSize {
    pub const MIN: usize = 5;
    pub const MAX: usize = 50;

    pub fn new(value: usize) -> Result<Self, FilterError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FilterError::PreviewOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for PreviewSize {
    fn default() -> Self {
        Self(10)
    }
}
