//! Aggregation of the filtered view into dashboard tables.
//!
//! Each function in [`aggregate`] computes one chart's data from a
//! [`FilteredView`](crate::filter::FilteredView); [`analyzer::analyze`]
//! bundles them into a [`DashboardReport`](types::DashboardReport).

pub mod aggregate;
pub mod analyzer;
pub mod sentiment;
pub mod types;
pub mod utility;
