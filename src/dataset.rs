//! Loading and cleaning of the restaurant listing.
//!
//! [`RawTable`] is the file as read. [`clean`] turns it into an immutable
//! [`CleanTable`] of [`Restaurant`] rows: duplicates removed, rows without a
//! usable rating or cuisines dropped, rating and cost coerced to numbers and
//! a [`Sentiment`] derived per row.

use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::sentiment::Sentiment;
use crate::config::ColumnNames;
use crate::error::LoadError;
use crate::parser::{has_digit, parse_cost, parse_flag, parse_rating};

/// The dataset exactly as read: a header row plus string cells.
///
/// Empty cells are treated as missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Reads a comma-delimited file with a header row. Files ending in `.gz`
    /// are decompressed on the fly.
    ///
    /// Short rows are padded with empty cells; a row with more cells than the
    /// header is a [`LoadError::RaggedRow`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            debug!(path = %path.display(), "Reading gzip-compressed dataset");
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();

        for result in rdr.records() {
            let record = result?;
            if record.len() > headers.len() {
                return Err(LoadError::RaggedRow {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    fn column(&self, name: &str) -> Result<usize, LoadError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub name: usize,
    pub location: usize,
    pub online_order: usize,
    pub rating: usize,
    pub cost: usize,
    pub cuisines: usize,
}

impl ColumnIndex {
    fn resolve(raw: &RawTable, names: &ColumnNames) -> Result<Self, LoadError> {
        Ok(Self {
            name: raw.column(&names.name)?,
            location: raw.column(&names.location)?,
            online_order: raw.column(&names.online_order)?,
            rating: raw.column(&names.rating)?,
            cost: raw.column(&names.cost)?,
            cuisines: raw.column(&names.cuisines)?,
        })
    }
}

/// A cleaned row.
///
/// `fields` holds the whole source row in header order with the rating and
/// cost cells rewritten to their normalised values.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub name: Option<String>,
    pub location: Option<String>,
    pub online_order: Option<bool>,
    pub rating: f64,
    pub cost: Option<f64>,
    pub cuisines: String,
    pub sentiment: Sentiment,
    pub fields: Vec<String>,
}

impl Restaurant {
    /// Iterates the individual cuisines, split on `", "`.
    pub fn cuisine_list(&self) -> impl Iterator<Item = &str> {
        self.cuisines.split(", ").filter(|c| !c.is_empty())
    }
}

/// Row counts observed while cleaning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub raw_rows: usize,
    pub duplicates: usize,
    pub missing_required: usize,
    pub no_digit: usize,
    pub unparsable_rating: usize,
    pub normalized_duplicates: usize,
    pub kept: usize,
}

/// The deduplicated, validated, type-coerced dataset. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    headers: Vec<String>,
    columns: ColumnIndex,
    rows: Vec<Restaurant>,
    report: CleanReport,
}

impl CleanTable {
    /// Reads and cleans the dataset at `path`.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, columns: &ColumnNames) -> Result<Self, LoadError> {
        let raw = RawTable::from_path(path.as_ref())?;
        let table = clean(raw, columns)?;

        let r = table.report;
        info!(
            raw_rows = r.raw_rows,
            duplicates = r.duplicates,
            missing_required = r.missing_required,
            no_digit = r.no_digit,
            unparsable_rating = r.unparsable_rating,
            normalized_duplicates = r.normalized_duplicates,
            kept = r.kept,
            "Dataset loaded"
        );

        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> ColumnIndex {
        self.columns
    }

    pub fn rows(&self) -> &[Restaurant] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn report(&self) -> CleanReport {
        self.report
    }

    /// Sorted distinct locations, missing values excluded.
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self
            .rows
            .iter()
            .filter_map(|r| r.location.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        locations.sort();
        locations
    }

    /// Largest observed cost, `None` when no row carries one.
    pub fn max_cost(&self) -> Option<f64> {
        self.rows.iter().filter_map(|r| r.cost).reduce(f64::max)
    }

    /// Converts back to a raw table carrying the normalised cell values.
    pub fn to_raw(&self) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().map(|r| r.fields.clone()).collect(),
        }
    }
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx)
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Cleans a raw table.
///
/// Steps run in a fixed order: exact-duplicate removal, dropping rows with a
/// missing rating or cuisines, dropping ratings without a digit, rating and
/// cost parsing, sentiment derivation. Rows that become identical once their
/// rating and cost are normalised are collapsed to the first one, so cleaning
/// a cleaned table changes nothing. Rows failing a check are skipped and
/// counted in the [`CleanReport`], never reported as errors.
pub fn clean(raw: RawTable, names: &ColumnNames) -> Result<CleanTable, LoadError> {
    let columns = ColumnIndex::resolve(&raw, names)?;
    let mut report = CleanReport {
        raw_rows: raw.rows.len(),
        ..Default::default()
    };

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(raw.rows.len());
    for row in raw.rows {
        if seen.contains(&row) {
            continue;
        }
        seen.insert(row.clone());
        unique.push(row);
    }
    report.duplicates = report.raw_rows - unique.len();
    debug!(remaining = unique.len(), removed = report.duplicates, "Duplicates removed");

    let mut normalized = HashSet::new();
    let mut rows = Vec::with_capacity(unique.len());
    for mut row in unique {
        let (Some(rate), Some(cuisines)) = (cell(&row, columns.rating), cell(&row, columns.cuisines))
        else {
            report.missing_required += 1;
            continue;
        };

        if !has_digit(rate) {
            report.no_digit += 1;
            continue;
        }

        let Some(rating) = parse_rating(rate) else {
            report.unparsable_rating += 1;
            continue;
        };

        let cuisines = cuisines.to_string();
        let cost = cell(&row, columns.cost).and_then(parse_cost);

        row[columns.rating] = rating.to_string();
        row[columns.cost] = cost.map(|c| c.to_string()).unwrap_or_default();

        if !normalized.insert(row.clone()) {
            report.normalized_duplicates += 1;
            continue;
        }

        rows.push(Restaurant {
            name: cell(&row, columns.name).map(str::to_string),
            location: cell(&row, columns.location).map(str::to_string),
            online_order: cell(&row, columns.online_order).and_then(parse_flag),
            rating,
            cost,
            cuisines,
            sentiment: Sentiment::from_rating(rating),
            fields: row,
        });
    }

    report.kept = rows.len();
    debug!(
        missing_required = report.missing_required,
        no_digit = report.no_digit,
        unparsable_rating = report.unparsable_rating,
        normalized_duplicates = report.normalized_duplicates,
        kept = report.kept,
        "Rows validated"
    );

    Ok(CleanTable {
        headers: raw.headers,
        columns,
        rows,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "url,name,online_order,rate,location,cuisines,approx_cost(for two people)\n";

    fn raw(body: &str) -> RawTable {
        RawTable::from_reader(format!("{HEADER}{body}").as_bytes()).unwrap()
    }

    fn cleaned(body: &str) -> CleanTable {
        clean(raw(body), &ColumnNames::default()).unwrap()
    }

    #[test]
    fn test_parses_rating_and_cost() {
        let table = cleaned("u1,Jalsa,Yes,4.1/5,Banashankari,\"North Indian, Mughlai\",\"1,200\"\n");

        assert_eq!(table.len(), 1);
        let r = &table.rows()[0];
        assert_eq!(r.rating, 4.1);
        assert_eq!(r.cost, Some(1200.0));
        assert_eq!(r.online_order, Some(true));
        assert_eq!(r.cuisines, "North Indian, Mughlai");
        assert_eq!(r.sentiment, Sentiment::Positive);
        assert_eq!(r.fields[3], "4.1");
        assert_eq!(r.fields[6], "1200");
    }

    #[test]
    fn test_placeholder_ratings_excluded() {
        let table = cleaned(
            "u1,A,Yes,NEW,X,Cafe,300\n\
             u2,B,No,-,X,Cafe,300\n\
             u3,C,No,3.2/5,X,Cafe,300\n",
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].name.as_deref(), Some("C"));
        assert_eq!(table.report().no_digit, 2);
    }

    #[test]
    fn test_missing_required_fields_dropped() {
        let table = cleaned(
            "u1,A,Yes,,X,Cafe,300\n\
             u2,B,No,3.0/5,X,,300\n\
             u3,C,No,3.0/5,X,Cafe,\n",
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].cost, None);
        assert_eq!(table.report().missing_required, 2);
    }

    #[test]
    fn test_exact_duplicates_removed_once() {
        let table = cleaned(
            "u1,A,Yes,4.0/5,X,Cafe,300\n\
             u1,A,Yes,4.0/5,X,Cafe,300\n\
             u2,A,Yes,4.0/5,X,Cafe,300\n",
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.report().duplicates, 1);
        assert_eq!(table.rows()[0].fields[0], "u1");
        assert_eq!(table.rows()[1].fields[0], "u2");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let once = cleaned(
            "u1,A,Yes,4.1/5,X,\"Chinese, Thai\",\"1,200\"\n\
             u2,B,No,2.5 /5,Y,Cafe,400\n\
             u3,C,No,NEW,Y,Cafe,400\n\
             u2,B,No,2.5 /5,Y,Cafe,400\n",
        );
        let twice = clean(once.to_raw(), &ColumnNames::default()).unwrap();

        assert_eq!(once.rows(), twice.rows());
        assert_eq!(once.headers(), twice.headers());
    }

    #[test]
    fn test_rows_equal_after_normalizing_collapse() {
        let once = cleaned(
            "u1,A,Yes,4.1/5,X,Cafe,\"1,200\"\n\
             u1,A,Yes,4.1 /5,X,Cafe,1200\n",
        );

        assert_eq!(once.len(), 1);
        assert_eq!(once.report().duplicates, 0);
        assert_eq!(once.report().normalized_duplicates, 1);

        let twice = clean(once.to_raw(), &ColumnNames::default()).unwrap();
        assert_eq!(once.rows(), twice.rows());
        assert_eq!(twice.report().normalized_duplicates, 0);
    }

    #[test]
    fn test_overlong_row_is_fatal() {
        let err = RawTable::from_reader(
            format!("{HEADER}u0,Z,No,3.0/5,X,Cafe,100\nu1,A,Yes,4.1/5,X,Cafe,300,EXTRA,MORE\n")
                .as_bytes(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LoadError::RaggedRow {
                line: 3,
                expected: 7,
                found: 9
            }
        ));
    }

    #[test]
    fn test_short_row_is_padded() {
        let raw = raw("u1,A,Yes,4.1/5\n");
        assert_eq!(raw.rows[0].len(), 7);
        assert_eq!(raw.rows[0][6], "");
    }

    #[test]
    fn test_whitespace_cells_count_as_missing() {
        let table = cleaned(
            "u1,A,Yes,4.1/5,X,\"  \",300\n\
             u2,B,Yes,\" \",X,Cafe,300\n\
             u3,C,Yes,3.4/5,X,Cafe,\" \"\n",
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].name.as_deref(), Some("C"));
        assert_eq!(table.rows()[0].cost, None);
        assert_eq!(table.report().missing_required, 2);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let raw = RawTable::from_reader("name,location\nA,X\n".as_bytes()).unwrap();
        let err = clean(raw, &ColumnNames::default()).unwrap_err();

        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "online_order"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = CleanTable::load("no_such_dataset.csv", &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_locations_sorted_and_distinct() {
        let table = cleaned(
            "u1,A,Yes,4.0/5,Koramangala,Cafe,300\n\
             u2,B,Yes,4.0/5,BTM,Cafe,300\n\
             u3,C,Yes,4.0/5,,Cafe,300\n\
             u4,D,Yes,4.0/5,BTM,Cafe,900\n",
        );

        assert_eq!(table.locations(), vec!["BTM", "Koramangala"]);
        assert_eq!(table.max_cost(), Some(900.0));
    }

    #[test]
    fn test_cuisine_list_splits_on_comma_space() {
        let table = cleaned("u1,A,Yes,4.0/5,X,\"Chinese, Thai, Momos\",300\n");
        let list: Vec<&str> = table.rows()[0].cuisine_list().collect();
        assert_eq!(list, vec!["Chinese", "Thai", "Momos"]);
    }
}
