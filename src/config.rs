//! Dashboard configuration.
//!
//! Stored as an optional JSON file on disk; every field falls back to a default:
//! ```json
//! {
//!   "data_path": "zomato.csv",
//!   "columns": { "rating": "rate", "cost": "approx_cost(for two people)" },
//!   "top_cuisines": 15
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides [`DashboardConfig::data_path`].
pub const DATA_PATH_ENV: &str = "DASHBOARD_DATA_PATH";

/// Header names of the columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub location: String,
    pub online_order: String,
    pub rating: String,
    pub cost: String,
    pub cuisines: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "name".into(),
            location: "location".into(),
            online_order: "online_order".into(),
            rating: "rate".into(),
            cost: "approx_cost(for two people)".into(),
            cuisines: "cuisines".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub columns: ColumnNames,
    pub top_locations: usize,
    pub top_cuisines: usize,
    pub top_restaurants: usize,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("zomato.csv"),
            columns: ColumnNames::default(),
            top_locations: 10,
            top_cuisines: 10,
            top_restaurants: 20,
            histogram_bins: 20,
            preview_rows: 10,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        Ok(config)
    }

    /// Resolves the effective config: the JSON file if given, else defaults,
    /// then the data path from the environment when set.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };

        if let Ok(data_path) = std::env::var(DATA_PATH_ENV) {
            config.data_path = PathBuf::from(data_path);
        }

        Ok(config)
    }
}
