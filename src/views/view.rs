//! Rendered View Module
//!
//! The value stored in the view cache: a titled table of text cells.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A rendered inventory table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub key: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub generated_at: DateTime<Utc>,
    /// Fresh for every build, so callers can tell a cached view from a rebuild
    pub instance: Uuid,
}

impl RenderedView {
    pub fn new(key: &str, title: &str, columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            generated_at: Utc::now(),
            instance: Uuid::new_v4(),
        }
    }

    /// Returns the rows with at least one cell containing `query`,
    /// ignoring case. A blank query matches every row.
    pub fn filter(&self, query: &str) -> Vec<Vec<String>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.rows.clone();
        }

        self.rows
            .iter()
            .filter(|row| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
            .cloned()
            .collect()
    }
}

/// Formats a price in cents with two decimals, e.g. `1250` as `12.50`.
pub fn format_price(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
