//! Named, column-oriented tables that chart specifications bind to.

use crate::error::{DashError, Result};
use chrono::NaiveDate;

/// A typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Calendar dates.
    Date(Vec<NaiveDate>),
    /// Integer counts.
    Int(Vec<i64>),
    /// Free text.
    Text(Vec<String>),
}

impl Column {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Date(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Whether the column is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }

    /// Whether the column can be placed on a numeric axis.
    pub fn is_plottable(&self) -> bool {
        matches!(self, Self::Date(_) | Self::Int(_))
    }
}

/// An ordered set of equally long named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    name: String,
    columns: Vec<(String, Column)>,
}

impl DataTable {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Appends or replaces a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
        self
    }

    /// Removes a column if present.
    #[must_use]
    pub fn without_column(mut self, name: &str) -> Self {
        self.columns.retain(|(n, _)| n != name);
        self
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row count, taken from the first column.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Looks up a column, failing with a schema error naming it.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| DashError::schema(name, &self.name))
    }

    /// Checks that every listed column exists.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        names.iter().try_for_each(|name| self.column(name).map(|_| ()))
    }
}
