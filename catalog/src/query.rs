//! PostgREST query strings.
//!
//! Filters are encoded the PostgREST way: the column is the parameter name and
//! the value carries the operator (`id=eq.42`, `id=neq.42`).

use std::fmt::Display;

/// A read query against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    params: Vec<(String, String)>,
    single: bool,
}

impl Query {
    #[must_use]
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
            single: false,
        }
    }

    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    #[must_use]
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    #[must_use]
    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "neq", value)
    }

    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Ask for exactly one row as a bare JSON object.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("{op}.{value}")));
        self
    }

    #[must_use]
    pub fn table(&self) -> &'static str {
        self.table
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.single
    }
}
