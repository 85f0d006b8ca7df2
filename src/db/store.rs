use async_trait::async_trait;
use serde_json::Value;

use crate::error::PortfolioError;

/// "Select all columns from a table", optionally ordered ascending by one
/// column and optionally limited to a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    pub order_by: Option<String>,
    pub single: bool,
}

impl TableQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            order_by: None,
            single: false,
        }
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}

/// Read-only access to a remote table store.
///
/// Rows come back as raw JSON objects; typed decoding happens in the caller.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, PortfolioError>;
}
