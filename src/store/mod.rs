//! Interface to the relational store.
//!
//! The schema runtime only issues reads through [`Store`]. Connection
//! pooling, transactions and consistency are the implementation's business.

#[cfg(feature = "mock")]
pub mod memory;

use crate::resolve::Item;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A find-many or count request.
///
/// `where_clause` is always an object whose `AND` key holds a list of
/// predicates, each keyed by a column or relation name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindManyQuery {
    pub list_key: String,
    pub where_clause: Value,
    pub order_by: Vec<Value>,
    pub take: Option<u64>,
    pub skip: u64,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Looks up at most one item by a unique key, returning only `select`.
    async fn find_unique(
        &self,
        list_key: &str,
        where_unique: &Value,
        select: &[String],
    ) -> Result<Option<Item>, StoreError>;

    async fn find_many(&self, query: &FindManyQuery) -> Result<Vec<Item>, StoreError>;

    async fn count(&self, query: &FindManyQuery) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("List not found: {0}")]
    ListNotFound(String),
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),
    #[error("Query failed: {0}")]
    Query(String),
}
