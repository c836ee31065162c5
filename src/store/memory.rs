//! In-memory [`Store`] for tests and local development.
//!
//! Rows are plain [`Item`]s. Every call is recorded so callers can assert
//! exactly which queries were issued.

use super::{FindManyQuery, Store, StoreError};
use crate::log_store_debug;
use crate::resolve::Item;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FindUnique {
        list_key: String,
        where_unique: Value,
        select: Vec<String>,
    },
    FindMany(FindManyQuery),
    Count(FindManyQuery),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<String, Vec<Item>>>,
    calls: RwLock<Vec<StoreCall>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, list_key: &str, item: Item) {
        self.rows
            .write()
            .await
            .entry(list_key.to_string())
            .or_default()
            .push(item);
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    async fn record(&self, call: StoreCall) {
        log_store_debug!("memory store call: {:?}", call);
        self.calls.write().await.push(call);
    }

    async fn select_rows(&self, query: &FindManyQuery) -> Result<Vec<Item>, StoreError> {
        let rows = self.rows.read().await;
        let mut matched = Vec::new();
        for row in rows.get(&query.list_key).into_iter().flatten() {
            if matches_filter(row, &query.where_clause)? {
                matched.push(row.clone());
            }
        }

        let order = order_columns(&query.order_by)?;
        if !order.is_empty() {
            matched.sort_by(|a, b| compare_rows(a, b, &order));
        }

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = query
            .take
            .map_or(usize::MAX, |take| usize::try_from(take).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(skip).take(take).collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_unique(
        &self,
        list_key: &str,
        where_unique: &Value,
        select: &[String],
    ) -> Result<Option<Item>, StoreError> {
        self.record(StoreCall::FindUnique {
            list_key: list_key.to_string(),
            where_unique: where_unique.clone(),
            select: select.to_vec(),
        })
        .await;

        let rows = self.rows.read().await;
        for row in rows.get(list_key).into_iter().flatten() {
            if matches_filter(row, where_unique)? {
                if select.is_empty() {
                    return Ok(Some(row.clone()));
                }
                let projected: Map<String, Value> = select
                    .iter()
                    .map(|column| {
                        (
                            column.clone(),
                            row.get(column).cloned().unwrap_or(Value::Null),
                        )
                    })
                    .collect();
                return Ok(Some(Item::from(projected)));
            }
        }
        Ok(None)
    }

    async fn find_many(&self, query: &FindManyQuery) -> Result<Vec<Item>, StoreError> {
        self.record(StoreCall::FindMany(query.clone())).await;
        self.select_rows(query).await
    }

    async fn count(&self, query: &FindManyQuery) -> Result<u64, StoreError> {
        self.record(StoreCall::Count(query.clone())).await;
        let rows = self.select_rows(query).await?;
        Ok(rows.len() as u64)
    }
}

fn matches_filter(row: &Item, filter: &Value) -> Result<bool, StoreError> {
    let filter = match filter {
        Value::Null => return Ok(true),
        Value::Object(filter) => filter,
        other => {
            return Err(StoreError::UnsupportedFilter(format!(
                "expected an object, got {other}"
            )))
        }
    };

    for (key, condition) in filter {
        let matched = match key.as_str() {
            "AND" => all_match(row, condition)?,
            "OR" => {
                let mut any = false;
                for nested in as_filter_list(condition)? {
                    if matches_filter(row, nested)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            "NOT" => {
                let mut none = true;
                for nested in as_filter_list(condition)? {
                    if matches_filter(row, nested)? {
                        none = false;
                        break;
                    }
                }
                none
            }
            column => matches_column(row.get(column).unwrap_or(&Value::Null), condition)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn all_match(row: &Item, condition: &Value) -> Result<bool, StoreError> {
    for nested in as_filter_list(condition)? {
        if !matches_filter(row, nested)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn as_filter_list(condition: &Value) -> Result<Vec<&Value>, StoreError> {
    match condition {
        Value::Null => Ok(Vec::new()),
        Value::Array(filters) => Ok(filters.iter().collect()),
        single @ Value::Object(_) => Ok(vec![single]),
        other => Err(StoreError::UnsupportedFilter(format!(
            "expected a list of filters, got {other}"
        ))),
    }
}

fn matches_column(actual: &Value, condition: &Value) -> Result<bool, StoreError> {
    let operators = match condition {
        Value::Object(operators) => operators,
        expected => return Ok(actual == expected),
    };

    for (operator, expected) in operators {
        let matched = match operator.as_str() {
            // relation equality: the row stores the related id
            "id" | "equals" => actual == expected,
            "not" => actual != expected,
            "in" => expected
                .as_array()
                .is_some_and(|values| values.contains(actual)),
            "notIn" => expected
                .as_array()
                .is_some_and(|values| !values.contains(actual)),
            "lt" => compare_values(actual, expected) == Some(Ordering::Less),
            "lte" => matches!(
                compare_values(actual, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            "gt" => compare_values(actual, expected) == Some(Ordering::Greater),
            "gte" => matches!(
                compare_values(actual, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            "contains" => match (actual, expected) {
                (Value::String(actual), Value::String(expected)) => actual.contains(expected.as_str()),
                _ => false,
            },
            other => {
                return Err(StoreError::UnsupportedFilter(format!(
                    "unknown operator {other}"
                )))
            }
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Flattens sort entries into `(column, descending)` pairs. A nested object
/// sorts the columns of a multi field, named `<field>_<inner>`.
fn order_columns(order_by: &[Value]) -> Result<Vec<(String, bool)>, StoreError> {
    let mut columns = Vec::new();
    for entry in order_by {
        let Value::Object(entry) = entry else {
            return Err(StoreError::UnsupportedFilter(format!(
                "expected a sort object, got {entry}"
            )));
        };
        for (field, direction) in entry {
            match direction {
                Value::Object(nested) => {
                    for (inner, direction) in nested {
                        columns.push((format!("{field}_{inner}"), is_descending(direction)?));
                    }
                }
                direction => columns.push((field.clone(), is_descending(direction)?)),
            }
        }
    }
    Ok(columns)
}

fn is_descending(direction: &Value) -> Result<bool, StoreError> {
    match direction.as_str() {
        Some("asc") => Ok(false),
        Some("desc") => Ok(true),
        _ => Err(StoreError::UnsupportedFilter(format!(
            "invalid sort direction {direction}"
        ))),
    }
}

fn compare_rows(a: &Item, b: &Item, order: &[(String, bool)]) -> Ordering {
    for (column, descending) in order {
        let left = a.get(column).unwrap_or(&Value::Null);
        let right = b.get(column).unwrap_or(&Value::Null);
        let ordering = compare_values(left, right).unwrap_or(Ordering::Equal);
        let ordering = if *descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
