//! Translation of where and unique-where input values into store filters.

use crate::error::{ResolveError, ResolveResult};
use crate::log_resolve_trace;
use crate::schema::initializer::InitialisedField;
use crate::schema::types::FieldInputArg;
use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

const CONNECTIVES: [&str; 3] = ["AND", "OR", "NOT"];

/// The where and unique-where translators of one list.
#[derive(Debug, Clone)]
pub struct InputResolvers {
    list_key: String,
    fields: Arc<BTreeMap<String, InitialisedField>>,
}

impl InputResolvers {
    pub(crate) fn new(list_key: String, fields: Arc<BTreeMap<String, InitialisedField>>) -> Self {
        Self { list_key, fields }
    }

    #[must_use]
    pub fn list_key(&self) -> &str {
        &self.list_key
    }

    /// Rewrites a where filter into store shape.
    ///
    /// `AND`, `OR` and `NOT` keep their nesting; only the per-field leaves
    /// pass through the field's where transform. `null` means no filter.
    pub fn resolve_where<'a>(&'a self, input: &'a Value) -> BoxFuture<'a, ResolveResult<Value>> {
        async move {
            let entries = match input {
                Value::Null => return Ok(Value::Object(Map::new())),
                Value::Object(entries) => entries,
                other => {
                    return Err(ResolveError::InvalidInput(format!(
                        "a where filter on {} must be an object, got {other}",
                        self.list_key
                    )))
                }
            };

            let resolved = try_join_all(
                entries
                    .iter()
                    .map(|(key, value)| self.resolve_where_entry(key, value)),
            )
            .await?;
            Ok(Value::Object(resolved.into_iter().collect()))
        }
        .boxed()
    }

    async fn resolve_where_entry(&self, key: &str, value: &Value) -> ResolveResult<(String, Value)> {
        // A field filtering under a connective's name replaces the connective
        // slot in the where type, so it is resolved as that field.
        let shadowed = self
            .fields
            .get(key)
            .is_some_and(|field| field.input.where_input.is_some());
        if CONNECTIVES.contains(&key) && !shadowed {
            let nested = match value {
                Value::Null => Value::Null,
                Value::Array(filters) => Value::Array(
                    try_join_all(filters.iter().map(|filter| self.resolve_where(filter))).await?,
                ),
                filter @ Value::Object(_) => self.resolve_where(filter).await?,
                other => {
                    return Err(ResolveError::InvalidInput(format!(
                        "{key} expects a list of filters, got {other}"
                    )))
                }
            };
            return Ok((key.to_string(), nested));
        }

        let input = self.field_input(key, "where", |field| field.input.where_input.as_ref())?;
        let resolved = input.resolve_value(value.clone()).await?;
        log_resolve_trace!("where {}.{}: {} -> {}", self.list_key, key, value, resolved);
        Ok((key.to_string(), resolved))
    }

    /// Rewrites a unique-where filter. Exactly one key must be present.
    pub async fn resolve_unique_where(&self, input: &Value) -> ResolveResult<Value> {
        let entries = match input {
            Value::Object(entries) => entries,
            Value::Null => return Err(ResolveError::InvalidUniqueWhere { count: 0 }),
            other => {
                return Err(ResolveError::InvalidInput(format!(
                    "a unique where filter on {} must be an object, got {other}",
                    self.list_key
                )))
            }
        };

        let mut pairs = entries.iter();
        let (key, value) = match (pairs.next(), pairs.next()) {
            (Some(pair), None) => pair,
            _ => {
                return Err(ResolveError::InvalidUniqueWhere {
                    count: entries.len(),
                })
            }
        };

        let input = self.field_input(key, "uniqueWhere", |field| field.input.unique_where.as_ref())?;
        let resolved = input.resolve_value(value.clone()).await?;

        let mut result = Map::new();
        result.insert(key.clone(), resolved);
        Ok(Value::Object(result))
    }

    fn field_input(
        &self,
        field_path: &str,
        input: &str,
        select: impl Fn(&InitialisedField) -> Option<&FieldInputArg>,
    ) -> ResolveResult<&FieldInputArg> {
        let field = self
            .fields
            .get(field_path)
            .ok_or_else(|| ResolveError::UnknownField {
                list_key: self.list_key.clone(),
                field_path: field_path.to_string(),
            })?;
        select(field).ok_or_else(|| ResolveError::UnsupportedInput {
            list_key: self.list_key.clone(),
            field_path: field_path.to_string(),
            input: input.to_string(),
        })
    }
}
