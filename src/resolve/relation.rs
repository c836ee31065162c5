//! Lazy relation capabilities.
//!
//! Resolving a relation field never touches the store. It hands back a small
//! value holding the bound parameters; the store is queried only when the
//! query executor calls one of its operations.

use crate::error::{ResolveError, ResolveResult};
use crate::log_resolve_debug;
use crate::resolve::Item;
use crate::schema::list_info::ListRef;
use crate::schema::types::{RelationMode, ResolvedRelationDBField};
use crate::store::{FindManyQuery, Store};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

/// Pagination and filtering accepted by `findMany` and `count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyArgs {
    #[serde(rename = "where", default)]
    pub where_input: Option<Value>,
    #[serde(default)]
    pub first: Option<u64>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub sort_by: Vec<Value>,
}

impl FindManyArgs {
    /// Reads `where`, `first`, `skip` and `sortBy` from field arguments.
    pub fn from_args(args: &Map<String, Value>) -> ResolveResult<Self> {
        let where_input = match args.get("where") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        };
        let first = match args.get("first") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_u64().ok_or_else(|| {
                ResolveError::InvalidInput(format!("first must be a non-negative integer, got {value}"))
            })?),
        };
        let skip = match args.get("skip") {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_u64().ok_or_else(|| {
                ResolveError::InvalidInput(format!("skip must be a non-negative integer, got {value}"))
            })?,
        };
        let sort_by = match args.get("sortBy") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries.clone(),
            Some(entry @ Value::Object(_)) => vec![entry.clone()],
            Some(other) => {
                return Err(ResolveError::InvalidInput(format!(
                    "sortBy must be a list of sort objects, got {other}"
                )))
            }
        };
        Ok(Self {
            where_input,
            first,
            skip,
            sort_by,
        })
    }

    #[must_use]
    pub fn first(mut self, first: u64) -> Self {
        self.first = Some(first);
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn sort_by(mut self, entry: Value) -> Self {
        self.sort_by.push(entry);
        self
    }

    #[must_use]
    pub fn where_input(mut self, where_input: Value) -> Self {
        self.where_input = Some(where_input);
        self
    }
}

/// The related items of a `many` relation, scoped to one item.
#[derive(Clone)]
pub struct RelationMany {
    store: Arc<dyn Store>,
    list_key: String,
    list: Option<ListRef>,
    foreign_field: String,
    id: Value,
}

impl RelationMany {
    pub(crate) fn new(
        store: Arc<dyn Store>,
        list_key: String,
        list: Option<ListRef>,
        foreign_field: String,
        id: Value,
    ) -> Self {
        Self {
            store,
            list_key,
            list,
            foreign_field,
            id,
        }
    }

    /// The related list.
    #[must_use]
    pub fn list_key(&self) -> &str {
        &self.list_key
    }

    /// The field on the related list that points back at this item.
    #[must_use]
    pub fn foreign_field(&self) -> &str {
        &self.foreign_field
    }

    #[must_use]
    pub fn id(&self) -> &Value {
        &self.id
    }

    async fn query(&self, args: &FindManyArgs) -> ResolveResult<FindManyQuery> {
        let mut and = vec![json!({ self.foreign_field.clone(): { "id": self.id.clone() } })];
        if let Some(where_input) = &args.where_input {
            let resolvers = self
                .list
                .as_ref()
                .and_then(ListRef::input_resolvers)
                .ok_or_else(|| ResolveError::SchemaUnavailable(self.list_key.clone()))?;
            and.push(resolvers.resolve_where(where_input).await?);
        }

        Ok(FindManyQuery {
            list_key: self.list_key.clone(),
            where_clause: json!({ "AND": and }),
            order_by: args.sort_by.clone(),
            take: args.first,
            skip: args.skip,
        })
    }

    pub async fn find_many(&self, args: &FindManyArgs) -> ResolveResult<Vec<Item>> {
        let query = self.query(args).await?;
        log_resolve_debug!(
            "findMany on {} where {}",
            self.list_key,
            query.where_clause
        );
        Ok(self.store.find_many(&query).await?)
    }

    pub async fn count(&self, args: &FindManyArgs) -> ResolveResult<u64> {
        let query = self.query(args).await?;
        log_resolve_debug!("count on {} where {}", self.list_key, query.where_clause);
        Ok(self.store.count(&query).await?)
    }
}

impl fmt::Debug for RelationMany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationMany")
            .field("list_key", &self.list_key)
            .field("foreign_field", &self.foreign_field)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// The related item of a `one` relation.
///
/// The foreign key is read from the owning item, or fetched by projection
/// when the item was loaded without it. When this side stores no key and
/// the counterpart is also a `one` relation, the key lives on the related
/// list and the related item is found through it instead.
#[derive(Clone)]
pub struct RelationOne {
    store: Arc<dyn Store>,
    list_key: String,
    field_path: String,
    id: Value,
    foreign_key: Option<Value>,
    related_list_key: String,
    related_list: Option<ListRef>,
    foreign_field: String,
}

impl RelationOne {
    pub(crate) fn new(
        store: Arc<dyn Store>,
        list_key: String,
        field_path: String,
        id: Value,
        relation: &ResolvedRelationDBField,
        related_list: Option<ListRef>,
    ) -> Self {
        Self {
            store,
            list_key,
            field_path,
            id,
            foreign_key: None,
            related_list_key: relation.list.clone(),
            related_list,
            foreign_field: relation.field.clone(),
        }
    }

    /// Uses a foreign key already present on the owning item.
    #[must_use]
    pub(crate) fn with_foreign_key(mut self, foreign_key: Option<Value>) -> Self {
        self.foreign_key = foreign_key;
        self
    }

    #[must_use]
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    /// The related list.
    #[must_use]
    pub fn list_key(&self) -> &str {
        &self.related_list_key
    }

    #[must_use]
    pub fn id(&self) -> &Value {
        &self.id
    }

    /// Fetches the related item, returning only `select` (every column when
    /// empty). `None` when the relation is not set.
    pub async fn load(&self, select: &[String]) -> ResolveResult<Option<Item>> {
        if let Some(key) = self.foreign_key_value().await? {
            log_resolve_debug!(
                "findUnique on {} for {}.{} = {}",
                self.related_list_key,
                self.list_key,
                self.field_path,
                key
            );
            return Ok(self
                .store
                .find_unique(&self.related_list_key, &json!({ "id": key }), select)
                .await?);
        }

        if !self.counterpart_holds_key() {
            return Ok(None);
        }
        let query = FindManyQuery {
            list_key: self.related_list_key.clone(),
            where_clause: json!({ "AND": [{ self.foreign_field.clone(): { "id": self.id.clone() } }] }),
            order_by: Vec::new(),
            take: Some(1),
            skip: 0,
        };
        log_resolve_debug!(
            "findMany on {} where {}",
            self.related_list_key,
            query.where_clause
        );
        Ok(self.store.find_many(&query).await?.into_iter().next())
    }

    async fn foreign_key_value(&self) -> ResolveResult<Option<Value>> {
        let key = match &self.foreign_key {
            Some(key) => key.clone(),
            None => self
                .store
                .find_unique(
                    &self.list_key,
                    &json!({ "id": self.id.clone() }),
                    std::slice::from_ref(&self.field_path),
                )
                .await?
                .and_then(|item| item.get(&self.field_path).cloned())
                .unwrap_or(Value::Null),
        };
        Ok(match key {
            Value::Null => None,
            Value::Object(mut connected) => connected.remove("id").filter(|id| !id.is_null()),
            key => Some(key),
        })
    }

    fn counterpart_holds_key(&self) -> bool {
        self.related_list
            .as_ref()
            .and_then(ListRef::types)
            .is_some_and(|types| {
                types
                    .output
                    .field(&self.foreign_field)
                    .and_then(|field| field.resolver.db_field().as_relation())
                    .is_some_and(|relation| relation.mode == RelationMode::One)
            })
    }
}

impl fmt::Debug for RelationOne {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationOne")
            .field("list_key", &self.list_key)
            .field("field_path", &self.field_path)
            .field("id", &self.id)
            .field("foreign_key", &self.foreign_key)
            .field("related_list_key", &self.related_list_key)
            .field("foreign_field", &self.foreign_field)
            .finish_non_exhaustive()
    }
}
