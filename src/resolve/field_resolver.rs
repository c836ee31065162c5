//! Resolution of a single output field on a single item.

use crate::error::{ResolveError, ResolveResult};
use crate::permissions::{AccessArgs, AccessRule, PermissionManager};
use crate::resolve::relation::{RelationMany, RelationOne};
use crate::resolve::{CacheHint, FieldInfo, Item, RequestContext, ResolvedValue};
use crate::schema::list_info::ListRef;
use crate::schema::types::{
    ObjectType, Operation, OutputResolveArgs, OutputResolveFn, RelationMode, ResolvedDBField,
};
use crate::log_resolve_debug;
use futures::future::join_all;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Answers reads of one output field.
///
/// The primary binding of a field and each of its extra output fields get
/// their own resolver; they share storage, access and cache hint and differ
/// only in the output transform.
#[derive(Clone)]
pub struct OutputFieldResolver {
    list_key: String,
    field_path: String,
    db_field: ResolvedDBField,
    cache_hint: Option<CacheHint>,
    read_access: AccessRule,
    output_resolve: Option<OutputResolveFn>,
    related_list: Option<ListRef>,
    permissions: PermissionManager,
}

impl OutputFieldResolver {
    pub(crate) fn new(
        list_key: String,
        field_path: String,
        db_field: ResolvedDBField,
        cache_hint: Option<CacheHint>,
        read_access: AccessRule,
        output_resolve: Option<OutputResolveFn>,
        related_list: Option<ListRef>,
    ) -> Self {
        Self {
            list_key,
            field_path,
            db_field,
            cache_hint,
            read_access,
            output_resolve,
            related_list,
            permissions: PermissionManager::new(),
        }
    }

    #[must_use]
    pub fn list_key(&self) -> &str {
        &self.list_key
    }

    #[must_use]
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    #[must_use]
    pub fn db_field(&self) -> &ResolvedDBField {
        &self.db_field
    }

    /// Resolves this field for `item`.
    ///
    /// Read access is checked first; a denial fails only this field. On
    /// success the cache hint is recorded, the value is derived from the
    /// item according to the storage shape, and the output transform runs
    /// last. Relations resolve to capabilities that query the store only
    /// when invoked.
    pub async fn resolve(
        &self,
        item: &Item,
        args: Map<String, Value>,
        context: &RequestContext,
        info: &FieldInfo,
    ) -> ResolveResult<ResolvedValue> {
        let id = item.id();

        let access_args = AccessArgs {
            session: context.session.clone(),
            list_key: self.list_key.clone(),
            field_key: Some(self.field_path.clone()),
            operation: Operation::Read,
            item: Some(item.clone()),
            original_input: None,
        };
        if !self
            .permissions
            .validate_field_access(&self.read_access, access_args)
            .await
        {
            return Err(ResolveError::AccessDenied {
                operation: Operation::Read,
                field_path: self.field_path.clone(),
                item_id: id,
            });
        }

        if let (Some(hint), Some(cache_control)) = (self.cache_hint, &info.cache_control) {
            cache_control.set_cache_hint(&info.path, hint);
        }

        let value = self.derive_value(item, &id, context);
        log_resolve_debug!(
            "Resolved {}.{} ({}) for {}",
            self.list_key,
            self.field_path,
            self.db_field.kind_name(),
            id
        );

        match &self.output_resolve {
            Some(resolve) => {
                resolve(OutputResolveArgs {
                    id,
                    value,
                    item: item.clone(),
                    args,
                    context: context.clone(),
                    info: info.clone(),
                })
                .await
            }
            None => Ok(value),
        }
    }

    fn derive_value(&self, item: &Item, id: &Value, context: &RequestContext) -> ResolvedValue {
        match &self.db_field {
            ResolvedDBField::Scalar(_) | ResolvedDBField::None => {
                ResolvedValue::Value(item.get(&self.field_path).cloned().unwrap_or(Value::Null))
            }
            ResolvedDBField::Multi(multi) => {
                let columns: Map<String, Value> = multi
                    .column_paths(&self.field_path)
                    .map(|(inner, column)| {
                        (
                            inner.to_string(),
                            item.get(&column).cloned().unwrap_or(Value::Null),
                        )
                    })
                    .collect();
                ResolvedValue::Value(Value::Object(columns))
            }
            ResolvedDBField::Relation(relation) => match relation.mode {
                RelationMode::Many => ResolvedValue::Many(RelationMany::new(
                    context.store.clone(),
                    relation.list.clone(),
                    self.related_list.clone(),
                    relation.field.clone(),
                    id.clone(),
                )),
                RelationMode::One => ResolvedValue::One(
                    RelationOne::new(
                        context.store.clone(),
                        self.list_key.clone(),
                        self.field_path.clone(),
                        id.clone(),
                        relation,
                        self.related_list.clone(),
                    )
                    .with_foreign_key(item.get(&self.field_path).cloned()),
                ),
            },
        }
    }
}

impl fmt::Debug for OutputFieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputFieldResolver")
            .field("list_key", &self.list_key)
            .field("field_path", &self.field_path)
            .field("db_field", &self.db_field)
            .field("cache_hint", &self.cache_hint)
            .field("read_access", &self.read_access)
            .finish_non_exhaustive()
    }
}

/// One output field requested by the query executor.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestedField {
    /// The key the result is reported under: the alias, or the field name.
    pub response_key: String,
    pub name: String,
    pub args: Map<String, Value>,
}

impl RequestedField {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        let name = name.into();
        Self {
            response_key: name.clone(),
            name,
            args,
        }
    }

    #[must_use]
    pub fn alias(mut self, response_key: impl Into<String>) -> Self {
        self.response_key = response_key.into();
        self
    }
}

impl ObjectType {
    /// Resolves one named output field of this type for `item`.
    pub async fn resolve_field(
        &self,
        name: &str,
        item: &Item,
        args: Map<String, Value>,
        context: &RequestContext,
        info: &FieldInfo,
    ) -> ResolveResult<ResolvedValue> {
        let field = self.field(name).ok_or_else(|| ResolveError::UnknownField {
            list_key: self.name.clone(),
            field_path: name.to_string(),
        })?;
        field.resolver.resolve(item, args, context, info).await
    }

    /// Resolves several output fields of one item concurrently.
    ///
    /// Results are keyed by response key, so the same field requested twice
    /// under different aliases yields two entries. Every field gets its own
    /// result and a denied field never takes its siblings down with it.
    /// Response paths are `<path>.<response key>`.
    pub async fn resolve_fields(
        &self,
        item: &Item,
        requested: Vec<RequestedField>,
        context: &RequestContext,
        info: &FieldInfo,
    ) -> BTreeMap<String, ResolveResult<ResolvedValue>> {
        let resolutions = requested.into_iter().map(|field| async move {
            let field_info = FieldInfo {
                path: if info.path.is_empty() {
                    field.response_key.clone()
                } else {
                    format!("{}.{}", info.path, field.response_key)
                },
                cache_control: info.cache_control.clone(),
            };
            let result = self
                .resolve_field(&field.name, item, field.args, context, &field_info)
                .await;
            (field.response_key, result)
        });
        join_all(resolutions).await.into_iter().collect()
    }
}
