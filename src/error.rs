//! Error types for schema compilation and field resolution.
//!
//! Two tiers are kept apart:
//!
//! * [`SchemaError`] aborts schema initialisation. No partially built schema
//!   is ever returned alongside one.
//! * [`ResolveError`] is raised while answering a single field (or input) of a
//!   request and is attached to that field's slot in the result.

use crate::schema::types::Operation;
use crate::store::StoreError;
use serde_json::Value;

/// Compile-time errors raised while initialising lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("The field {field_path} on the {list_key} list defines an extra output field named {name} which conflicts with the field named {name} on the same list")]
    ExtraOutputFieldConflictsWithField {
        list_key: String,
        field_path: String,
        name: String,
    },

    #[error("The field {field_path} on the {list_key} list defines an extra output field named {name} which conflicts with the field {other_field_path} which also defines an extra output field named {name}")]
    ExtraOutputFieldsConflict {
        list_key: String,
        field_path: String,
        other_field_path: String,
        name: String,
    },

    #[error("The {list_key} list does not define an id field")]
    MissingIdField { list_key: String },

    #[error("The id field on a list must define a unique where input with the ID scalar type but the id field for {list_key} does not define one")]
    IdFieldMissingUniqueWhere { list_key: String },

    #[error("The id field on a list must define a unique where input with the ID scalar type but the id field for {list_key} defines the type {found}")]
    IdFieldUniqueWhereNotId { list_key: String, found: String },

    #[error("The id field on a list must not define a create input but the id field for {list_key} does define one")]
    IdFieldDefinesCreateInput { list_key: String },

    #[error("The id field on a list must not define an update input but the id field for {list_key} does define one")]
    IdFieldDefinesUpdateInput { list_key: String },

    #[error("The relationship field {field_path} on the {list_key} list points to the list {target_list} which does not exist")]
    RelationListNotFound {
        list_key: String,
        field_path: String,
        target_list: String,
    },

    #[error("The relationship field {field_path} on the {list_key} list points to {target_list}.{target_field} which does not exist")]
    RelationFieldNotFound {
        list_key: String,
        field_path: String,
        target_list: String,
        target_field: String,
    },

    #[error("The relationship field {field_path} on the {list_key} list points to {target_list}.{target_field} but that field is not a relationship back to {list_key}.{field_path}")]
    RelationFieldMismatch {
        list_key: String,
        field_path: String,
        target_list: String,
        target_field: String,
    },

    #[error("The relationship field {field_path} on the {list_key} list needs the back reference {back_reference} on the {target_list} list but that name is already taken")]
    BackReferenceConflict {
        list_key: String,
        field_path: String,
        target_list: String,
        back_reference: String,
    },

    #[error("The field {field_path} on the {list_key} list uses a name reserved for where connectives")]
    ReservedFieldName { list_key: String, field_path: String },

    #[error("The field {field_path} on the {list_key} list stores the column {column} which conflicts with the field {other_field_path}")]
    MultiColumnConflict {
        list_key: String,
        field_path: String,
        column: String,
        other_field_path: String,
    },

    #[error("The field {field_path} on the {list_key} list has no resolved storage")]
    UnresolvedField { list_key: String, field_path: String },

    #[error("The {list_key} list is not part of this schema")]
    UnknownList { list_key: String },

    #[error("The {list_key} list has already been installed")]
    AlreadyInstalled { list_key: String },
}

/// Request-time errors raised while resolving a single field or input value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("You do not have access to this resource: {operation} on {field_path} for item {item_id}")]
    AccessDenied {
        operation: Operation,
        field_path: String,
        item_id: Value,
    },

    #[error("Exactly one key must be passed in a unique where input but {count} keys were passed")]
    InvalidUniqueWhere { count: usize },

    #[error("The {list_key} list has no field named {field_path}")]
    UnknownField { list_key: String, field_path: String },

    #[error("The field {field_path} on the {list_key} list does not accept {input} input")]
    UnsupportedInput {
        list_key: String,
        field_path: String,
        input: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("The {0} list is not part of a published schema")]
    SchemaUnavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Resolver(String),
}

impl ResolveError {
    /// Returns true when the error is an access denial rather than a failure.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ResolveError::AccessDenied { .. })
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;
pub type ResolveResult<T> = Result<T, ResolveError>;
