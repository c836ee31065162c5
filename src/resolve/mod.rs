//! # Field Resolution
//!
//! Runtime half of the crate. The query executor calls
//! [`OutputFieldResolver::resolve`] once per requested field per item,
//! usually through [`ObjectType::resolve_fields`](crate::schema::types::ObjectType::resolve_fields).

pub mod context;
pub mod field_resolver;
pub mod relation;
pub mod value;

pub use context::{CacheControl, CacheHint, CacheScope, FieldInfo, RequestContext};
pub use field_resolver::{OutputFieldResolver, RequestedField};
pub use relation::{FindManyArgs, RelationMany, RelationOne};
pub use value::{Item, ResolvedValue};
