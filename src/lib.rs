//! # List Schema
//!
//! Compiles declarative list and field definitions into a cross-referenced
//! schema and the runtime that answers field reads against a relational
//! store.
//!
//! ## Core Components
//!
//! * `schema` - field construction, relationship resolution, type
//!   compilation and publication of the compiled schema
//! * `permissions` - normalization and evaluation of list and field access
//! * `resolve` - per-field resolution, lazy relation capabilities and cache
//!   control
//! * `store` - the store interface the runtime reads through
//! * `config`, `logging`, `error` - configuration, logging and error types
//!
//! ## Architecture
//!
//! A schema is built once from a map of list key to [`ListConfig`]. Field
//! constructors run first against a shared arena of list slots, so a field
//! can refer to any list regardless of declaration order. Relationships are
//! then resolved across all lists in one pass, and finally every list is
//! validated, compiled and installed into the arena. The resulting
//! [`CompiledSchema`] is immutable and safe to share between requests.
//!
//! At request time the query executor resolves each requested output field
//! through its [`OutputFieldResolver`], which checks read access, records the
//! field's cache hint and derives the value from the item.

pub mod config;
pub mod error;
pub mod logging;
pub mod permissions;
pub mod resolve;
pub mod schema;
pub mod store;

// Re-export main types for convenience
pub use config::{CompileConfig, ConfigError, SchemaConfig};
pub use error::{ResolveError, ResolveResult, SchemaError, SchemaResult};
pub use logging::{LogConfig, LoggingError, LoggingSystem};
pub use permissions::{
    AccessArgs, AccessRule, FieldAccessControl, ListAccessControl, PermissionManager,
};
pub use resolve::{
    CacheControl, CacheHint, FieldInfo, FindManyArgs, Item, OutputFieldResolver, RequestContext,
    RequestedField, ResolvedValue,
};
pub use schema::types::Operation;
pub use schema::{initialise_lists, CompiledSchema, ListConfig, SchemaRegistry};
pub use store::{FindManyQuery, Store, StoreError};
