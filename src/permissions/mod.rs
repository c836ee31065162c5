//! # Permissions System
//!
//! Access control for lists and fields.
//!
//! ## Components
//!
//! * `types` - the shorthand forms an author may write and the canonical
//!   per-operation records they normalize into
//! * `permission_manager` - evaluation of normalized rules
//!
//! Authors may give a bare flag, a single predicate, or a per-operation
//! record. Normalization happens once while the schema is built; everything
//! downstream only ever sees the canonical records.

pub mod permission_manager;
pub mod types;

pub use permission_manager::PermissionManager;
pub use types::policy::{
    parse_field_access_control, parse_list_access_control, AccessArgs, AccessPredicate,
    AccessRule, FieldAccessControl, FieldOperationAccess, ListAccessControl,
    ListOperationAccess, ResolvedFieldAccessControl, ResolvedListAccessControl,
};
