use crate::resolve::Item;
use crate::schema::types::Operation;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Everything an access predicate gets to look at.
#[derive(Debug, Clone)]
pub struct AccessArgs {
    pub session: Option<Value>,
    pub list_key: String,
    /// Set for field-level checks, `None` for list-level checks.
    pub field_key: Option<String>,
    pub operation: Operation,
    pub item: Option<Item>,
    pub original_input: Option<Value>,
}

pub type AccessPredicate = Arc<dyn Fn(AccessArgs) -> BoxFuture<'static, bool> + Send + Sync>;

/// A single canonical gate: a fixed answer or a predicate to evaluate.
#[derive(Clone)]
pub enum AccessRule {
    Flag(bool),
    Predicate(AccessPredicate),
}

impl AccessRule {
    #[must_use]
    pub fn allow() -> Self {
        AccessRule::Flag(true)
    }

    #[must_use]
    pub fn deny() -> Self {
        AccessRule::Flag(false)
    }

    pub fn predicate<F, Fut>(predicate: F) -> Self
    where
        F: Fn(AccessArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        AccessRule::Predicate(Arc::new(move |args| Box::pin(predicate(args))))
    }

    /// The fixed answer of this rule, if it has one.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AccessRule::Flag(allowed) => Some(*allowed),
            AccessRule::Predicate(_) => None,
        }
    }

    pub async fn evaluate(&self, args: AccessArgs) -> bool {
        match self {
            AccessRule::Flag(allowed) => *allowed,
            AccessRule::Predicate(predicate) => predicate(args).await,
        }
    }
}

impl From<bool> for AccessRule {
    fn from(allowed: bool) -> Self {
        AccessRule::Flag(allowed)
    }
}

impl fmt::Debug for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRule::Flag(allowed) => f.debug_tuple("Flag").field(allowed).finish(),
            AccessRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Per-operation list access as written by an author. Missing operations are allowed.
#[derive(Debug, Clone, Default)]
pub struct ListOperationAccess {
    pub create: Option<AccessRule>,
    pub read: Option<AccessRule>,
    pub update: Option<AccessRule>,
    pub delete: Option<AccessRule>,
}

/// List access in any of the shorthand forms an author may supply.
#[derive(Clone)]
pub enum ListAccessControl {
    Flag(bool),
    Predicate(AccessPredicate),
    PerOperation(ListOperationAccess),
}

impl ListAccessControl {
    pub fn predicate<F, Fut>(predicate: F) -> Self
    where
        F: Fn(AccessArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        ListAccessControl::Predicate(Arc::new(move |args| Box::pin(predicate(args))))
    }
}

impl fmt::Debug for ListAccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListAccessControl::Flag(allowed) => f.debug_tuple("Flag").field(allowed).finish(),
            ListAccessControl::Predicate(_) => f.write_str("Predicate(..)"),
            ListAccessControl::PerOperation(access) => {
                f.debug_tuple("PerOperation").field(access).finish()
            }
        }
    }
}

impl From<bool> for ListAccessControl {
    fn from(allowed: bool) -> Self {
        ListAccessControl::Flag(allowed)
    }
}

impl From<ListOperationAccess> for ListAccessControl {
    fn from(access: ListOperationAccess) -> Self {
        ListAccessControl::PerOperation(access)
    }
}

/// Per-operation field access as written by an author. Missing operations are allowed.
#[derive(Debug, Clone, Default)]
pub struct FieldOperationAccess {
    pub create: Option<AccessRule>,
    pub read: Option<AccessRule>,
    pub update: Option<AccessRule>,
}

/// Field access in any of the shorthand forms an author may supply.
#[derive(Clone)]
pub enum FieldAccessControl {
    Flag(bool),
    Predicate(AccessPredicate),
    PerOperation(FieldOperationAccess),
}

impl FieldAccessControl {
    pub fn predicate<F, Fut>(predicate: F) -> Self
    where
        F: Fn(AccessArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        FieldAccessControl::Predicate(Arc::new(move |args| Box::pin(predicate(args))))
    }
}

impl fmt::Debug for FieldAccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAccessControl::Flag(allowed) => f.debug_tuple("Flag").field(allowed).finish(),
            FieldAccessControl::Predicate(_) => f.write_str("Predicate(..)"),
            FieldAccessControl::PerOperation(access) => {
                f.debug_tuple("PerOperation").field(access).finish()
            }
        }
    }
}

impl From<bool> for FieldAccessControl {
    fn from(allowed: bool) -> Self {
        FieldAccessControl::Flag(allowed)
    }
}

impl From<FieldOperationAccess> for FieldAccessControl {
    fn from(access: FieldOperationAccess) -> Self {
        FieldAccessControl::PerOperation(access)
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedListAccessControl {
    pub create: AccessRule,
    pub read: AccessRule,
    pub update: AccessRule,
    pub delete: AccessRule,
}

impl ResolvedListAccessControl {
    #[must_use]
    pub fn rule(&self, operation: Operation) -> &AccessRule {
        match operation {
            Operation::Create => &self.create,
            Operation::Read => &self.read,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedFieldAccessControl {
    pub read: AccessRule,
    pub create: AccessRule,
    pub update: AccessRule,
}

impl ResolvedFieldAccessControl {
    /// Fields carry no delete gate; deleting is decided at list level.
    #[must_use]
    pub fn rule(&self, operation: Operation) -> Option<&AccessRule> {
        match operation {
            Operation::Read => Some(&self.read),
            Operation::Create => Some(&self.create),
            Operation::Update => Some(&self.update),
            Operation::Delete => None,
        }
    }
}

/// Normalizes list access into a record with every operation present.
///
/// Missing operations are written out as an explicit allow so that a later
/// override can never mistake an absent key for a deny.
#[must_use]
pub fn parse_list_access_control(access: Option<ListAccessControl>) -> ResolvedListAccessControl {
    match access {
        Some(ListAccessControl::Flag(allowed)) => {
            let rule = AccessRule::Flag(allowed);
            ResolvedListAccessControl {
                create: rule.clone(),
                read: rule.clone(),
                update: rule.clone(),
                delete: rule,
            }
        }
        Some(ListAccessControl::Predicate(predicate)) => {
            let rule = AccessRule::Predicate(predicate);
            ResolvedListAccessControl {
                create: rule.clone(),
                read: rule.clone(),
                update: rule.clone(),
                delete: rule,
            }
        }
        Some(ListAccessControl::PerOperation(access)) => ResolvedListAccessControl {
            create: access.create.unwrap_or_else(AccessRule::allow),
            read: access.read.unwrap_or_else(AccessRule::allow),
            update: access.update.unwrap_or_else(AccessRule::allow),
            delete: access.delete.unwrap_or_else(AccessRule::allow),
        },
        None => ResolvedListAccessControl {
            create: AccessRule::allow(),
            read: AccessRule::allow(),
            update: AccessRule::allow(),
            delete: AccessRule::allow(),
        },
    }
}

/// Normalizes field access into a record with every operation present.
#[must_use]
pub fn parse_field_access_control(access: Option<FieldAccessControl>) -> ResolvedFieldAccessControl {
    match access {
        Some(FieldAccessControl::Flag(allowed)) => {
            let rule = AccessRule::Flag(allowed);
            ResolvedFieldAccessControl {
                read: rule.clone(),
                create: rule.clone(),
                update: rule,
            }
        }
        Some(FieldAccessControl::Predicate(predicate)) => {
            let rule = AccessRule::Predicate(predicate);
            ResolvedFieldAccessControl {
                read: rule.clone(),
                create: rule.clone(),
                update: rule,
            }
        }
        Some(FieldAccessControl::PerOperation(access)) => ResolvedFieldAccessControl {
            read: access.read.unwrap_or_else(AccessRule::allow),
            create: access.create.unwrap_or_else(AccessRule::allow),
            update: access.update.unwrap_or_else(AccessRule::allow),
        },
        None => ResolvedFieldAccessControl {
            read: AccessRule::allow(),
            create: AccessRule::allow(),
            update: AccessRule::allow(),
        },
    }
}
