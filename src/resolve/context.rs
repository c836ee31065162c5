use crate::store::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheScope {
    Public,
    Private,
}

/// A static caching directive declared by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheHint {
    pub max_age: Option<u32>,
    pub scope: Option<CacheScope>,
}

impl CacheHint {
    #[must_use]
    pub fn max_age(seconds: u32) -> Self {
        Self {
            max_age: Some(seconds),
            scope: None,
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.scope = Some(CacheScope::Private);
        self
    }
}

/// Cache hints collected while executing one query.
#[derive(Debug, Default)]
pub struct CacheControl {
    hints: Mutex<Vec<(String, CacheHint)>>,
}

impl CacheControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cache_hint(&self, path: &str, hint: CacheHint) {
        let mut hints = self.hints.lock().unwrap_or_else(|e| e.into_inner());
        hints.push((path.to_string(), hint));
    }

    #[must_use]
    pub fn hints(&self) -> Vec<(String, CacheHint)> {
        self.hints.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Policy for the whole response: the smallest max age of any hint, and
    /// private as soon as one hint is private.
    #[must_use]
    pub fn overall_policy(&self) -> CacheHint {
        let hints = self.hints.lock().unwrap_or_else(|e| e.into_inner());
        let max_age = hints.iter().filter_map(|(_, hint)| hint.max_age).min();
        let scope = if hints
            .iter()
            .any(|(_, hint)| hint.scope == Some(CacheScope::Private))
        {
            Some(CacheScope::Private)
        } else if hints.is_empty() {
            None
        } else {
            Some(CacheScope::Public)
        };
        CacheHint { max_age, scope }
    }
}

/// Per-request state shared by every field resolved for that request.
#[derive(Clone)]
pub struct RequestContext {
    pub session: Option<Value>,
    pub store: Arc<dyn Store>,
}

impl RequestContext {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            session: None,
            store,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: Value) -> Self {
        self.session = Some(session);
        self
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Where in the response a field is being resolved.
#[derive(Debug, Clone, Default)]
pub struct FieldInfo {
    pub path: String,
    pub cache_control: Option<Arc<CacheControl>>,
}

impl FieldInfo {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cache_control: None,
        }
    }

    #[must_use]
    pub fn with_cache_control(mut self, cache_control: Arc<CacheControl>) -> Self {
        self.cache_control = Some(cache_control);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_policy_takes_smallest_age_and_private_scope() {
        let control = CacheControl::new();
        control.set_cache_hint("posts.0.title", CacheHint::max_age(60));
        control.set_cache_hint("posts.0.body", CacheHint::max_age(30).private());

        let policy = control.overall_policy();
        assert_eq!(policy.max_age, Some(30));
        assert_eq!(policy.scope, Some(CacheScope::Private));
        assert_eq!(control.hints().len(), 2);
    }

    #[test]
    fn empty_control_has_no_policy() {
        assert_eq!(CacheControl::new().overall_policy(), CacheHint::default());
    }
}
