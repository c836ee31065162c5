//! The cross-list info arena.
//!
//! Every list gets a slot keyed by its list key before any field is built.
//! Names are known from the start; compiled types and input resolvers are
//! installed into each slot exactly once during finalization. Field
//! constructors hold [`ListRef`]s, which only look things up when asked, so
//! a field may refer to a list that has not been compiled yet.

use crate::error::SchemaError;
use crate::schema::input_resolvers::InputResolvers;
use crate::schema::list_compiler::ListTypes;
use crate::schema::names::ListNames;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

#[derive(Debug, Clone)]
pub struct CompiledListInfo {
    pub types: Arc<ListTypes>,
    pub input_resolvers: InputResolvers,
}

#[derive(Debug)]
struct ListSlot {
    names: ListNames,
    compiled: OnceCell<CompiledListInfo>,
}

#[derive(Debug, Clone)]
pub struct ListInfoArena {
    slots: Arc<BTreeMap<String, ListSlot>>,
}

impl ListInfoArena {
    pub(crate) fn new(names: BTreeMap<String, ListNames>) -> Self {
        let slots = names
            .into_iter()
            .map(|(list_key, names)| {
                (
                    list_key,
                    ListSlot {
                        names,
                        compiled: OnceCell::new(),
                    },
                )
            })
            .collect();
        Self {
            slots: Arc::new(slots),
        }
    }

    /// A lazy reference to the list `list_key`, if such a list exists.
    #[must_use]
    pub fn list(&self, list_key: &str) -> Option<ListRef> {
        let slot = self.slots.get(list_key)?;
        Some(ListRef {
            list_key: list_key.to_string(),
            names: slot.names.clone(),
            slots: Arc::downgrade(&self.slots),
        })
    }

    #[must_use]
    pub fn contains(&self, list_key: &str) -> bool {
        self.slots.contains_key(list_key)
    }

    pub fn list_keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// True once every list has been compiled.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.slots.values().all(|slot| slot.compiled.get().is_some())
    }

    #[must_use]
    pub fn compiled(&self, list_key: &str) -> Option<&CompiledListInfo> {
        self.slots.get(list_key)?.compiled.get()
    }

    pub(crate) fn install(
        &self,
        list_key: &str,
        compiled: CompiledListInfo,
    ) -> Result<(), SchemaError> {
        let slot = self
            .slots
            .get(list_key)
            .ok_or_else(|| SchemaError::UnknownList {
                list_key: list_key.to_string(),
            })?;
        slot.compiled
            .set(compiled)
            .map_err(|_| SchemaError::AlreadyInstalled {
                list_key: list_key.to_string(),
            })
    }
}

/// A forward reference to a list in the arena.
///
/// Holds the arena weakly, so references captured by field resolvers do not
/// keep a replaced schema alive.
#[derive(Debug, Clone)]
pub struct ListRef {
    list_key: String,
    names: ListNames,
    slots: Weak<BTreeMap<String, ListSlot>>,
}

impl ListRef {
    #[must_use]
    pub fn list_key(&self) -> &str {
        &self.list_key
    }

    /// Names are available as soon as the arena exists.
    #[must_use]
    pub fn names(&self) -> &ListNames {
        &self.names
    }

    /// Compiled types, once the list has been finalized.
    #[must_use]
    pub fn types(&self) -> Option<Arc<ListTypes>> {
        self.compiled().map(|compiled| compiled.types)
    }

    #[must_use]
    pub fn input_resolvers(&self) -> Option<InputResolvers> {
        self.compiled().map(|compiled| compiled.input_resolvers)
    }

    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled().is_some()
    }

    fn compiled(&self) -> Option<CompiledListInfo> {
        let slots = self.slots.upgrade()?;
        slots.get(&self.list_key)?.compiled.get().cloned()
    }
}
