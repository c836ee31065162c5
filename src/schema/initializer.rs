//! Schema initialisation.
//!
//! Lists are built in three phases, each of which runs across every list
//! before the next one starts:
//!
//! 1. field construction against the cross-list arena,
//! 2. relationship resolution over every draft storage shape,
//! 3. finalization: access normalization, validation, type compilation and
//!    installation into the arena.
//!
//! Any error aborts the whole build. A schema is only returned complete.

use crate::config::CompileConfig;
use crate::error::SchemaError;
use crate::permissions::{
    parse_field_access_control, parse_list_access_control, ListAccessControl,
    ResolvedFieldAccessControl, ResolvedListAccessControl,
};
use crate::resolve::CacheHint;
use crate::schema::input_resolvers::InputResolvers;
use crate::schema::list_compiler::{ListCompiler, ListTypes};
use crate::schema::list_info::{CompiledListInfo, ListInfoArena};
use crate::schema::names::{get_gql_names, ListNames};
use crate::schema::relationships::{resolve_relationships, DraftLists};
use crate::schema::types::{
    FieldConstructorArgs, FieldDescriptor, FieldInput, FieldOutput, FieldTypeFunc,
    ResolvedDBField,
};
use crate::schema::validator::ListValidator;
use crate::{log_schema_debug, log_schema_info};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// What an author supplies for one list.
#[derive(Default)]
pub struct ListConfig {
    pub fields: BTreeMap<String, FieldTypeFunc>,
    pub access: Option<ListAccessControl>,
    /// Defaults to the list key.
    pub singular_graphql_name: Option<String>,
    /// Defaults to the singular name followed by `s`.
    pub plural_graphql_name: Option<String>,
}

impl ListConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field_path: impl Into<String>, field: FieldTypeFunc) -> Self {
        self.fields.insert(field_path.into(), field);
        self
    }

    #[must_use]
    pub fn access(mut self, access: impl Into<ListAccessControl>) -> Self {
        self.access = Some(access.into());
        self
    }

    #[must_use]
    pub fn graphql_names(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.singular_graphql_name = Some(singular.into());
        self.plural_graphql_name = Some(plural.into());
        self
    }

    fn display_names(&self, list_key: &str) -> (String, String) {
        let singular = self
            .singular_graphql_name
            .clone()
            .unwrap_or_else(|| list_key.to_string());
        let plural = self
            .plural_graphql_name
            .clone()
            .unwrap_or_else(|| format!("{singular}s"));
        (singular, plural)
    }
}

impl fmt::Debug for ListConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("access", &self.access)
            .field("singular_graphql_name", &self.singular_graphql_name)
            .field("plural_graphql_name", &self.plural_graphql_name)
            .finish()
    }
}

/// A field after relationship resolution and access normalization.
#[derive(Debug, Clone)]
pub struct InitialisedField {
    pub db_field: ResolvedDBField,
    pub access: ResolvedFieldAccessControl,
    pub output: FieldOutput,
    pub extra_output_fields: BTreeMap<String, FieldOutput>,
    pub input: FieldInput,
    pub cache_hint: Option<CacheHint>,
}

/// A fully compiled list.
#[derive(Debug, Clone)]
pub struct InitialisedList {
    pub list_key: String,
    pub fields: Arc<BTreeMap<String, InitialisedField>>,
    /// Every resolved storage shape of the list, synthesized back-references
    /// included.
    pub db_fields: BTreeMap<String, ResolvedDBField>,
    pub names: ListNames,
    pub singular_graphql_name: String,
    pub plural_graphql_name: String,
    pub types: Arc<ListTypes>,
    pub access: ResolvedListAccessControl,
    pub input_resolvers: InputResolvers,
}

/// The immutable result of [`initialise_lists`].
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    lists: BTreeMap<String, InitialisedList>,
    arena: ListInfoArena,
}

impl CompiledSchema {
    #[must_use]
    pub fn list(&self, list_key: &str) -> Option<&InitialisedList> {
        self.lists.get(list_key)
    }

    pub fn lists(&self) -> impl Iterator<Item = &InitialisedList> {
        self.lists.values()
    }

    pub fn list_keys(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Resolved storage shapes of one list.
    #[must_use]
    pub fn db_fields(&self, list_key: &str) -> Option<&BTreeMap<String, ResolvedDBField>> {
        self.lists.get(list_key).map(|list| &list.db_fields)
    }

    /// The cross-list arena every compiled list is installed in.
    #[must_use]
    pub fn arena(&self) -> &ListInfoArena {
        &self.arena
    }
}

struct ConstructedList {
    list_key: String,
    names: ListNames,
    singular_graphql_name: String,
    plural_graphql_name: String,
    access: Option<ListAccessControl>,
    fields: BTreeMap<String, FieldDescriptor>,
}

/// Builds every list of a schema.
pub fn initialise_lists(
    lists: BTreeMap<String, ListConfig>,
    config: &CompileConfig,
) -> Result<CompiledSchema, SchemaError> {
    log_schema_info!("Initialising {} lists", lists.len());

    let names: BTreeMap<String, ListNames> = lists
        .iter()
        .map(|(list_key, list)| {
            let (singular, plural) = list.display_names(list_key);
            (list_key.clone(), get_gql_names(list_key, &singular, &plural))
        })
        .collect();
    let arena = ListInfoArena::new(names.clone());

    // Phase 1: construct fields. Constructors may look up any list in the
    // arena; compiled types are filled in during phase 3.
    let mut constructed = Vec::with_capacity(lists.len());
    for (list_key, list) in lists {
        let (singular_graphql_name, plural_graphql_name) = list.display_names(&list_key);
        let fields: BTreeMap<String, FieldDescriptor> = list
            .fields
            .iter()
            .map(|(field_path, construct)| {
                let descriptor = construct(FieldConstructorArgs {
                    field_path,
                    list_key: &list_key,
                    lists: &arena,
                });
                (field_path.clone(), descriptor)
            })
            .collect();
        log_schema_debug!("Constructed {} fields for {}", fields.len(), list_key);

        constructed.push(ConstructedList {
            names: names.get(&list_key).cloned().ok_or_else(|| SchemaError::UnknownList {
                list_key: list_key.clone(),
            })?,
            list_key,
            singular_graphql_name,
            plural_graphql_name,
            access: list.access,
            fields,
        });
    }

    // Phase 2: resolve relationships across every list at once.
    let drafts: DraftLists = constructed
        .iter()
        .map(|list| {
            let db_fields = list
                .fields
                .iter()
                .map(|(path, field)| (path.clone(), field.db_field.clone()))
                .collect();
            (list.list_key.clone(), db_fields)
        })
        .collect();
    let mut resolved = resolve_relationships(&drafts)?;
    log_schema_debug!("Resolved relationships for {} lists", resolved.len());

    // Phase 3: finalize, compile and install.
    let mut compiled = BTreeMap::new();
    for list in constructed {
        ListValidator::new(&list.list_key, &list.fields, config).validate()?;

        let db_fields = resolved.remove(&list.list_key).unwrap_or_default();
        let mut fields = BTreeMap::new();
        for (field_path, descriptor) in list.fields {
            let db_field = db_fields.get(&field_path).cloned().ok_or_else(|| {
                SchemaError::UnresolvedField {
                    list_key: list.list_key.clone(),
                    field_path: field_path.clone(),
                }
            })?;
            fields.insert(
                field_path,
                InitialisedField {
                    db_field,
                    access: parse_field_access_control(descriptor.access),
                    output: descriptor.output,
                    extra_output_fields: descriptor.extra_output_fields,
                    input: descriptor.input,
                    cache_hint: descriptor.cache_hint,
                },
            );
        }
        let fields = Arc::new(fields);

        let types = Arc::new(ListCompiler::new(&list.list_key, &list.names, &fields, &arena).compile());
        let input_resolvers = InputResolvers::new(list.list_key.clone(), fields.clone());
        arena.install(
            &list.list_key,
            CompiledListInfo {
                types: types.clone(),
                input_resolvers: input_resolvers.clone(),
            },
        )?;

        compiled.insert(
            list.list_key.clone(),
            InitialisedList {
                list_key: list.list_key,
                fields,
                db_fields,
                names: list.names,
                singular_graphql_name: list.singular_graphql_name,
                plural_graphql_name: list.plural_graphql_name,
                types,
                access: parse_list_access_control(list.access),
                input_resolvers,
            },
        );
    }

    log_schema_info!("Initialised {} lists", compiled.len());
    Ok(CompiledSchema {
        lists: compiled,
        arena,
    })
}
