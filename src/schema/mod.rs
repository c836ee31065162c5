pub mod fields;
pub mod initializer;
pub mod input_resolvers;
pub mod list_compiler;
pub mod list_info;
pub mod names;
pub mod registry;
pub mod relationships;
pub mod types;
pub mod validator;

// Public re-exports
pub use initializer::{
    initialise_lists, CompiledSchema, InitialisedField, InitialisedList, ListConfig,
};
pub use input_resolvers::InputResolvers;
pub use list_compiler::{ListCompiler, ListTypes};
pub use list_info::{CompiledListInfo, ListInfoArena, ListRef};
pub use names::{get_gql_names, multi_sort_name, ListNames};
pub use registry::SchemaRegistry;
pub use relationships::{back_reference_name, resolve_relationships, DraftLists, ResolvedLists};
pub use validator::{ListValidator, RESERVED_FIELD_NAMES};
