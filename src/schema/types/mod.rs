pub mod db_field;
pub mod field;
pub mod graphql;
pub mod operation;

pub use db_field::{
    db_field_path_for_multi, ColumnKind, ColumnMode, DBField, IndexKind, MultiDBField,
    RelationDBField, RelationMode, ResolvedDBField, ResolvedRelationDBField, ScalarDBField,
    StoreScalar,
};
pub use field::{
    field_type, input_resolver, output_resolver, FieldConstructorArgs, FieldDescriptor,
    FieldInput, FieldInputArg, FieldOutput, FieldTypeFunc, InputResolveFn, OutputResolveArgs,
    OutputResolveFn,
};
pub use graphql::{
    Arg, EnumType, InputObjectType, InputType, ObjectType, OutputField, OutputType, ScalarType,
    SortDirection,
};
pub use operation::Operation;
