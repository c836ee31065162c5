//! Assembles the compiled types of one list.

use crate::log_schema_debug;
use crate::resolve::OutputFieldResolver;
use crate::schema::initializer::InitialisedField;
use crate::schema::list_info::ListInfoArena;
use crate::schema::names::{multi_sort_name, ListNames};
use crate::schema::types::{
    Arg, FieldInputArg, FieldOutput, InputObjectType, InputType, ObjectType, OutputField,
    ResolvedDBField, SortDirection,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The output type and the five input types of one list.
#[derive(Debug, Clone)]
pub struct ListTypes {
    pub output: ObjectType,
    pub unique_where: InputObjectType,
    pub where_input: InputObjectType,
    pub create: InputObjectType,
    pub update: InputObjectType,
    pub sort_by: InputObjectType,
}

pub struct ListCompiler<'a> {
    list_key: &'a str,
    names: &'a ListNames,
    fields: &'a BTreeMap<String, InitialisedField>,
    lists: &'a ListInfoArena,
}

impl<'a> ListCompiler<'a> {
    pub fn new(
        list_key: &'a str,
        names: &'a ListNames,
        fields: &'a BTreeMap<String, InitialisedField>,
        lists: &'a ListInfoArena,
    ) -> Self {
        Self {
            list_key,
            names,
            fields,
            lists,
        }
    }

    /// Builds every type of the list. Fields must already have passed
    /// [`ListValidator`](crate::schema::validator::ListValidator).
    #[must_use]
    pub fn compile(&self) -> ListTypes {
        let types = ListTypes {
            output: self.output_type(),
            unique_where: self.input_object(&self.names.where_unique_input_name, |field| {
                field.input.unique_where.as_ref()
            }),
            where_input: self.where_type(),
            create: self.input_object(&self.names.create_input_name, |field| {
                field.input.create.as_ref()
            }),
            update: self.input_object(&self.names.update_input_name, |field| {
                field.input.update.as_ref()
            }),
            sort_by: self.sort_type(),
        };
        log_schema_debug!(
            "Compiled {}: {} output fields, {} where slots, {} sort slots",
            self.list_key,
            types.output.fields.len(),
            types.where_input.fields.len(),
            types.sort_by.fields.len()
        );
        types
    }

    fn output_type(&self) -> ObjectType {
        let mut fields = BTreeMap::new();
        for (field_path, field) in self.fields {
            fields.insert(field_path.clone(), self.output_field(field_path, field, &field.output));
            for (name, output) in &field.extra_output_fields {
                fields.insert(name.clone(), self.output_field(field_path, field, output));
            }
        }
        ObjectType {
            name: self.names.output_type_name.clone(),
            fields,
        }
    }

    fn output_field(
        &self,
        field_path: &str,
        field: &InitialisedField,
        output: &FieldOutput,
    ) -> OutputField {
        let related_list = field
            .db_field
            .as_relation()
            .and_then(|relation| self.lists.list(&relation.list));
        OutputField {
            ty: output.ty.clone(),
            args: output.args.clone(),
            description: output.description.clone(),
            deprecation_reason: output.deprecation_reason.clone(),
            resolver: OutputFieldResolver::new(
                self.list_key.to_string(),
                field_path.to_string(),
                field.db_field.clone(),
                field.cache_hint,
                field.access.read.clone(),
                output.resolve.clone(),
                related_list,
            ),
        }
    }

    fn where_type(&self) -> InputObjectType {
        let name = &self.names.where_input_name;
        let nested = Arg::new(InputType::list_of(InputType::non_null(InputType::Named(
            name.clone(),
        ))));
        let mut slots: BTreeMap<String, Arg> = ["AND", "OR", "NOT"]
            .into_iter()
            .map(|connective| (connective.to_string(), nested.clone()))
            .collect();
        for (field_path, field) in self.fields {
            if let Some(input) = &field.input.where_input {
                slots.insert(field_path.clone(), input.arg.clone());
            }
        }
        InputObjectType::new(name.clone(), slots)
    }

    fn input_object(
        &self,
        name: &str,
        select: impl Fn(&InitialisedField) -> Option<&FieldInputArg>,
    ) -> InputObjectType {
        let slots = self
            .fields
            .iter()
            .filter_map(|(field_path, field)| {
                select(field).map(|input| (field_path.clone(), input.arg.clone()))
            })
            .collect();
        InputObjectType::new(name, slots)
    }

    fn sort_type(&self) -> InputObjectType {
        let direction = Arg::new(InputType::Enum(SortDirection::enum_type()));
        let mut slots = BTreeMap::new();

        for (field_path, field) in self.fields {
            match &field.db_field {
                ResolvedDBField::Scalar(scalar) if scalar.is_orderable => {
                    slots.insert(field_path.clone(), direction.clone());
                }
                ResolvedDBField::Multi(multi) => {
                    let nested: BTreeMap<String, Arg> = multi
                        .fields
                        .iter()
                        .filter(|(_, column)| column.is_orderable && !column.is_enum())
                        .map(|(inner, _)| (inner.clone(), direction.clone()))
                        .collect();
                    if !nested.is_empty() {
                        let nested =
                            InputObjectType::new(multi_sort_name(self.list_key, field_path), nested);
                        slots.insert(
                            field_path.clone(),
                            Arg::new(InputType::Object(Arc::new(nested))),
                        );
                    }
                }
                _ => {}
            }
        }
        InputObjectType::new(self.names.list_order_name.clone(), slots)
    }
}
