//! Built-in field types.
//!
//! Each function returns a [`FieldTypeFunc`] ready to be placed in a
//! [`ListConfig`](crate::schema::initializer::ListConfig). Options shared by
//! the scalar fields live in [`FieldConfig`].

use crate::error::ResolveError;
use crate::permissions::FieldAccessControl;
use crate::resolve::{CacheHint, FindManyArgs, ResolvedValue};
use crate::schema::types::{
    field_type, output_resolver, Arg, DBField, EnumType, FieldConstructorArgs, FieldDescriptor,
    FieldInputArg, FieldOutput, FieldTypeFunc, InputType, MultiDBField, OutputType,
    RelationMode, ScalarDBField, ScalarType, StoreScalar,
};
use serde_json::Value;

/// Options shared by the built-in scalar fields.
#[derive(Debug, Clone, Default)]
pub struct FieldConfig {
    pub access: Option<FieldAccessControl>,
    pub cache_hint: Option<CacheHint>,
    pub is_required: bool,
    pub is_orderable: bool,
    pub is_unique: bool,
    pub is_indexed: bool,
    pub description: Option<String>,
}

impl FieldConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn access(mut self, access: impl Into<FieldAccessControl>) -> Self {
        self.access = Some(access.into());
        self
    }

    #[must_use]
    pub fn cache_hint(mut self, hint: CacheHint) -> Self {
        self.cache_hint = Some(hint);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    #[must_use]
    pub fn orderable(mut self) -> Self {
        self.is_orderable = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.is_indexed = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn column(&self, column: ScalarDBField) -> ScalarDBField {
        let mut column = column;
        if self.is_required {
            column = column.required();
        }
        if self.is_orderable {
            column = column.orderable();
        }
        if self.is_unique {
            column = column.unique();
        } else if self.is_indexed {
            column = column.indexed();
        }
        column
    }

    /// Applies the shared options to a descriptor built by a field type.
    fn apply(&self, mut descriptor: FieldDescriptor) -> FieldDescriptor {
        descriptor.access = self.access.clone();
        descriptor.cache_hint = self.cache_hint;
        if let Some(description) = &self.description {
            descriptor.output.description = Some(description.clone());
        }
        descriptor
    }
}

fn scalar_field(
    config: FieldConfig,
    store_scalar: StoreScalar,
    scalar: ScalarType,
    filter: &'static str,
) -> FieldTypeFunc {
    field_type(move |_args| {
        let input = FieldInputArg::new(Arg::new(InputType::Scalar(scalar.clone())));
        let mut descriptor = FieldDescriptor::new(
            DBField::Scalar(config.column(ScalarDBField::scalar(store_scalar))),
            FieldOutput::new(OutputType::Scalar(scalar.clone())),
        )
        .with_where(FieldInputArg::new(Arg::new(InputType::Named(filter.to_string()))))
        .with_create(input.clone())
        .with_update(input.clone());
        if config.is_unique {
            descriptor = descriptor.with_unique_where(input);
        }
        config.apply(descriptor)
    })
}

/// The identifier field every list needs at path `id`.
#[must_use]
pub fn id() -> FieldTypeFunc {
    field_type(|_args| {
        FieldDescriptor::new(
            DBField::Scalar(
                ScalarDBField::scalar(StoreScalar::String)
                    .required()
                    .orderable()
                    .unique(),
            ),
            FieldOutput::new(OutputType::non_null(OutputType::Scalar(ScalarType::Id))),
        )
        .with_where(FieldInputArg::new(Arg::new(InputType::Named("IDFilter".into()))))
        .with_unique_where(FieldInputArg::new(Arg::new(InputType::Scalar(ScalarType::Id))))
    })
}

#[must_use]
pub fn text(config: FieldConfig) -> FieldTypeFunc {
    scalar_field(config, StoreScalar::String, ScalarType::String, "StringFilter")
}

#[must_use]
pub fn integer(config: FieldConfig) -> FieldTypeFunc {
    scalar_field(config, StoreScalar::Int, ScalarType::Int, "IntFilter")
}

#[must_use]
pub fn checkbox(config: FieldConfig) -> FieldTypeFunc {
    field_type(move |_args| {
        let input = FieldInputArg::new(Arg::new(InputType::Scalar(ScalarType::Boolean)));
        let descriptor = FieldDescriptor::new(
            DBField::Scalar(config.column(ScalarDBField::scalar(StoreScalar::Boolean))),
            FieldOutput::new(OutputType::Scalar(ScalarType::Boolean)),
        )
        .with_where(FieldInputArg::new(Arg::new(InputType::Named("BooleanFilter".into()))))
        .with_create(FieldInputArg::new(
            Arg::new(InputType::Scalar(ScalarType::Boolean)).with_default(Value::Bool(false)),
        ))
        .with_update(input);
        config.apply(descriptor)
    })
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A single choice from a fixed set of options, stored as an enum column.
pub fn select<I, S>(options: I, config: FieldConfig) -> FieldTypeFunc
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options: Vec<String> = options.into_iter().map(Into::into).collect();
    field_type(move |args: FieldConstructorArgs<'_>| {
        let enum_type = EnumType::new(
            format!("{}{}Type", args.list_key, upper_first(args.field_path)),
            options.clone(),
        );
        let input = FieldInputArg::new(Arg::new(InputType::Enum(enum_type.clone())));
        let mut descriptor = FieldDescriptor::new(
            DBField::Scalar(config.column(ScalarDBField::enumeration(
                enum_type.name.clone(),
                options.clone(),
            ))),
            FieldOutput::new(OutputType::Enum(enum_type.clone())),
        )
        .with_where(input.clone())
        .with_create(input.clone())
        .with_update(input.clone());
        if config.is_unique {
            descriptor = descriptor.with_unique_where(input);
        }
        config.apply(descriptor)
    })
}

/// An amount and its currency, stored as two columns.
///
/// Only the amount is orderable; the currency is an enum column.
pub fn money<I, S>(currencies: I, config: FieldConfig) -> FieldTypeFunc
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let currencies: Vec<String> = currencies.into_iter().map(Into::into).collect();
    field_type(move |_args| {
        let mut amount = ScalarDBField::scalar(StoreScalar::Decimal);
        if config.is_orderable {
            amount = amount.orderable();
        }
        if config.is_required {
            amount = amount.required();
        }
        let currency = ScalarDBField::enumeration("Currency", currencies.clone());
        let input = FieldInputArg::new(Arg::new(InputType::Named("MoneyInput".into())));

        let descriptor = FieldDescriptor::new(
            DBField::Multi(
                MultiDBField::new()
                    .column("amount", amount)
                    .column("currency", currency),
            ),
            FieldOutput::new(OutputType::Named("Money".into())),
        )
        .with_create(input.clone())
        .with_update(input);
        config.apply(descriptor)
    })
}

/// Options for [`relationship`].
#[derive(Debug, Clone)]
pub struct RelationshipConfig {
    /// `"List"` or `"List.field"`.
    pub reference: String,
    pub many: bool,
    pub access: Option<FieldAccessControl>,
    pub cache_hint: Option<CacheHint>,
}

impl RelationshipConfig {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            many: false,
            access: None,
            cache_hint: None,
        }
    }

    #[must_use]
    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    #[must_use]
    pub fn access(mut self, access: impl Into<FieldAccessControl>) -> Self {
        self.access = Some(access.into());
        self
    }

    #[must_use]
    pub fn cache_hint(mut self, hint: CacheHint) -> Self {
        self.cache_hint = Some(hint);
        self
    }

    fn target(&self) -> (String, Option<String>) {
        match self.reference.split_once('.') {
            Some((list, field)) => (list.to_string(), Some(field.to_string())),
            None => (self.reference.clone(), None),
        }
    }
}

/// A relation to another list.
///
/// The `many` form resolves to a [`RelationMany`](crate::resolve::RelationMany)
/// capability taking `where`, `first`, `skip` and `sortBy`, and adds a
/// `<path>Count` output field counting the related items.
#[must_use]
pub fn relationship(config: RelationshipConfig) -> FieldTypeFunc {
    field_type(move |args: FieldConstructorArgs<'_>| {
        let (target_list, target_field) = config.target();
        let (output_name, where_name, order_name) = match args.lists.list(&target_list) {
            Some(target) => (
                target.names().output_type_name.clone(),
                target.names().where_input_name.clone(),
                target.names().list_order_name.clone(),
            ),
            None => (
                target_list.clone(),
                format!("{target_list}WhereInput"),
                format!("{target_list}OrderByInput"),
            ),
        };

        let mode = if config.many {
            RelationMode::Many
        } else {
            RelationMode::One
        };
        let db_field = DBField::relation(target_list, target_field, mode);

        let mut descriptor = if config.many {
            let where_arg = Arg::new(InputType::Named(where_name));
            let output = FieldOutput::new(OutputType::list_of(OutputType::non_null(
                OutputType::Named(output_name),
            )))
            .with_arg("where", where_arg.clone())
            .with_arg("first", Arg::new(InputType::Scalar(ScalarType::Int)))
            .with_arg(
                "skip",
                Arg::new(InputType::non_null(InputType::Scalar(ScalarType::Int)))
                    .with_default(Value::from(0)),
            )
            .with_arg(
                "sortBy",
                Arg::new(InputType::list_of(InputType::non_null(InputType::Named(order_name)))),
            );
            let count = FieldOutput::new(OutputType::Scalar(ScalarType::Int))
                .with_arg("where", where_arg)
                .with_resolve(output_resolver(|resolve| async move {
                    let ResolvedValue::Many(related) = resolve.value else {
                        return Err(ResolveError::Resolver(format!(
                            "{} is not a many relation",
                            resolve.info.path
                        )));
                    };
                    let count = related.count(&FindManyArgs::from_args(&resolve.args)?).await?;
                    Ok(ResolvedValue::Value(Value::from(count)))
                }));
            FieldDescriptor::new(db_field, output)
                .with_extra_output_field(format!("{}Count", args.field_path), count)
        } else {
            FieldDescriptor::new(db_field, FieldOutput::new(OutputType::Named(output_name)))
        };

        descriptor.access = config.access.clone();
        descriptor.cache_hint = config.cache_hint;
        descriptor
    })
}

/// A computed field with no storage. `output` normally carries a resolve
/// transform deriving the value from the item.
#[must_use]
pub fn virtual_field(output: FieldOutput, access: Option<FieldAccessControl>) -> FieldTypeFunc {
    field_type(move |_args| {
        let mut descriptor = FieldDescriptor::new(DBField::None, output.clone());
        descriptor.access = access.clone();
        descriptor
    })
}
