use crate::config::CompileConfig;
use crate::error::SchemaError;
use crate::schema::types::{
    db_field_path_for_multi, DBField, FieldDescriptor, InputType, ScalarType,
};
use std::collections::BTreeMap;

/// Field paths that would shadow the where connectives.
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["AND", "OR", "NOT"];

/// Validates one list's constructed fields before its types are compiled.
///
/// Checks that extra output fields do not collide with field paths or with
/// each other, that multi field columns do not collide with anything else
/// on the list, and that the `id` field has the shape every list relies on.
pub struct ListValidator<'a> {
    list_key: &'a str,
    fields: &'a BTreeMap<String, FieldDescriptor>,
    config: &'a CompileConfig,
}

impl<'a> ListValidator<'a> {
    pub fn new(
        list_key: &'a str,
        fields: &'a BTreeMap<String, FieldDescriptor>,
        config: &'a CompileConfig,
    ) -> Self {
        Self {
            list_key,
            fields,
            config,
        }
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.config.reject_reserved_field_names {
            self.validate_reserved_names()?;
        }
        self.validate_extra_output_fields()?;
        self.validate_multi_columns()?;
        self.validate_id_field()
    }

    fn validate_reserved_names(&self) -> Result<(), SchemaError> {
        match self
            .fields
            .keys()
            .find(|path| RESERVED_FIELD_NAMES.contains(&path.as_str()))
        {
            Some(path) => Err(SchemaError::ReservedFieldName {
                list_key: self.list_key.to_string(),
                field_path: path.clone(),
            }),
            None => Ok(()),
        }
    }

    fn validate_extra_output_fields(&self) -> Result<(), SchemaError> {
        // extra output field name -> field path that declared it
        let mut claimed: BTreeMap<&str, &str> = BTreeMap::new();

        for (field_path, field) in self.fields {
            for name in field.extra_output_fields.keys() {
                if self.fields.contains_key(name) {
                    return Err(SchemaError::ExtraOutputFieldConflictsWithField {
                        list_key: self.list_key.to_string(),
                        field_path: field_path.clone(),
                        name: name.clone(),
                    });
                }
                if let Some(other_field_path) = claimed.insert(name, field_path) {
                    return Err(SchemaError::ExtraOutputFieldsConflict {
                        list_key: self.list_key.to_string(),
                        field_path: field_path.clone(),
                        other_field_path: other_field_path.to_string(),
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_multi_columns(&self) -> Result<(), SchemaError> {
        let mut columns: BTreeMap<String, &str> = BTreeMap::new();

        for (field_path, field) in self.fields {
            let DBField::Multi(multi) = &field.db_field else {
                continue;
            };
            for inner in multi.fields.keys() {
                let column = db_field_path_for_multi(field_path, inner);
                let owner = if self.fields.contains_key(&column) {
                    Some(column.as_str())
                } else {
                    columns.get(&column).copied()
                };
                if let Some(other_field_path) = owner {
                    return Err(SchemaError::MultiColumnConflict {
                        list_key: self.list_key.to_string(),
                        field_path: field_path.clone(),
                        column: column.clone(),
                        other_field_path: other_field_path.to_string(),
                    });
                }
                columns.insert(column, field_path);
            }
        }
        Ok(())
    }

    fn validate_id_field(&self) -> Result<(), SchemaError> {
        let list_key = self.list_key.to_string();
        let id = self
            .fields
            .get("id")
            .ok_or_else(|| SchemaError::MissingIdField {
                list_key: list_key.clone(),
            })?;

        let unique_where = id
            .input
            .unique_where
            .as_ref()
            .ok_or_else(|| SchemaError::IdFieldMissingUniqueWhere {
                list_key: list_key.clone(),
            })?;
        if unique_where.arg.ty != InputType::Scalar(ScalarType::Id) {
            return Err(SchemaError::IdFieldUniqueWhereNotId {
                list_key,
                found: unique_where.arg.ty.to_string(),
            });
        }
        if id.input.create.is_some() {
            return Err(SchemaError::IdFieldDefinesCreateInput { list_key });
        }
        if id.input.update.is_some() {
            return Err(SchemaError::IdFieldDefinesUpdateInput { list_key });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{
        Arg, FieldInputArg, FieldOutput, MultiDBField, OutputType, ScalarDBField, StoreScalar,
    };

    fn id_field() -> FieldDescriptor {
        FieldDescriptor::new(
            DBField::Scalar(ScalarDBField::scalar(StoreScalar::String)),
            FieldOutput::new(OutputType::Scalar(ScalarType::Id)),
        )
        .with_unique_where(FieldInputArg::new(Arg::new(InputType::Scalar(ScalarType::Id))))
    }

    fn text_field() -> FieldDescriptor {
        FieldDescriptor::new(
            DBField::Scalar(ScalarDBField::scalar(StoreScalar::String)),
            FieldOutput::new(OutputType::Scalar(ScalarType::String)),
        )
    }

    fn validate(fields: Vec<(&str, FieldDescriptor)>) -> Result<(), SchemaError> {
        let fields: BTreeMap<String, FieldDescriptor> = fields
            .into_iter()
            .map(|(path, field)| (path.to_string(), field))
            .collect();
        ListValidator::new("Post", &fields, &CompileConfig::default()).validate()
    }

    #[test]
    fn accepts_a_minimal_list() {
        assert_eq!(validate(vec![("id", id_field()), ("title", text_field())]), Ok(()));
    }

    #[test]
    fn rejects_look_alike_id_scalar() {
        let id = FieldDescriptor::new(
            DBField::Scalar(ScalarDBField::scalar(StoreScalar::String)),
            FieldOutput::new(OutputType::Scalar(ScalarType::Id)),
        )
        .with_unique_where(FieldInputArg::new(Arg::new(InputType::Scalar(
            ScalarType::Custom("ID".into()),
        ))));
        assert!(matches!(
            validate(vec![("id", id)]),
            Err(SchemaError::IdFieldUniqueWhereNotId { .. })
        ));
    }

    #[test]
    fn rejects_multi_column_shadowing_a_field() {
        let price = FieldDescriptor::new(
            DBField::Multi(
                MultiDBField::new().column("amount", ScalarDBField::scalar(StoreScalar::Decimal)),
            ),
            FieldOutput::new(OutputType::Named("Money".into())),
        );
        assert_eq!(
            validate(vec![("id", id_field()), ("price", price), ("price_amount", text_field())]),
            Err(SchemaError::MultiColumnConflict {
                list_key: "Post".into(),
                field_path: "price".into(),
                column: "price_amount".into(),
                other_field_path: "price_amount".into(),
            })
        );
    }

    #[test]
    fn reserved_names_can_be_allowed() {
        let fields: BTreeMap<String, FieldDescriptor> =
            [("id".to_string(), id_field()), ("AND".to_string(), text_field())]
                .into_iter()
                .collect();
        let lenient = CompileConfig {
            reject_reserved_field_names: false,
        };
        assert!(ListValidator::new("Post", &fields, &lenient).validate().is_ok());
        assert!(matches!(
            ListValidator::new("Post", &fields, &CompileConfig::default()).validate(),
            Err(SchemaError::ReservedFieldName { .. })
        ));
    }
}
