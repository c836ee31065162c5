use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column types understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreScalar {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
    Json,
    Decimal,
    BigInt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Index,
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMode {
    #[default]
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnKind {
    Scalar { scalar: StoreScalar },
    Enum { name: String, values: Vec<String> },
}

/// A single physical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarDBField {
    pub column: ColumnKind,
    pub mode: ColumnMode,
    pub is_orderable: bool,
    pub index: Option<IndexKind>,
}

impl ScalarDBField {
    #[must_use]
    pub fn scalar(scalar: StoreScalar) -> Self {
        Self {
            column: ColumnKind::Scalar { scalar },
            mode: ColumnMode::Optional,
            is_orderable: false,
            index: None,
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: ColumnKind::Enum {
                name: name.into(),
                values: values.into_iter().map(Into::into).collect(),
            },
            mode: ColumnMode::Optional,
            is_orderable: false,
            index: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.mode = ColumnMode::Required;
        self
    }

    #[must_use]
    pub fn orderable(mut self) -> Self {
        self.is_orderable = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.index = Some(IndexKind::Unique);
        self
    }

    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.index = Some(IndexKind::Index);
        self
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        matches!(self.column, ColumnKind::Enum { .. })
    }

    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.index == Some(IndexKind::Unique)
    }
}

/// A virtual field stored across several physical columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiDBField {
    pub fields: BTreeMap<String, ScalarDBField>,
}

impl MultiDBField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn column(mut self, key: impl Into<String>, field: ScalarDBField) -> Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Physical column keys for a multi field at `field_path`, paired with the
    /// inner key each one backs.
    pub fn column_paths<'a>(
        &'a self,
        field_path: &'a str,
    ) -> impl Iterator<Item = (&'a str, String)> + 'a {
        self.fields
            .keys()
            .map(move |inner| (inner.as_str(), db_field_path_for_multi(field_path, inner)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationMode {
    One,
    Many,
}

/// A relation as declared by a field, before the foreign side is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDBField {
    pub list: String,
    pub field: Option<String>,
    pub mode: RelationMode,
}

/// Physical storage shape declared by a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DBField {
    Scalar(ScalarDBField),
    Multi(MultiDBField),
    Relation(RelationDBField),
    None,
}

impl DBField {
    pub fn relation(list: impl Into<String>, field: Option<String>, mode: RelationMode) -> Self {
        DBField::Relation(RelationDBField {
            list: list.into(),
            field,
            mode,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRelationDBField {
    pub list: String,
    pub field: String,
    pub mode: RelationMode,
}

/// Physical storage shape after relationships have been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedDBField {
    Scalar(ScalarDBField),
    Multi(MultiDBField),
    Relation(ResolvedRelationDBField),
    None,
}

impl ResolvedDBField {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResolvedDBField::Scalar(_) => "scalar",
            ResolvedDBField::Multi(_) => "multi",
            ResolvedDBField::Relation(_) => "relation",
            ResolvedDBField::None => "none",
        }
    }

    #[must_use]
    pub fn as_relation(&self) -> Option<&ResolvedRelationDBField> {
        match self {
            ResolvedDBField::Relation(relation) => Some(relation),
            _ => None,
        }
    }
}

/// Column key for the inner field `inner_key` of the multi field `field_path`.
#[must_use]
pub fn db_field_path_for_multi(field_path: &str, inner_key: &str) -> String {
    format!("{field_path}_{inner_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_column_paths_are_prefixed_by_field_path() {
        let multi = MultiDBField::new()
            .column("amount", ScalarDBField::scalar(StoreScalar::Decimal))
            .column("currency", ScalarDBField::enumeration("Currency", ["AUD", "USD"]));

        let paths: Vec<_> = multi.column_paths("price").collect();
        assert_eq!(
            paths,
            vec![
                ("amount", "price_amount".to_string()),
                ("currency", "price_currency".to_string()),
            ]
        );
    }

    #[test]
    fn builder_flags() {
        let column = ScalarDBField::scalar(StoreScalar::String)
            .required()
            .orderable()
            .unique();
        assert!(column.is_unique());
        assert!(column.is_orderable);
        assert_eq!(column.mode, ColumnMode::Required);
        assert!(!column.is_enum());
    }
}
