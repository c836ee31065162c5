//! The compiled type model.
//!
//! Types are plain data. Named references ([`InputType::Named`],
//! [`OutputType::Named`]) are resolved by the hosting server against the
//! compiled schema, which is how the where type refers to itself and how
//! lists refer to each other without owning each other.

use crate::resolve::OutputFieldResolver;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Id,
    String,
    Int,
    Float,
    Boolean,
    Json,
    DateTime,
    Decimal,
    BigInt,
    /// An author-defined scalar. A custom scalar named `ID` is still not
    /// the identifier scalar.
    Custom(String),
}

impl ScalarType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ScalarType::Id => "ID",
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::Json => "JSON",
            ScalarType::DateTime => "DateTime",
            ScalarType::Decimal => "Decimal",
            ScalarType::BigInt => "BigInt",
            ScalarType::Custom(name) => name,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The shared `SortDirection` enum used by every sort type.
    #[must_use]
    pub fn enum_type() -> EnumType {
        EnumType::new("SortDirection", ["asc", "desc"])
    }
}

/// Type of an input argument.
#[derive(Debug, Clone, PartialEq)]
pub enum InputType {
    Scalar(ScalarType),
    Enum(EnumType),
    /// An input object defined inline, such as a nested sort type.
    Object(Arc<InputObjectType>),
    /// A reference to an input object by name.
    Named(String),
    List(Box<InputType>),
    NonNull(Box<InputType>),
}

impl InputType {
    #[must_use]
    pub fn list_of(inner: InputType) -> Self {
        InputType::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(inner: InputType) -> Self {
        InputType::NonNull(Box::new(inner))
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Scalar(scalar) => write!(f, "{scalar}"),
            InputType::Enum(enum_type) => f.write_str(&enum_type.name),
            InputType::Object(object) => f.write_str(&object.name),
            InputType::Named(name) => f.write_str(name),
            InputType::List(inner) => write!(f, "[{inner}]"),
            InputType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub ty: InputType,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl Arg {
    #[must_use]
    pub fn new(ty: InputType) -> Self {
        Self {
            ty,
            default_value: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub fields: BTreeMap<String, Arg>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, Arg>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arg> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Type of an output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputType {
    Scalar(ScalarType),
    Enum(EnumType),
    /// A reference to an object type by name.
    Named(String),
    List(Box<OutputType>),
    NonNull(Box<OutputType>),
}

impl OutputType {
    #[must_use]
    pub fn list_of(inner: OutputType) -> Self {
        OutputType::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(inner: OutputType) -> Self {
        OutputType::NonNull(Box::new(inner))
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::Scalar(scalar) => write!(f, "{scalar}"),
            OutputType::Enum(enum_type) => f.write_str(&enum_type.name),
            OutputType::Named(name) => f.write_str(name),
            OutputType::List(inner) => write!(f, "[{inner}]"),
            OutputType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A compiled output field bound to its resolver.
#[derive(Debug, Clone)]
pub struct OutputField {
    pub ty: OutputType,
    pub args: BTreeMap<String, Arg>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    pub resolver: OutputFieldResolver,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub fields: BTreeMap<String, OutputField>,
}

impl ObjectType {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&OutputField> {
        self.fields.get(name)
    }
}
