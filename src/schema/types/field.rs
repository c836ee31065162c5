use crate::error::ResolveResult;
use crate::permissions::FieldAccessControl;
use crate::resolve::{CacheHint, FieldInfo, Item, RequestContext, ResolvedValue};
use crate::schema::list_info::ListInfoArena;
use crate::schema::types::db_field::DBField;
use crate::schema::types::graphql::{Arg, OutputType};
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Rewrites an input value into the shape the store expects.
pub type InputResolveFn =
    Arc<dyn Fn(Value) -> BoxFuture<'static, ResolveResult<Value>> + Send + Sync>;

/// Transforms a field's derived value before it is returned.
pub type OutputResolveFn =
    Arc<dyn Fn(OutputResolveArgs) -> BoxFuture<'static, ResolveResult<ResolvedValue>> + Send + Sync>;

/// Wraps an async closure as an [`InputResolveFn`].
pub fn input_resolver<F, Fut>(resolve: F) -> InputResolveFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResolveResult<Value>> + Send + 'static,
{
    Arc::new(move |value| Box::pin(resolve(value)))
}

/// Wraps an async closure as an [`OutputResolveFn`].
pub fn output_resolver<F, Fut>(resolve: F) -> OutputResolveFn
where
    F: Fn(OutputResolveArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResolveResult<ResolvedValue>> + Send + 'static,
{
    Arc::new(move |args| Box::pin(resolve(args)))
}

/// Everything an output transform receives.
#[derive(Debug, Clone)]
pub struct OutputResolveArgs {
    pub id: Value,
    pub value: ResolvedValue,
    pub item: Item,
    pub args: Map<String, Value>,
    pub context: RequestContext,
    pub info: FieldInfo,
}

#[derive(Clone)]
pub struct FieldOutput {
    pub ty: OutputType,
    pub args: BTreeMap<String, Arg>,
    pub resolve: Option<OutputResolveFn>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl FieldOutput {
    #[must_use]
    pub fn new(ty: OutputType) -> Self {
        Self {
            ty,
            args: BTreeMap::new(),
            resolve: None,
            description: None,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, arg: Arg) -> Self {
        self.args.insert(name.into(), arg);
        self
    }

    #[must_use]
    pub fn with_resolve(mut self, resolve: OutputResolveFn) -> Self {
        self.resolve = Some(resolve);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

impl fmt::Debug for FieldOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOutput")
            .field("ty", &self.ty)
            .field("args", &self.args)
            .field("resolve", &self.resolve.as_ref().map(|_| ".."))
            .field("description", &self.description)
            .field("deprecation_reason", &self.deprecation_reason)
            .finish()
    }
}

/// One input slot contributed by a field, with an optional value transform.
#[derive(Clone)]
pub struct FieldInputArg {
    pub arg: Arg,
    pub resolve: Option<InputResolveFn>,
}

impl FieldInputArg {
    #[must_use]
    pub fn new(arg: Arg) -> Self {
        Self { arg, resolve: None }
    }

    #[must_use]
    pub fn with_resolve(mut self, resolve: InputResolveFn) -> Self {
        self.resolve = Some(resolve);
        self
    }

    /// Runs the transform, or hands the value back unchanged when there is none.
    pub async fn resolve_value(&self, value: Value) -> ResolveResult<Value> {
        match &self.resolve {
            Some(resolve) => resolve(value).await,
            None => Ok(value),
        }
    }
}

impl fmt::Debug for FieldInputArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInputArg")
            .field("arg", &self.arg)
            .field("resolve", &self.resolve.as_ref().map(|_| ".."))
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldInput {
    pub where_input: Option<FieldInputArg>,
    pub unique_where: Option<FieldInputArg>,
    pub create: Option<FieldInputArg>,
    pub update: Option<FieldInputArg>,
}

/// A self-contained description of one field on a list.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub db_field: DBField,
    pub access: Option<FieldAccessControl>,
    pub output: FieldOutput,
    pub extra_output_fields: BTreeMap<String, FieldOutput>,
    pub input: FieldInput,
    pub cache_hint: Option<CacheHint>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(db_field: DBField, output: FieldOutput) -> Self {
        Self {
            db_field,
            access: None,
            output,
            extra_output_fields: BTreeMap::new(),
            input: FieldInput::default(),
            cache_hint: None,
        }
    }

    #[must_use]
    pub fn with_access(mut self, access: impl Into<FieldAccessControl>) -> Self {
        self.access = Some(access.into());
        self
    }

    #[must_use]
    pub fn with_where(mut self, input: FieldInputArg) -> Self {
        self.input.where_input = Some(input);
        self
    }

    #[must_use]
    pub fn with_unique_where(mut self, input: FieldInputArg) -> Self {
        self.input.unique_where = Some(input);
        self
    }

    #[must_use]
    pub fn with_create(mut self, input: FieldInputArg) -> Self {
        self.input.create = Some(input);
        self
    }

    #[must_use]
    pub fn with_update(mut self, input: FieldInputArg) -> Self {
        self.input.update = Some(input);
        self
    }

    #[must_use]
    pub fn with_extra_output_field(mut self, name: impl Into<String>, output: FieldOutput) -> Self {
        self.extra_output_fields.insert(name.into(), output);
        self
    }

    #[must_use]
    pub fn with_cache_hint(mut self, hint: CacheHint) -> Self {
        self.cache_hint = Some(hint);
        self
    }
}

/// What a field constructor is told about its surroundings.
///
/// `lists` is the cross-list arena. Other lists' names can be read right
/// away; their compiled types only become available after finalization.
#[derive(Debug, Clone, Copy)]
pub struct FieldConstructorArgs<'a> {
    pub field_path: &'a str,
    pub list_key: &'a str,
    pub lists: &'a ListInfoArena,
}

pub type FieldTypeFunc = Box<dyn Fn(FieldConstructorArgs<'_>) -> FieldDescriptor + Send + Sync>;

/// Boxes a closure as a [`FieldTypeFunc`].
pub fn field_type<F>(construct: F) -> FieldTypeFunc
where
    F: Fn(FieldConstructorArgs<'_>) -> FieldDescriptor + Send + Sync + 'static,
{
    Box::new(construct)
}
