mod common;

use common::blog_schema;
use list_schema::config::CompileConfig;
use list_schema::error::ResolveError;
use list_schema::schema::fields;
use list_schema::schema::types::{
    field_type, input_resolver, Arg, DBField, FieldDescriptor, FieldInputArg, FieldOutput,
    InputType, OutputType, ScalarDBField, ScalarType, StoreScalar,
};
use list_schema::schema::{initialise_lists, CompiledSchema, InputResolvers, ListConfig};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// A list whose `email` field lowercases where and unique-where values.
fn account_schema() -> CompiledSchema {
    let lowercase = || {
        input_resolver(|value: Value| async move {
            match value {
                Value::String(s) => Ok::<_, ResolveError>(json!({ "equals": s.to_lowercase() })),
                other => Ok(other),
            }
        })
    };
    let email = field_type(move |_args| {
        FieldDescriptor::new(
            DBField::Scalar(ScalarDBField::scalar(StoreScalar::String).unique()),
            FieldOutput::new(OutputType::Scalar(ScalarType::String)),
        )
        .with_where(
            FieldInputArg::new(Arg::new(InputType::Scalar(ScalarType::String)))
                .with_resolve(lowercase()),
        )
        .with_unique_where(
            FieldInputArg::new(Arg::new(InputType::Scalar(ScalarType::String)))
                .with_resolve(lowercase()),
        )
    });

    let mut lists = BTreeMap::new();
    lists.insert(
        "Account".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("email", email)
            .field("nickname", fields::text(Default::default())),
    );
    initialise_lists(lists, &CompileConfig::default()).unwrap()
}

fn resolvers(schema: &CompiledSchema, list: &str) -> InputResolvers {
    schema.list(list).unwrap().input_resolvers.clone()
}

#[tokio::test]
async fn test_unique_where_without_transform_is_identity() {
    let schema = blog_schema();
    let resolved = resolvers(&schema, "Post")
        .resolve_unique_where(&json!({ "id": 5 }))
        .await
        .unwrap();
    assert_eq!(resolved, json!({ "id": 5 }));
}

#[tokio::test]
async fn test_unique_where_requires_exactly_one_key() {
    let schema = blog_schema();
    let user = resolvers(&schema, "User");

    assert_eq!(
        user.resolve_unique_where(&json!({})).await,
        Err(ResolveError::InvalidUniqueWhere { count: 0 })
    );
    assert_eq!(
        user.resolve_unique_where(&json!({ "id": 5, "email": "x" })).await,
        Err(ResolveError::InvalidUniqueWhere { count: 2 })
    );

    let message = ResolveError::InvalidUniqueWhere { count: 2 }.to_string();
    assert!(message.contains("2 keys were passed"));
}

#[tokio::test]
async fn test_unique_where_runs_field_transform() {
    let schema = account_schema();
    let resolved = resolvers(&schema, "Account")
        .resolve_unique_where(&json!({ "email": "Ada@Example.com" }))
        .await
        .unwrap();
    assert_eq!(resolved, json!({ "email": { "equals": "ada@example.com" } }));
}

#[tokio::test]
async fn test_unique_where_rejects_field_without_unique_input() {
    let schema = account_schema();
    assert_eq!(
        resolvers(&schema, "Account")
            .resolve_unique_where(&json!({ "nickname": "ada" }))
            .await,
        Err(ResolveError::UnsupportedInput {
            list_key: "Account".into(),
            field_path: "nickname".into(),
            input: "uniqueWhere".into(),
        })
    );
}

#[tokio::test]
async fn test_where_preserves_connective_nesting() {
    let schema = account_schema();
    let filter = json!({
        "AND": [
            { "email": "ADA@EXAMPLE.COM" },
            { "OR": [
                { "nickname": "ada" },
                { "NOT": [{ "email": "Grace@Example.com" }] }
            ]}
        ]
    });

    let resolved = resolvers(&schema, "Account")
        .resolve_where(&filter)
        .await
        .unwrap();

    assert_eq!(
        resolved,
        json!({
            "AND": [
                { "email": { "equals": "ada@example.com" } },
                { "OR": [
                    { "nickname": "ada" },
                    { "NOT": [{ "email": { "equals": "grace@example.com" } }] }
                ]}
            ]
        })
    );
}

#[tokio::test]
async fn test_where_with_no_filter_is_empty() {
    let schema = blog_schema();
    let post = resolvers(&schema, "Post");
    assert_eq!(post.resolve_where(&Value::Null).await.unwrap(), json!({}));
    assert_eq!(
        post.resolve_where(&json!({ "AND": null })).await.unwrap(),
        json!({ "AND": null })
    );
}

#[tokio::test]
async fn test_where_rejects_unknown_field() {
    let schema = blog_schema();
    assert_eq!(
        resolvers(&schema, "Post")
            .resolve_where(&json!({ "OR": [{ "colour": "red" }] }))
            .await,
        Err(ResolveError::UnknownField {
            list_key: "Post".into(),
            field_path: "colour".into(),
        })
    );
}

#[tokio::test]
async fn test_where_rejects_field_without_where_input() {
    let schema = blog_schema();
    assert!(matches!(
        resolvers(&schema, "Post")
            .resolve_where(&json!({ "author": { "id": "u1" } }))
            .await,
        Err(ResolveError::UnsupportedInput { .. })
    ));
}

#[tokio::test]
async fn test_field_named_like_a_connective_replaces_it_when_allowed() {
    let mut lists = BTreeMap::new();
    lists.insert(
        "Gate".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("NOT", fields::text(Default::default())),
    );
    let config = CompileConfig {
        reject_reserved_field_names: false,
    };
    let schema = initialise_lists(lists, &config).unwrap();
    let gate = schema.list("Gate").unwrap();

    assert_eq!(
        gate.types.where_input.field("NOT").unwrap().ty,
        InputType::Named("StringFilter".into())
    );

    let filter = json!({ "NOT": { "equals": "closed" }, "AND": [{ "NOT": { "equals": "open" } }] });
    let resolved = resolvers(&schema, "Gate").resolve_where(&filter).await.unwrap();
    assert_eq!(resolved, filter);
}
