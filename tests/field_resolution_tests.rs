mod common;

use common::{blog_schema, item, seeded_store};
use list_schema::config::CompileConfig;
use list_schema::error::ResolveError;
use list_schema::permissions::FieldAccessControl;
use list_schema::resolve::{
    CacheControl, CacheHint, CacheScope, FieldInfo, FindManyArgs, RequestContext, RequestedField,
    ResolvedValue,
};
use list_schema::schema::fields::{self, FieldConfig, RelationshipConfig};
use list_schema::schema::types::{output_resolver, FieldOutput, Operation, OutputType, ScalarType};
use list_schema::schema::{initialise_lists, CompiledSchema, ListConfig};
use list_schema::store::memory::{MemoryStore, StoreCall};
use list_schema::store::FindManyQuery;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

fn context(store: &Arc<MemoryStore>) -> RequestContext {
    RequestContext::new(store.clone())
}

fn no_args() -> Map<String, Value> {
    Map::new()
}

#[tokio::test]
async fn test_denied_field_does_not_affect_sibling() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let post = &schema.list("Post").unwrap().types.output;
    let row = item(json!({ "id": "abc", "title": "Hello", "secret": "hidden" }));

    let results = post
        .resolve_fields(
            &row,
            vec![
                RequestedField::new("secret", no_args()),
                RequestedField::new("title", no_args()),
            ],
            &context(&store),
            &FieldInfo::new("post"),
        )
        .await;

    assert_eq!(
        results["secret"].as_ref().unwrap_err(),
        &ResolveError::AccessDenied {
            operation: Operation::Read,
            field_path: "secret".into(),
            item_id: json!("abc"),
        }
    );
    assert!(results["secret"].as_ref().unwrap_err().is_access_denied());
    assert_eq!(
        results["title"].as_ref().unwrap().as_value(),
        Some(&json!("Hello"))
    );
}

#[tokio::test]
async fn test_scalar_field_reads_its_column() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let post = &schema.list("Post").unwrap().types.output;

    let votes = post
        .resolve_field(
            "votes",
            &item(json!({ "id": "p1", "votes": 3 })),
            no_args(),
            &context(&store),
            &FieldInfo::new("post.votes"),
        )
        .await
        .unwrap();
    assert_eq!(votes.into_value(), Some(json!(3)));

    let missing = post
        .resolve_field(
            "title",
            &item(json!({ "id": "p1" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("post.title"),
        )
        .await
        .unwrap();
    assert_eq!(missing.into_value(), Some(Value::Null));
}

#[tokio::test]
async fn test_many_relation_is_lazy_and_paginates() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let user = &schema.list("User").unwrap().types.output;

    let posts = user
        .resolve_field(
            "posts",
            &item(json!({ "id": "u1", "name": "Ada" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("user.posts"),
        )
        .await
        .unwrap();
    assert!(store.calls().await.is_empty(), "resolution must not query the store");

    let many = posts.as_many().expect("posts should resolve to a many capability");
    let found = many
        .find_many(
            &FindManyArgs::default()
                .first(2)
                .skip(1)
                .sort_by(json!({ "votes": "desc" })),
        )
        .await
        .unwrap();

    assert_eq!(
        store.calls().await,
        vec![StoreCall::FindMany(FindManyQuery {
            list_key: "Post".into(),
            where_clause: json!({ "AND": [{ "author": { "id": "u1" } }] }),
            order_by: vec![json!({ "votes": "desc" })],
            take: Some(2),
            skip: 1,
        })]
    );
    let ids: Vec<Value> = found.iter().map(|post| post.id()).collect();
    assert_eq!(ids, vec![json!("p3"), json!("p1")]);
}

#[tokio::test]
async fn test_many_relation_applies_foreign_where() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let user = &schema.list("User").unwrap().types.output;

    let posts = user
        .resolve_field(
            "posts",
            &item(json!({ "id": "u1" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("user.posts"),
        )
        .await
        .unwrap();
    let args = json!({ "where": { "votes": { "gt": 4 } }, "sortBy": [{ "votes": "asc" }] });
    let found = posts
        .as_many()
        .unwrap()
        .find_many(&FindManyArgs::from_args(args.as_object().unwrap()).unwrap())
        .await
        .unwrap();

    let ids: Vec<Value> = found.iter().map(|post| post.id()).collect();
    assert_eq!(ids, vec![json!("p3"), json!("p2")]);

    let calls = store.calls().await;
    let [StoreCall::FindMany(query)] = calls.as_slice() else {
        panic!("expected one findMany call, got {calls:?}");
    };
    assert_eq!(
        query.where_clause,
        json!({ "AND": [{ "author": { "id": "u1" } }, { "votes": { "gt": 4 } }] })
    );
}

#[tokio::test]
async fn test_count_extra_field_counts_related_items() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let user = &schema.list("User").unwrap().types.output;

    let count = user
        .resolve_field(
            "postsCount",
            &item(json!({ "id": "u1" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("user.postsCount"),
        )
        .await
        .unwrap();

    assert_eq!(count.into_value(), Some(json!(4)));
    assert!(matches!(store.calls().await.as_slice(), [StoreCall::Count(_)]));
}

#[tokio::test]
async fn test_one_relation_loads_the_related_item() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let post = &schema.list("Post").unwrap().types.output;

    let author = post
        .resolve_field(
            "author",
            &item(json!({ "id": "p1" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("post.author"),
        )
        .await
        .unwrap();
    assert!(store.calls().await.is_empty());

    let loaded = author
        .as_one()
        .expect("author should resolve to a one capability")
        .load(&["name".to_string()])
        .await
        .unwrap()
        .expect("p1 has an author");
    assert_eq!(loaded.get("name"), Some(&json!("Ada")));
    assert_eq!(
        store.calls().await,
        vec![
            StoreCall::FindUnique {
                list_key: "Post".into(),
                where_unique: json!({ "id": "p1" }),
                select: vec!["author".into()],
            },
            StoreCall::FindUnique {
                list_key: "User".into(),
                where_unique: json!({ "id": "u1" }),
                select: vec!["name".into()],
            },
        ]
    );
}

#[tokio::test]
async fn test_one_relation_uses_foreign_key_on_item() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let post = &schema.list("Post").unwrap().types.output;

    let author = post
        .resolve_field(
            "author",
            &item(json!({ "id": "p2", "author": "u1" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("post.author"),
        )
        .await
        .unwrap();
    let loaded = author.as_one().unwrap().load(&[]).await.unwrap().unwrap();

    assert_eq!(loaded.id(), json!("u1"));
    assert_eq!(loaded.get("email"), Some(&json!("ada@example.com")));
    assert_eq!(
        store.calls().await,
        vec![StoreCall::FindUnique {
            list_key: "User".into(),
            where_unique: json!({ "id": "u1" }),
            select: vec![],
        }]
    );
}

#[tokio::test]
async fn test_unset_one_relation_loads_nothing() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let post = &schema.list("Post").unwrap().types.output;

    let author = post
        .resolve_field(
            "author",
            &item(json!({ "id": "p9", "author": null })),
            no_args(),
            &context(&store),
            &FieldInfo::new("post.author"),
        )
        .await
        .unwrap();

    assert_eq!(author.as_one().unwrap().load(&[]).await.unwrap(), None);
    assert!(store.calls().await.is_empty());
}

fn passport_schema() -> CompiledSchema {
    let mut lists = BTreeMap::new();
    lists.insert(
        "Person".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field(
                "passport",
                fields::relationship(RelationshipConfig::new("Passport.holder")),
            ),
    );
    lists.insert(
        "Passport".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("number", fields::text(FieldConfig::new()))
            .field(
                "holder",
                fields::relationship(RelationshipConfig::new("Person.passport")),
            ),
    );
    initialise_lists(lists, &CompileConfig::default()).unwrap()
}

#[tokio::test]
async fn test_one_to_one_finds_item_holding_the_key() {
    let schema = passport_schema();
    let store = Arc::new(MemoryStore::new());
    store.insert("Person", item(json!({ "id": "pe1" }))).await;
    store
        .insert(
            "Passport",
            item(json!({ "id": "pa1", "number": "X123", "holder": "pe1" })),
        )
        .await;
    let person = &schema.list("Person").unwrap().types.output;

    let passport = person
        .resolve_field(
            "passport",
            &item(json!({ "id": "pe1" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("person.passport"),
        )
        .await
        .unwrap();
    let loaded = passport.as_one().unwrap().load(&[]).await.unwrap().unwrap();
    assert_eq!(loaded.get("number"), Some(&json!("X123")));

    let calls = store.calls().await;
    let [StoreCall::FindUnique { list_key, .. }, StoreCall::FindMany(query)] = calls.as_slice() else {
        panic!("expected a projection then one findMany, got {calls:?}");
    };
    assert_eq!(list_key, "Person");
    assert_eq!(query.list_key, "Passport");
    assert_eq!(
        query.where_clause,
        json!({ "AND": [{ "holder": { "id": "pe1" } }] })
    );
    assert_eq!(query.take, Some(1));
}

#[tokio::test]
async fn test_same_field_under_two_aliases_resolves_twice() {
    let schema = blog_schema();
    let store = seeded_store().await;
    let user = &schema.list("User").unwrap().types.output;
    let popular = json!({ "where": { "votes": { "gt": 4 } } });

    let results = user
        .resolve_fields(
            &item(json!({ "id": "u1" })),
            vec![
                RequestedField::new("postsCount", popular.as_object().unwrap().clone())
                    .alias("popular"),
                RequestedField::new("postsCount", no_args()).alias("all"),
            ],
            &context(&store),
            &FieldInfo::new("user"),
        )
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results["popular"].as_ref().unwrap().as_value(), Some(&json!(2)));
    assert_eq!(results["all"].as_ref().unwrap().as_value(), Some(&json!(4)));
    assert_eq!(store.calls().await.len(), 2);
}

#[tokio::test]
async fn test_multi_field_collects_its_columns() {
    let schema = blog_schema();
    let store = Arc::new(MemoryStore::new());
    let product = &schema.list("Product").unwrap().types.output;

    let price = product
        .resolve_field(
            "price",
            &item(json!({ "id": "x1", "price_amount": 10.5, "price_currency": "AUD" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("product.price"),
        )
        .await
        .unwrap();

    assert_eq!(
        price.into_value(),
        Some(json!({ "amount": 10.5, "currency": "AUD" }))
    );
}

fn cached_schema() -> CompiledSchema {
    let mut lists = BTreeMap::new();
    lists.insert(
        "Article".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field(
                "title",
                fields::text(FieldConfig::new().cache_hint(CacheHint::max_age(60))),
            )
            .field(
                "draft",
                fields::text(
                    FieldConfig::new()
                        .cache_hint(CacheHint::max_age(10).private())
                        .access(false),
                ),
            )
            .field(
                "body",
                fields::text(FieldConfig::new().cache_hint(CacheHint::max_age(30).private())),
            ),
    );
    initialise_lists(lists, &CompileConfig::default()).unwrap()
}

#[tokio::test]
async fn test_cache_hints_are_recorded_for_granted_fields() {
    let schema = cached_schema();
    let store = Arc::new(MemoryStore::new());
    let article = &schema.list("Article").unwrap().types.output;
    let cache_control = Arc::new(CacheControl::new());
    let info = FieldInfo::new("article").with_cache_control(cache_control.clone());

    let results = article
        .resolve_fields(
            &item(json!({ "id": "a1", "title": "T", "draft": "D", "body": "B" })),
            vec![
                RequestedField::new("title", no_args()),
                RequestedField::new("draft", no_args()),
                RequestedField::new("body", no_args()),
            ],
            &context(&store),
            &info,
        )
        .await;
    assert!(results["draft"].is_err());

    let mut paths: Vec<String> = cache_control.hints().into_iter().map(|(path, _)| path).collect();
    paths.sort();
    assert_eq!(paths, vec!["article.body".to_string(), "article.title".to_string()]);

    let policy = cache_control.overall_policy();
    assert_eq!(policy.max_age, Some(30));
    assert_eq!(policy.scope, Some(CacheScope::Private));
}

fn computed_schema() -> CompiledSchema {
    let headline = FieldOutput::new(OutputType::Scalar(ScalarType::String)).with_resolve(
        output_resolver(|args| async move {
            let title = args.item.get("title").and_then(Value::as_str).unwrap_or("untitled");
            Ok::<_, ResolveError>(ResolvedValue::Value(json!(format!("{title} ({})", args.id))))
        }),
    );
    let admin_only = FieldAccessControl::predicate(|args| async move {
        args.session
            .as_ref()
            .and_then(|session| session.get("admin"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    });

    let mut lists = BTreeMap::new();
    lists.insert(
        "Story".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("title", fields::text(FieldConfig::new()))
            .field("headline", fields::virtual_field(headline, None))
            .field("notes", fields::text(FieldConfig::new().access(admin_only))),
    );
    initialise_lists(lists, &CompileConfig::default()).unwrap()
}

#[tokio::test]
async fn test_output_transform_receives_id_and_item() {
    let schema = computed_schema();
    let store = Arc::new(MemoryStore::new());
    let story = &schema.list("Story").unwrap().types.output;

    let headline = story
        .resolve_field(
            "headline",
            &item(json!({ "id": "s1", "title": "Launch" })),
            no_args(),
            &context(&store),
            &FieldInfo::new("story.headline"),
        )
        .await
        .unwrap();
    assert_eq!(headline.into_value(), Some(json!("Launch (\"s1\")")));
}

#[tokio::test]
async fn test_access_predicate_sees_session() {
    let schema = computed_schema();
    let store = Arc::new(MemoryStore::new());
    let story = &schema.list("Story").unwrap().types.output;
    let row = item(json!({ "id": "s1", "notes": "internal" }));

    let anonymous = story
        .resolve_field("notes", &row, no_args(), &context(&store), &FieldInfo::new("notes"))
        .await;
    assert!(matches!(anonymous, Err(ResolveError::AccessDenied { .. })));

    let admin = context(&store).with_session(json!({ "admin": true }));
    let granted = story
        .resolve_field("notes", &row, no_args(), &admin, &FieldInfo::new("notes"))
        .await
        .unwrap();
    assert_eq!(granted.into_value(), Some(json!("internal")));
}

#[tokio::test]
async fn test_missing_id_is_reported_as_null() {
    let schema = blog_schema();
    let store = Arc::new(MemoryStore::new());
    let post = &schema.list("Post").unwrap().types.output;

    let denied = post
        .resolve_field("secret", &item(json!({})), no_args(), &context(&store), &FieldInfo::new("secret"))
        .await;
    assert_eq!(
        denied.unwrap_err(),
        ResolveError::AccessDenied {
            operation: Operation::Read,
            field_path: "secret".into(),
            item_id: Value::Null,
        }
    );
}

#[tokio::test]
async fn test_unknown_output_field_is_an_error() {
    let schema = blog_schema();
    let store = Arc::new(MemoryStore::new());
    let post = &schema.list("Post").unwrap().types.output;

    let result = post
        .resolve_field("colour", &item(json!({ "id": "p1" })), no_args(), &context(&store), &FieldInfo::new("colour"))
        .await;
    assert!(matches!(result, Err(ResolveError::UnknownField { .. })));
}
