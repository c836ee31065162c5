//! Shared fixtures for the integration tests.
//!
//! The blog schema has users, posts and comments plus a product list with a
//! money field:
//!
//! * `User.posts` and `Post.author` are the two sides of one relation
//! * `Comment.post` is one-sided, so `Post` gets `from_Comment_post`
//! * `Post.secret` can never be read

#![allow(dead_code)]

use list_schema::config::CompileConfig;
use list_schema::resolve::Item;
use list_schema::schema::fields::{self, FieldConfig, RelationshipConfig};
use list_schema::schema::{initialise_lists, CompiledSchema, ListConfig};
use list_schema::store::memory::MemoryStore;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn blog_lists() -> BTreeMap<String, ListConfig> {
    let mut lists = BTreeMap::new();
    lists.insert(
        "User".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("name", fields::text(FieldConfig::new().orderable()))
            .field("email", fields::text(FieldConfig::new().unique()))
            .field(
                "posts",
                fields::relationship(RelationshipConfig::new("Post.author").many()),
            ),
    );
    lists.insert(
        "Post".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("title", fields::text(FieldConfig::new().orderable()))
            .field("votes", fields::integer(FieldConfig::new().orderable()))
            .field("secret", fields::text(FieldConfig::new().access(false)))
            .field(
                "status",
                fields::select(["draft", "published"], FieldConfig::new()),
            )
            .field(
                "author",
                fields::relationship(RelationshipConfig::new("User.posts")),
            ),
    );
    lists.insert(
        "Comment".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field("body", fields::text(FieldConfig::new()))
            .field("post", fields::relationship(RelationshipConfig::new("Post"))),
    );
    lists.insert(
        "Product".to_string(),
        ListConfig::new()
            .field("id", fields::id())
            .field(
                "price",
                fields::money(["AUD", "USD"], FieldConfig::new().orderable()),
            )
            .graphql_names("Product", "Products"),
    );
    lists
}

pub fn blog_schema() -> CompiledSchema {
    initialise_lists(blog_lists(), &CompileConfig::default()).expect("blog schema should compile")
}

pub fn item(value: Value) -> Item {
    Item::from_value(value).expect("item fixtures are objects")
}

/// A store holding one user with four posts.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .insert("User", item(json!({ "id": "u1", "name": "Ada", "email": "ada@example.com" })))
        .await;
    for (id, title, votes) in [("p1", "First", 3), ("p2", "Second", 8), ("p3", "Third", 5), ("p4", "Fourth", 1)] {
        store
            .insert(
                "Post",
                item(json!({
                    "id": id,
                    "title": title,
                    "votes": votes,
                    "secret": "hidden",
                    "status": "published",
                    "author": "u1",
                })),
            )
            .await;
    }
    store
}
