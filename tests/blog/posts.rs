use blogqa::entities::{Comment, Post, Tag};
use blogqa::{ModelsExt, Session};
use serde_json::json;

use crate::support::{self, data, id_param, query};

#[test]
fn creating_a_post_derives_slug_excerpt_and_tags() {
    let service = support::service();
    let author = support::register(&service, "Author");

    let post = support::publish(
        &service,
        &author,
        json!({
            "title": "Hello, Rust World!",
            "content": "word ".repeat(100),
            "tags": ["rust", " Rust ", "async"],
            "status": "PUBLISHED",
        }),
    );
    assert_eq!(post["slug"], "hello-rust-world");
    assert_eq!(post["status"], "PUBLISHED");
    assert!(post["excerpt"].as_str().unwrap().ends_with("..."));
    assert_eq!(post["tags"], json!(["rust", "async"]));

    let tags = service.app().store().models::<Tag>().count(&|_| true).unwrap();
    assert_eq!(tags, 2);
}

#[test]
fn drafts_are_hidden_from_other_readers() {
    let service = support::service();
    let author = support::register(&service, "Author");
    let reader = support::register(&service, "Reader");
    let admin = support::admin(&service);

    let draft = support::publish(
        &service,
        &author,
        json!({ "title": "Work in progress", "content": "Not ready yet." }),
    );
    let id = draft["id"].as_str().unwrap();
    assert_eq!(draft["status"], "DRAFT");

    for session in [Session::new(), reader.clone()] {
        let err = service
            .dispatch_with("post.get", id_param(id), json!({}), session.clone())
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let listed = service
            .dispatch_with("post.list", query(&[]), json!({}), session)
            .unwrap();
        assert_eq!(listed.pagination.unwrap().total_items, 0);
    }

    for session in [author, admin] {
        service
            .dispatch_with("post.get", id_param(id), json!({}), session)
            .unwrap();
    }
    let stored = service.app().store().models::<Post>().get(id).unwrap().unwrap();
    assert_eq!(stored.data.view_count, 2);
}

#[test]
fn comments_track_the_post_counter() {
    let service = support::service();
    let author = support::register(&service, "Author");
    let reader = support::register(&service, "Reader");
    let admin = support::admin(&service);
    let post = support::publish(
        &service,
        &author,
        json!({ "title": "Comment on me", "content": "Body", "status": "PUBLISHED" }),
    );
    let post_id = post["id"].as_str().unwrap();

    let mut comment_ids = Vec::new();
    for text in ["First!", "Nice post", "Thanks"] {
        let response = service
            .dispatch_with("comment.create", id_param(post_id), json!({ "content": text }), reader.clone())
            .unwrap();
        comment_ids.push(data(&response)["id"].as_str().unwrap().to_string());
    }

    let listed = service
        .dispatch_with("comment.list", id_param(post_id), json!({}), Session::new())
        .unwrap();
    assert_eq!(data(&listed)[0]["content"], "First!");

    // The post author does not own the comment; an admin may moderate it.
    let err = service
        .dispatch_with("comment.delete", id_param(&comment_ids[0]), json!({}), author.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    service
        .dispatch_with("comment.delete", id_param(&comment_ids[0]), json!({}), admin)
        .unwrap();

    let stored = service.app().store().models::<Post>().get(post_id).unwrap().unwrap();
    assert_eq!(stored.data.comment_count, 2);

    service
        .dispatch_with("post.delete", id_param(post_id), json!({}), author)
        .unwrap();
    let remaining = service.app().store().models::<Comment>().count(&|_| true).unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn updating_a_post() {
    let service = support::service();
    let author = support::register(&service, "Author");
    let other = support::register(&service, "Other");
    let post = support::publish(
        &service,
        &author,
        json!({ "title": "Old title", "content": "Body", "status": "PUBLISHED" }),
    );
    let id = post["id"].as_str().unwrap();

    let err = service
        .dispatch_with("post.update", id_param(id), json!({ "title": "Hijacked" }), other)
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let updated = service
        .dispatch_with("post.update", id_param(id), json!({ "title": "New title" }), author)
        .unwrap();
    assert_eq!(data(&updated)["slug"], "new-title");
}

#[test]
fn categories_are_admin_managed() {
    let service = support::service();
    let author = support::register(&service, "Author");
    let admin = support::admin(&service);

    let err = service
        .dispatch("category.create", json!({ "name": "Rust" }), author.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let created = service
        .dispatch("category.create", json!({ "name": "Rust" }), admin.clone())
        .unwrap();
    let category_id = data(&created)["id"].as_str().unwrap().to_string();
    let err = service
        .dispatch("category.create", json!({ "name": "rust" }), admin.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let post = support::publish(
        &service,
        &author,
        json!({ "title": "Categorized", "content": "Body", "categoryId": category_id, "status": "PUBLISHED" }),
    );
    let filtered = service
        .dispatch_with("post.list", query(&[("categoryId", category_id.as_str())]), json!({}), Session::new())
        .unwrap();
    assert_eq!(filtered.pagination.unwrap().total_items, 1);

    service
        .dispatch_with("category.delete", id_param(&category_id), json!({}), admin)
        .unwrap();
    let stored = service
        .app()
        .store()
        .models::<Post>()
        .get(post["id"].as_str().unwrap())
        .unwrap()
        .unwrap();
    assert!(stored.data.category_id.is_none());
}
