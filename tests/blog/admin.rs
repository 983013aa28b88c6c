use serde_json::json;

use crate::support::{self, data, id_param, query};

#[test]
fn dashboard_counts_everything() {
    let service = support::service();
    let author = support::register(&service, "Author");
    let admin = support::admin(&service);

    support::publish(
        &service,
        &author,
        json!({ "title": "Published one", "content": "Body", "status": "PUBLISHED", "tags": ["news"] }),
    );
    support::publish(&service, &author, json!({ "title": "Draft one", "content": "Body" }));
    service
        .dispatch(
            "question.create",
            json!({ "title": "Any question?", "content": "A question with detail." }),
            author.clone(),
        )
        .unwrap();

    let err = service.dispatch("admin.stats", json!({}), author).unwrap_err();
    assert_eq!(err.status_code(), 403);

    let stats = service.dispatch("admin.stats", json!({}), admin).unwrap();
    let stats = data(&stats);
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["activeUsers"], 2);
    assert_eq!(stats["totalPosts"], 2);
    assert_eq!(stats["publishedPosts"], 1);
    assert_eq!(stats["totalQuestions"], 1);
    assert_eq!(stats["unansweredQuestions"], 1);
    assert_eq!(stats["totalTags"], 1);
}

#[test]
fn users_are_listed_filtered_and_deactivated() {
    let service = support::service();
    let ada = support::register(&service, "Ada");
    support::register(&service, "Grace");
    let admin = support::admin(&service);

    let err = service
        .dispatch_with("user.list", query(&[]), json!({}), ada.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let users = service
        .dispatch_with("user.list", query(&[("role", "USER")]), json!({}), admin.clone())
        .unwrap();
    assert_eq!(users.pagination.unwrap().total_items, 2);
    assert!(data(&users)[0].get("passwordHash").is_none());

    let ada_id = ada.user_id().unwrap().to_string();
    service
        .dispatch_with("user.update", id_param(&ada_id), json!({ "isActive": false }), admin.clone())
        .unwrap();

    // Deactivated accounts can no longer log in.
    let err = service
        .dispatch(
            "auth.login",
            json!({ "email": "ada@example.com", "password": "password123" }),
            blogqa::Session::new(),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    // Admins cannot lock themselves out.
    let admin_id = admin.user_id().unwrap().to_string();
    let err = service
        .dispatch_with("user.delete", id_param(&admin_id), json!({}), admin.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let activity = service
        .dispatch_with("admin.activity", query(&[("action", "user.register")]), json!({}), admin)
        .unwrap();
    // Two sign-ups plus the bootstrap admin.
    assert_eq!(activity.pagination.unwrap().total_items, 3);
}
