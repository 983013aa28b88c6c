use blogqa::Session;
use serde_json::json;

use crate::support::{self, data, query, vote};

#[test]
fn last_page_holds_the_remainder() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    for i in 0..23 {
        support::ask(&service, &owner, &format!("Question number {i}"));
    }

    let response = service
        .dispatch_with(
            "question.list",
            query(&[("page", "3"), ("limit", "10")]),
            json!({}),
            Session::new(),
        )
        .unwrap();
    assert_eq!(data(&response).as_array().unwrap().len(), 3);

    let pagination = response.pagination.unwrap();
    assert_eq!(pagination.current_page, 3);
    assert_eq!(pagination.total_pages, 3);
    assert_eq!(pagination.total_items, 23);
    assert_eq!(pagination.items_per_page, 10);

    let beyond = service
        .dispatch_with("question.list", query(&[("page", "9")]), json!({}), Session::new())
        .unwrap();
    assert!(data(&beyond).as_array().unwrap().is_empty());
}

#[test]
fn bad_paging_is_rejected() {
    let service = support::service();
    for pairs in [[("page", "0")], [("limit", "-5")], [("page", "two")]] {
        let err = service
            .dispatch_with("question.list", query(&pairs), json!({}), Session::new())
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}

#[test]
fn filters_and_sorting() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let voter = support::register(&service, "Voter");

    let popular = support::ask(&service, &owner, "Tokio select semantics");
    let answered = support::ask(&service, &owner, "Serde flatten and enums");
    let quiet = support::ask(&service, &owner, "Cargo workspaces explained");
    vote(&service, &voter, "question.vote", &popular, "UPVOTE").unwrap();
    vote(&service, &voter, "question.vote", &quiet, "DOWNVOTE").unwrap();
    support::answer(&service, &voter, &answered);

    let by_votes = service
        .dispatch_with("question.list", query(&[("sort", "votes")]), json!({}), Session::new())
        .unwrap();
    let ids: Vec<&str> = data(&by_votes)
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.first(), Some(&popular.as_str()));
    assert_eq!(ids.last(), Some(&quiet.as_str()));

    let unanswered = service
        .dispatch_with("question.list", query(&[("unanswered", "true")]), json!({}), Session::new())
        .unwrap();
    assert_eq!(unanswered.pagination.unwrap().total_items, 2);

    let search = service
        .dispatch_with("question.list", query(&[("search", "SERDE")]), json!({}), Session::new())
        .unwrap();
    assert_eq!(data(&search)[0]["id"], answered);

    let tagged = service
        .dispatch_with("question.list", query(&[("tag", "Rust")]), json!({}), Session::new())
        .unwrap();
    assert_eq!(tagged.pagination.unwrap().total_items, 3);
}
