use blogqa::entities::{Answer, Question, Vote};
use blogqa::{ModelsExt, Session};
use serde_json::json;

use crate::support::{self, data, id_param, vote};

fn answer_count(service: &support::TestService, question: &str) -> u32 {
    service
        .app()
        .store()
        .models::<Question>()
        .get(question)
        .unwrap()
        .unwrap()
        .data
        .answer_count
}

#[test]
fn deleting_an_answer_decrements_exactly_once() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let helper = support::register(&service, "Helper");
    let question = support::ask(&service, &owner, "Why does my future not run?");
    let first = support::answer(&service, &helper, &question);
    support::answer(&service, &helper, &question);
    assert_eq!(answer_count(&service, &question), 2);

    vote(&service, &owner, "answer.vote", &first, "UPVOTE").unwrap();

    // Someone else's answer: rejected, counter untouched.
    let err = service
        .dispatch_with("answer.delete", id_param(&first), json!({}), owner.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(answer_count(&service, &question), 2);

    let response = service
        .dispatch_with("answer.delete", id_param(&first), json!({}), helper.clone())
        .unwrap();
    assert_eq!(response.message.as_deref(), Some("answer deleted"));
    assert_eq!(answer_count(&service, &question), 1);

    let store = service.app().store();
    assert!(store.models::<Answer>().get(&first).unwrap().is_none());
    assert_eq!(store.models::<Vote>().count(&|v| v.target_id == first).unwrap(), 0);

    // Already gone: 404, no second decrement.
    let err = service
        .dispatch_with("answer.delete", id_param(&first), json!({}), helper)
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(answer_count(&service, &question), 1);
}

#[test]
fn accepting_moves_between_answers() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let helper = support::register(&service, "Helper");
    let question = support::ask(&service, &owner, "Which allocator should I use?");
    let first = support::answer(&service, &helper, &question);
    let second = support::answer(&service, &helper, &question);

    let err = service
        .dispatch_with("answer.accept", id_param(&first), json!({}), helper.clone())
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    service
        .dispatch_with("answer.accept", id_param(&first), json!({}), owner.clone())
        .unwrap();
    let response = service
        .dispatch_with("answer.accept", id_param(&second), json!({}), owner.clone())
        .unwrap();
    assert_eq!(data(&response)["isAccepted"], true);

    let store = service.app().store();
    let q = store.models::<Question>().get(&question).unwrap().unwrap().data;
    assert_eq!(q.accepted_answer_id.as_deref(), Some(second.as_str()));
    assert!(!store.models::<Answer>().get(&first).unwrap().unwrap().data.is_accepted);

    // Accepted answer is listed first even with fewer votes.
    vote(&service, &owner, "answer.vote", &first, "UPVOTE").unwrap();
    let listing = service
        .dispatch_with("answer.list", id_param(&question), json!({}), Session::new())
        .unwrap();
    assert_eq!(data(&listing)[0]["id"], second);
    assert_eq!(data(&listing)[1]["id"], first);
}

#[test]
fn only_the_author_edits_a_question() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let other = support::register(&service, "Other");
    let admin = support::admin(&service);
    let question = support::ask(&service, &owner, "How do I read a file?");

    let edit = json!({ "title": "How do I read a file line by line?" });
    for session in [&other, &admin] {
        let err = service
            .dispatch_with("question.update", id_param(&question), edit.clone(), session.clone())
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    let response = service
        .dispatch_with("question.update", id_param(&question), edit, owner)
        .unwrap();
    assert_eq!(data(&response)["title"], "How do I read a file line by line?");
}

#[test]
fn deleting_a_question_removes_answers_and_votes() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let helper = support::register(&service, "Helper");
    let question = support::ask(&service, &owner, "Should I use async here?");
    let answer = support::answer(&service, &helper, &question);
    vote(&service, &helper, "question.vote", &question, "UPVOTE").unwrap();
    vote(&service, &owner, "answer.vote", &answer, "UPVOTE").unwrap();

    service
        .dispatch_with("question.delete", id_param(&question), json!({}), owner)
        .unwrap();

    let store = service.app().store();
    assert!(store.models::<Question>().get(&question).unwrap().is_none());
    assert!(store.models::<Answer>().get(&answer).unwrap().is_none());
    assert_eq!(store.models::<Vote>().count(&|_| true).unwrap(), 0);
}

#[test]
fn viewing_a_question_counts_views_and_shows_the_callers_vote() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let voter = support::register(&service, "Voter");
    let question = support::ask(&service, &owner, "Is Rc thread safe?");
    vote(&service, &voter, "question.vote", &question, "DOWNVOTE").unwrap();

    let anonymous = service
        .dispatch_with("question.get", id_param(&question), json!({}), Session::new())
        .unwrap();
    assert!(data(&anonymous)["userVote"].is_null());
    assert_eq!(data(&anonymous)["viewCount"], 1);

    let seen = service
        .dispatch_with("question.get", id_param(&question), json!({}), voter)
        .unwrap();
    assert_eq!(data(&seen)["userVote"], "DOWNVOTE");
    assert_eq!(data(&seen)["viewCount"], 2);
    assert_eq!(data(&seen)["netVotes"], -1);
}

#[test]
fn validation_errors_are_reported() {
    let service = support::service();
    let owner = support::register(&service, "Owner");

    let err = service
        .dispatch(
            "question.create",
            json!({ "title": "Hi", "content": "too short" }),
            owner,
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    let message = err.to_string();
    assert!(message.contains("title"));
    assert!(message.contains("content"));
}
