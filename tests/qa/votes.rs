use std::sync::Arc;
use std::thread;

use blogqa::entities::{Answer, Question, TargetType, Vote};
use blogqa::{HandlerError, ModelsExt};
use serde_json::json;

use crate::support::{self, data, vote};

fn counts(value: &serde_json::Value) -> (u64, u64, i64) {
    (
        value["upvoteCount"].as_u64().unwrap(),
        value["downvoteCount"].as_u64().unwrap(),
        value["netVotes"].as_i64().unwrap(),
    )
}

#[test]
fn question_vote_sequence() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let alice = support::register(&service, "Alice");
    let bob = support::register(&service, "Bob");
    let question = support::ask(&service, &owner, "How do lifetimes work?");

    let r = vote(&service, &alice, "question.vote", &question, "UPVOTE").unwrap();
    assert_eq!(r.message.as_deref(), Some("vote cast"));
    assert_eq!(counts(data(&r)), (1, 0, 1));
    assert_eq!(data(&r)["userVote"], "UPVOTE");

    let r = vote(&service, &alice, "question.vote", &question, "UPVOTE").unwrap();
    assert_eq!(r.message.as_deref(), Some("vote removed"));
    assert_eq!(counts(data(&r)), (0, 0, 0));
    assert!(data(&r)["userVote"].is_null());

    let r = vote(&service, &alice, "question.vote", &question, "DOWNVOTE").unwrap();
    assert_eq!(r.message.as_deref(), Some("vote cast"));
    assert_eq!(counts(data(&r)), (0, 1, -1));

    let r = vote(&service, &bob, "question.vote", &question, "UPVOTE").unwrap();
    assert_eq!(counts(data(&r)), (1, 1, 0));

    let stored = service.app().store().models::<Question>().get(&question).unwrap().unwrap();
    assert_eq!(stored.data.votes.upvote_count, 1);
    assert_eq!(stored.data.votes.downvote_count, 1);
}

#[test]
fn flipping_keeps_a_single_vote_row() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let voter = support::register(&service, "Voter");
    let question = support::ask(&service, &owner, "Why is the borrow checker angry?");
    let answer = support::answer(&service, &owner, &question);

    let r = vote(&service, &voter, "answer.vote", &answer, "upvote").unwrap();
    assert_eq!(counts(data(&r)), (1, 0, 1));
    let r = vote(&service, &voter, "answer.vote", &answer, "downvote").unwrap();
    assert_eq!(r.message.as_deref(), Some("vote changed"));
    assert_eq!(counts(data(&r)), (0, 1, -1));

    let rows = service
        .app()
        .store()
        .models::<Vote>()
        .find(&|v| v.target_id == answer)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].data.target_type, TargetType::Answer);

    let status = service
        .dispatch_with("answer.vote_status", support::id_param(&answer), json!({}), voter.clone())
        .unwrap();
    assert_eq!(data(&status)["userVote"], "DOWNVOTE");
}

#[test]
fn invalid_vote_type_and_missing_target() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let question = support::ask(&service, &owner, "What does Pin actually do?");

    let err = vote(&service, &owner, "question.vote", &question, "SIDEWAYS").unwrap_err();
    assert!(matches!(err, HandlerError::Validation(_)));

    let err = vote(&service, &owner, "answer.vote", "no-such-answer", "UPVOTE").unwrap_err();
    assert_eq!(err.status_code(), 404);

    let rows = service.app().store().models::<Vote>().count(&|_| true).unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn anonymous_callers_cannot_vote() {
    let service = support::service();
    let owner = support::register(&service, "Owner");
    let question = support::ask(&service, &owner, "Is unsafe ever fine?");

    let err = vote(&service, &blogqa::Session::new(), "question.vote", &question, "UPVOTE").unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[test]
fn concurrent_votes_keep_counters_equal_to_rows() {
    let service = Arc::new(support::service());
    let owner = support::register(&service, "Owner");
    let question = support::ask(&service, &owner, "Does Arc need Send?");
    let answer = support::answer(&service, &owner, &question);

    let voters: Vec<_> = (0..12)
        .map(|i| support::register(&service, &format!("Voter{i}")))
        .collect();

    let handles: Vec<_> = voters
        .into_iter()
        .enumerate()
        .map(|(i, session)| {
            let service = service.clone();
            let question = question.clone();
            let answer = answer.clone();
            thread::spawn(move || {
                for round in 0..9 {
                    let vote_type = if (i + round) % 3 == 0 { "DOWNVOTE" } else { "UPVOTE" };
                    vote(&service, &session, "question.vote", &question, vote_type).unwrap();
                    vote(&service, &session, "answer.vote", &answer, vote_type).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = service.app().store();
    let rows = store.models::<Vote>().all().unwrap();

    let q = store.models::<Question>().get(&question).unwrap().unwrap().data;
    let q_up = rows.iter().filter(|v| v.data.target_id == question && v.data.vote_type.as_str() == "UPVOTE").count();
    let q_down = rows.iter().filter(|v| v.data.target_id == question && v.data.vote_type.as_str() == "DOWNVOTE").count();
    assert_eq!(q.votes.upvote_count as usize, q_up);
    assert_eq!(q.votes.downvote_count as usize, q_down);

    let a = store.models::<Answer>().get(&answer).unwrap().unwrap().data;
    let a_up = rows.iter().filter(|v| v.data.target_id == answer && v.data.vote_type.as_str() == "UPVOTE").count();
    let a_down = rows.iter().filter(|v| v.data.target_id == answer && v.data.vote_type.as_str() == "DOWNVOTE").count();
    assert_eq!(a.votes.upvote_count as usize, a_up);
    assert_eq!(a.votes.downvote_count as usize, a_down);
    assert_eq!(a.votes.net_votes(), a_up as i64 - a_down as i64);

    let admin = support::admin(&service);
    let report = service
        .dispatch("admin.reconcile_votes", json!({}), admin)
        .unwrap();
    assert_eq!(data(&report)["targetsCorrected"], 0);
}
