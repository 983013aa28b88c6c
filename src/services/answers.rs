//! Answers to questions.
//!
//! The parent question's `answer_count` is written in the same batch as the
//! answer, so it moves by exactly one per successful create or delete.

use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Answer, Question, TargetType, Vote};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::pagination::{paginate, Page, PageRequest};
use crate::policy::{ensure_can_mutate, Actor};

use super::{data, load};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnswer {
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAnswer {
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub content: String,
}

/// Answers of a question: the accepted one first, then by net votes.
pub fn list<S: ModelStore>(
    app: &App<S>,
    question_id: &str,
    request: PageRequest,
) -> Result<Page<Answer>, HandlerError> {
    load::<Question, _>(app.store(), "question", question_id)?;
    let mut answers = data(app.store().models::<Answer>().find(&|a| a.question_id == question_id)?);
    answers.sort_by(|a, b| {
        b.is_accepted
            .cmp(&a.is_accepted)
            .then_with(|| b.votes.net_votes().cmp(&a.votes.net_votes()))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(paginate(answers, request))
}

pub fn create<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    question_id: &str,
    input: CreateAnswer,
) -> Result<Answer, HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<Question>(question_id)])?;
    let mut question = load::<Question, _>(app.store(), "question", question_id)?;

    let answer = Answer::new(question_id, &actor.id, &input.content);
    question.data.answer_count = question.data.answer_count.saturating_add(1);
    app.store()
        .batch()
        .insert(&answer)
        .update(&question)
        .insert(&ActivityLog::new(&actor.id, "answer.create", "answer", &answer.id))
        .commit()?;
    Ok(answer)
}

pub fn update<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    id: &str,
    input: UpdateAnswer,
) -> Result<Answer, HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<Answer>(id)])?;
    let mut answer = load::<Answer, _>(app.store(), "answer", id)?;
    ensure_can_mutate(actor, &answer.data)?;

    answer.data.content = input.content;
    answer.data.updated_at = Utc::now();
    app.store()
        .batch()
        .update(&answer)
        .insert(&ActivityLog::new(&actor.id, "answer.update", "answer", id))
        .commit()?;
    Ok(answer.into_inner())
}

/// Lock an answer together with its question.
fn lock_with_question<S: ModelStore>(
    app: &App<S>,
    answer_id: &str,
) -> Result<crate::lock::LockGuard<crate::lock::InMemoryLock>, HandlerError> {
    app.lock_stable(|| {
        let answer = load::<Answer, _>(app.store(), "answer", answer_id)?;
        Ok(vec![
            StoreKey::of::<Answer>(answer_id),
            StoreKey::of::<Question>(answer.data.question_id),
        ])
    })
}

/// Delete an answer and its votes; the question's `answer_count` drops by
/// one only if the whole batch commits.
pub fn delete<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<(), HandlerError> {
    let _guard = lock_with_question(app, id)?;
    let answer = load::<Answer, _>(app.store(), "answer", id)?;
    ensure_can_mutate(actor, &answer.data)?;

    let votes = app
        .store()
        .models::<Vote>()
        .find(&|v| v.target_type == TargetType::Answer && v.target_id == id)?;

    let mut batch = app.store().batch().delete(&answer).delete_all(&votes);
    if let Some(mut question) = app.store().models::<Question>().get(&answer.data.question_id)? {
        question.data.answer_count = question.data.answer_count.saturating_sub(1);
        if question.data.accepted_answer_id.as_deref() == Some(id) {
            question.data.accepted_answer_id = None;
        }
        batch = batch.update(&question);
    }
    batch
        .insert(&ActivityLog::new(&actor.id, "answer.delete", "answer", id))
        .commit()?;
    Ok(())
}

/// Mark an answer as the accepted one. Only the question's author may do
/// this; a previously accepted answer is un-accepted in the same batch.
pub fn accept<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<Answer, HandlerError> {
    let _guard = app.lock_stable(|| {
        let answer = load::<Answer, _>(app.store(), "answer", id)?;
        let question = load::<Question, _>(app.store(), "question", &answer.data.question_id)?;
        let mut keys = vec![
            StoreKey::of::<Answer>(id),
            StoreKey::of::<Question>(question.data.id.as_str()),
        ];
        if let Some(previous) = question.data.accepted_answer_id {
            keys.push(StoreKey::of::<Answer>(previous));
        }
        Ok(keys)
    })?;

    let mut answer = load::<Answer, _>(app.store(), "answer", id)?;
    let mut question = load::<Question, _>(app.store(), "question", &answer.data.question_id)?;
    ensure_can_mutate(actor, &question.data).map_err(|_| {
        HandlerError::Forbidden("only the question's author can accept an answer".into())
    })?;
    if answer.data.is_accepted {
        return Ok(answer.into_inner());
    }

    let mut batch = app.store().batch();
    if let Some(previous_id) = question.data.accepted_answer_id.take().filter(|p| p != id) {
        if let Some(mut previous) = app.store().models::<Answer>().get(&previous_id)? {
            previous.data.is_accepted = false;
            batch = batch.update(&previous);
        }
    }
    let now = Utc::now();
    answer.data.is_accepted = true;
    answer.data.updated_at = now;
    question.data.accepted_answer_id = Some(id.to_string());
    question.data.updated_at = now;

    batch
        .update(&answer)
        .update(&question)
        .insert(&ActivityLog::new(&actor.id, "answer.accept", "answer", id))
        .commit()?;
    Ok(answer.into_inner())
}
