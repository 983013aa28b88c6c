//! Questions of the Q&A board.

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Answer, Question, TargetType, Vote, VoteType};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::pagination::{paginate, Page, PageRequest};
use crate::policy::{ensure_can_mutate, Actor};
use crate::text::{contains_ci, eq_ci, normalize_tags};

use super::{data, load, newest_first, tags, votes};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestion {
    #[validate(length(min = 5, max = 200, message = "must be between 5 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestion {
    #[validate(length(min = 5, max = 200, message = "must be between 5 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 10, message = "must be at least 10 characters"))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionSort {
    #[default]
    Newest,
    Votes,
    Answers,
}

impl FromStr for QuestionSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(QuestionSort::Newest),
            "votes" => Ok(QuestionSort::Votes),
            "answers" => Ok(QuestionSort::Answers),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<String>,
    pub unanswered: bool,
    pub sort: QuestionSort,
}

/// A question plus the caller's vote on it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub user_vote: Option<VoteType>,
}

pub fn create<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    input: CreateQuestion,
) -> Result<Question, HandlerError> {
    let tag_names = normalize_tags(&input.tags);
    tags::ensure(app, &tag_names)?;

    let question = Question::new(&actor.id, &input.title, &input.content, tag_names);
    app.store()
        .batch()
        .insert(&question)
        .insert(&ActivityLog::new(&actor.id, "question.create", "question", &question.id))
        .commit()?;
    Ok(question)
}

pub fn list<S: ModelStore>(
    app: &App<S>,
    filter: &QuestionFilter,
    request: PageRequest,
) -> Result<Page<Question>, HandlerError> {
    let mut questions = data(app.store().models::<Question>().find(&|q| {
        filter
            .search
            .as_deref()
            .map_or(true, |s| contains_ci(&q.title, s) || contains_ci(&q.content, s))
            && filter
                .tag
                .as_deref()
                .map_or(true, |t| q.tags.iter().any(|qt| eq_ci(qt, t)))
            && filter.author_id.as_deref().map_or(true, |a| q.author_id == a)
            && (!filter.unanswered || q.answer_count == 0)
    })?);

    questions.sort_by(|a, b| {
        let primary = match filter.sort {
            QuestionSort::Newest => std::cmp::Ordering::Equal,
            QuestionSort::Votes => b.votes.net_votes().cmp(&a.votes.net_votes()),
            QuestionSort::Answers => b.answer_count.cmp(&a.answer_count),
        };
        primary.then_with(|| newest_first((&a.created_at, &a.id), (&b.created_at, &b.id)))
    });
    Ok(paginate(questions, request))
}

/// Fetch a question, count the view and attach the caller's vote.
pub fn get<S: ModelStore>(
    app: &App<S>,
    viewer: Option<&Actor>,
    id: &str,
) -> Result<QuestionDetail, HandlerError> {
    let question = {
        let _guard = app.lock(&[StoreKey::of::<Question>(id)])?;
        let mut question = load::<Question, _>(app.store(), "question", id)?;
        question.data.view_count = question.data.view_count.saturating_add(1);
        app.store().models::<Question>().update(&question)?.into_inner()
    };
    let user_vote = match viewer {
        Some(actor) => votes::current_vote(app, TargetType::Question, id, &actor.id)?,
        None => None,
    };
    Ok(QuestionDetail { question, user_vote })
}

pub fn update<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    id: &str,
    input: UpdateQuestion,
) -> Result<Question, HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<Question>(id)])?;
    let mut question = load::<Question, _>(app.store(), "question", id)?;
    ensure_can_mutate(actor, &question.data)?;

    if let Some(title) = input.title {
        question.data.title = title.trim().to_string();
    }
    if let Some(content) = input.content {
        question.data.content = content;
    }
    if let Some(tag_list) = input.tags {
        let tag_names = normalize_tags(&tag_list);
        tags::ensure(app, &tag_names)?;
        question.data.tags = tag_names;
    }
    question.data.updated_at = Utc::now();

    app.store()
        .batch()
        .update(&question)
        .insert(&ActivityLog::new(&actor.id, "question.update", "question", id))
        .commit()?;
    Ok(question.into_inner())
}

/// Delete a question, its answers and every vote on any of them.
pub fn delete<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<(), HandlerError> {
    let question = load::<Question, _>(app.store(), "question", id)?;
    ensure_can_mutate(actor, &question.data)?;

    let answers_of = || -> Result<Vec<StoreKey>, HandlerError> {
        let mut keys: Vec<StoreKey> = app
            .store()
            .models::<Answer>()
            .find(&|a| a.question_id == id)?
            .into_iter()
            .map(|a| StoreKey::of::<Answer>(a.data.id))
            .collect();
        keys.sort_by(|a, b| a.id.cmp(&b.id));
        keys.push(StoreKey::of::<Question>(id));
        Ok(keys)
    };
    let _guard = app.lock_stable(answers_of)?;

    let question = load::<Question, _>(app.store(), "question", id)?;
    let answers = app.store().models::<Answer>().find(&|a| a.question_id == id)?;
    let votes = app.store().models::<Vote>().find(&|v| match v.target_type {
        TargetType::Question => v.target_id == id,
        TargetType::Answer => answers.iter().any(|a| a.data.id == v.target_id),
    })?;

    app.store()
        .batch()
        .delete_all(&votes)
        .delete_all(&answers)
        .delete(&question)
        .insert(&ActivityLog::new(&actor.id, "question.delete", "question", id))
        .commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entities::Role;

    fn ask(app: &App, actor: &Actor, title: &str) -> Question {
        create(
            app,
            actor,
            CreateQuestion {
                title: title.into(),
                content: "What is the right way to do this?".into(),
                tags: vec!["rust".into()],
            },
        )
        .unwrap()
    }

    #[test]
    fn only_owner_may_edit() {
        let app = App::in_memory(Config::default());
        let alice = Actor::new("alice", Role::User);
        let q = ask(&app, &alice, "Borrow checker question");

        let edit = UpdateQuestion {
            title: Some("Edited question".into()),
            ..UpdateQuestion::default()
        };
        let admin = Actor::new("root", Role::Admin);
        assert_eq!(update(&app, &admin, &q.id, edit.clone()).unwrap_err().status_code(), 403);
        assert_eq!(update(&app, &alice, &q.id, edit).unwrap().title, "Edited question");
    }

    #[test]
    fn get_counts_views_and_reports_vote() {
        let app = App::in_memory(Config::default());
        let alice = Actor::new("alice", Role::User);
        let q = ask(&app, &alice, "Lifetimes question");

        votes::cast_vote::<Question, _>(&app, &q.id, VoteType::Downvote, &alice).unwrap();
        let detail = get(&app, Some(&alice), &q.id).unwrap();
        assert_eq!(detail.question.view_count, 1);
        assert_eq!(detail.user_vote, Some(VoteType::Downvote));

        let anonymous = get(&app, None, &q.id).unwrap();
        assert_eq!(anonymous.question.view_count, 2);
        assert_eq!(anonymous.user_vote, None);

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["downvoteCount"], 1);
        assert_eq!(json["userVote"], "DOWNVOTE");
    }

    #[test]
    fn list_sorts_and_filters() {
        let app = App::in_memory(Config::default());
        let alice = Actor::new("alice", Role::User);
        let bob = Actor::new("bob", Role::User);
        let low = ask(&app, &alice, "First question");
        let high = ask(&app, &bob, "Second question");
        votes::cast_vote::<Question, _>(&app, &high.id, VoteType::Upvote, &alice).unwrap();
        votes::cast_vote::<Question, _>(&app, &low.id, VoteType::Downvote, &bob).unwrap();

        let by_votes = QuestionFilter {
            sort: QuestionSort::Votes,
            ..QuestionFilter::default()
        };
        let page = list(&app, &by_votes, PageRequest::default()).unwrap();
        assert_eq!(page.items[0].id, high.id);

        let by_author = QuestionFilter {
            author_id: Some("alice".into()),
            ..QuestionFilter::default()
        };
        assert_eq!(list(&app, &by_author, PageRequest::default()).unwrap().items.len(), 1);

        let search = QuestionFilter {
            search: Some("SECOND".into()),
            tag: Some("Rust".into()),
            unanswered: true,
            ..QuestionFilter::default()
        };
        assert_eq!(list(&app, &search, PageRequest::default()).unwrap().items[0].id, high.id);
    }

    #[test]
    fn sort_parsing() {
        assert_eq!("Votes".parse::<QuestionSort>().unwrap(), QuestionSort::Votes);
        assert!("random".parse::<QuestionSort>().is_err());
    }
}
