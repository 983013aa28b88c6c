//! Admin dashboard counters.

use std::thread;

use serde::Serialize;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{Answer, Category, Comment, Post, Question, Tag, User, Vote};
use crate::model::{Model, ModelError, ModelStore, ModelsExt};
use crate::policy::{ensure_admin, Actor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_posts: usize,
    pub published_posts: usize,
    pub total_questions: usize,
    pub unanswered_questions: usize,
    pub total_answers: usize,
    pub total_comments: usize,
    pub total_votes: usize,
    pub total_categories: usize,
    pub total_tags: usize,
}

fn count<M: Model, S: ModelStore>(app: &App<S>, predicate: fn(&M) -> bool) -> Result<usize, ModelError> {
    app.store().models::<M>().count(&predicate)
}

/// Run every count on its own scoped thread and join them.
pub fn dashboard<S: ModelStore>(app: &App<S>, actor: &Actor) -> Result<DashboardStats, HandlerError> {
    ensure_admin(actor)?;

    let stats = thread::scope(|scope| {
        let users = scope.spawn(|| count::<User, S>(app, |_| true));
        let active_users = scope.spawn(|| count::<User, S>(app, |u| u.is_active));
        let posts = scope.spawn(|| count::<Post, S>(app, |_| true));
        let published = scope.spawn(|| count::<Post, S>(app, Post::is_published));
        let questions = scope.spawn(|| count::<Question, S>(app, |_| true));
        let unanswered = scope.spawn(|| count::<Question, S>(app, |q| q.answer_count == 0));
        let answers = scope.spawn(|| count::<Answer, S>(app, |_| true));
        let comments = scope.spawn(|| count::<Comment, S>(app, |_| true));
        let votes = scope.spawn(|| count::<Vote, S>(app, |_| true));
        let categories = scope.spawn(|| count::<Category, S>(app, |_| true));
        let tags = scope.spawn(|| count::<Tag, S>(app, |_| true));

        let join = |handle: thread::ScopedJoinHandle<'_, Result<usize, ModelError>>| {
            handle
                .join()
                .map_err(|_| ModelError::Storage("statistics worker panicked".into()))?
        };

        Ok::<_, ModelError>(DashboardStats {
            total_users: join(users)?,
            active_users: join(active_users)?,
            total_posts: join(posts)?,
            published_posts: join(published)?,
            total_questions: join(questions)?,
            unanswered_questions: join(unanswered)?,
            total_answers: join(answers)?,
            total_comments: join(comments)?,
            total_votes: join(votes)?,
            total_categories: join(categories)?,
            total_tags: join(tags)?,
        })
    })?;
    Ok(stats)
}
