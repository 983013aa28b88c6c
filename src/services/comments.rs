//! Comments on posts. The post's `comment_count` moves in the same batch as
//! the comment itself.

use serde::Deserialize;
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Comment, Post};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::pagination::{paginate, Page, PageRequest};
use crate::policy::{can_mutate, ensure_can_mutate, Actor};

use super::{data, load};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"))]
    pub content: String,
}

/// Comments of a published (or otherwise visible) post, oldest first.
pub fn list<S: ModelStore>(
    app: &App<S>,
    viewer: Option<&Actor>,
    post_id: &str,
    request: PageRequest,
) -> Result<Page<Comment>, HandlerError> {
    let post = load::<Post, _>(app.store(), "post", post_id)?.into_inner();
    let visible = post.is_published()
        || viewer.map_or(false, |a| a.is_admin() || a.id == post.author_id);
    if !visible {
        return Err(HandlerError::not_found("post", post_id));
    }

    let mut comments = data(app.store().models::<Comment>().find(&|c| c.post_id == post_id)?);
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(paginate(comments, request))
}

pub fn create<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    post_id: &str,
    input: CreateComment,
) -> Result<Comment, HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<Post>(post_id)])?;
    let mut post = load::<Post, _>(app.store(), "post", post_id)?;
    if !post.data.is_published() && !can_mutate(actor, &post.data) {
        return Err(HandlerError::not_found("post", post_id));
    }

    let comment = Comment::new(post_id, &actor.id, &input.content);
    post.data.comment_count = post.data.comment_count.saturating_add(1);
    app.store()
        .batch()
        .insert(&comment)
        .update(&post)
        .insert(&ActivityLog::new(&actor.id, "comment.create", "comment", &comment.id))
        .commit()?;
    Ok(comment)
}

pub fn delete<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<(), HandlerError> {
    let comment = load::<Comment, _>(app.store(), "comment", id)?;
    ensure_can_mutate(actor, &comment.data)?;

    let post_id = comment.data.post_id.clone();
    let _guard = app.lock(&[StoreKey::of::<Post>(post_id.as_str()), StoreKey::of::<Comment>(id)])?;
    // Re-read under the lock.
    let comment = load::<Comment, _>(app.store(), "comment", id)?;

    let mut batch = app.store().batch().delete(&comment);
    if let Some(mut post) = app.store().models::<Post>().get(&post_id)? {
        post.data.comment_count = post.data.comment_count.saturating_sub(1);
        batch = batch.update(&post);
    }
    batch
        .insert(&ActivityLog::new(&actor.id, "comment.delete", "comment", id))
        .commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entities::{PostStatus, Role};

    fn published_post(app: &App) -> Post {
        let post = Post::new("alice", "Title", "Body", None, vec![], PostStatus::Published);
        app.store().models::<Post>().insert(&post).unwrap();
        post
    }

    fn comment_count(app: &App, post_id: &str) -> u32 {
        app.store().models::<Post>().get(post_id).unwrap().unwrap().data.comment_count
    }

    #[test]
    fn create_and_delete_track_comment_count() {
        let app = App::in_memory(Config::default());
        let post = published_post(&app);
        let bob = Actor::new("bob", Role::User);

        let first = create(&app, &bob, &post.id, CreateComment { content: "first".into() }).unwrap();
        create(&app, &bob, &post.id, CreateComment { content: "second".into() }).unwrap();
        assert_eq!(comment_count(&app, &post.id), 2);

        let listed = list(&app, None, &post.id, PageRequest::default()).unwrap();
        assert_eq!(listed.items[0].content, "first");

        let carol = Actor::new("carol", Role::User);
        assert_eq!(delete(&app, &carol, &first.id).unwrap_err().status_code(), 403);
        delete(&app, &bob, &first.id).unwrap();
        assert_eq!(comment_count(&app, &post.id), 1);
    }

    #[test]
    fn admin_can_remove_any_comment() {
        let app = App::in_memory(Config::default());
        let post = published_post(&app);
        let comment = create(&app, &Actor::new("bob", Role::User), &post.id, CreateComment {
            content: "spam".into(),
        })
        .unwrap();
        delete(&app, &Actor::new("root", Role::Admin), &comment.id).unwrap();
        assert_eq!(comment_count(&app, &post.id), 0);
    }

    #[test]
    fn missing_post() {
        let app = App::in_memory(Config::default());
        let err = create(&app, &Actor::new("bob", Role::User), "nope", CreateComment {
            content: "hi".into(),
        })
        .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
