//! Blog posts.

use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Category, Comment, Post, PostStatus};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::pagination::{paginate, Page, PageRequest};
use crate::policy::{ensure_can_mutate, Actor};
use crate::text::{contains_ci, eq_ci, normalize_tags};

use super::{data, load, newest_first, tags};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub content: String,
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: Option<String>,
    /// `Some("")` clears the category.
    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub tag: Option<String>,
    pub author_id: Option<String>,
    pub status: Option<PostStatus>,
}

/// Published posts are public; drafts are visible to their author and admins.
fn visible_to(post: &Post, viewer: Option<&Actor>) -> bool {
    post.is_published()
        || viewer.map_or(false, |actor| actor.is_admin() || actor.id == post.author_id)
}

/// Callers hold the category's lock from this check until their commit, so a
/// concurrent category delete cannot leave the post pointing at nothing.
fn check_category<S: ModelStore>(app: &App<S>, category_id: &str) -> Result<(), HandlerError> {
    load::<Category, _>(app.store(), "category", category_id).map(|_| ())
}

pub fn create<S: ModelStore>(app: &App<S>, actor: &Actor, input: CreatePost) -> Result<Post, HandlerError> {
    let category_id = input.category_id.filter(|c| !c.is_empty());
    let keys: Vec<StoreKey> = category_id.iter().map(|c| StoreKey::of::<Category>(c.as_str())).collect();
    let _guard = app.lock(&keys)?;
    if let Some(category_id) = &category_id {
        check_category(app, category_id)?;
    }
    let tag_names = normalize_tags(&input.tags);
    tags::ensure(app, &tag_names)?;

    let post = Post::new(
        &actor.id,
        &input.title,
        &input.content,
        category_id,
        tag_names,
        input.status.unwrap_or_default(),
    );
    app.store()
        .batch()
        .insert(&post)
        .insert(&ActivityLog::new(&actor.id, "post.create", "post", &post.id))
        .commit()?;
    Ok(post)
}

pub fn list<S: ModelStore>(
    app: &App<S>,
    viewer: Option<&Actor>,
    filter: &PostFilter,
    request: PageRequest,
) -> Result<Page<Post>, HandlerError> {
    let mut posts = data(app.store().models::<Post>().find(&|p| {
        visible_to(p, viewer)
            && filter
                .search
                .as_deref()
                .map_or(true, |q| contains_ci(&p.title, q) || contains_ci(&p.content, q))
            && filter
                .category_id
                .as_deref()
                .map_or(true, |c| p.category_id.as_deref() == Some(c))
            && filter
                .tag
                .as_deref()
                .map_or(true, |t| p.tags.iter().any(|pt| eq_ci(pt, t)))
            && filter.author_id.as_deref().map_or(true, |a| p.author_id == a)
            && filter.status.map_or(true, |s| p.status == s)
    })?);
    posts.sort_by(|a, b| newest_first((&a.created_at, &a.id), (&b.created_at, &b.id)));
    Ok(paginate(posts, request))
}

/// Fetch a post and count the view.
pub fn get<S: ModelStore>(app: &App<S>, viewer: Option<&Actor>, id: &str) -> Result<Post, HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<Post>(id)])?;
    let mut post = load::<Post, _>(app.store(), "post", id)?;
    if !visible_to(&post.data, viewer) {
        return Err(HandlerError::not_found("post", id));
    }
    post.data.view_count = post.data.view_count.saturating_add(1);
    Ok(app.store().models::<Post>().update(&post)?.into_inner())
}

pub fn update<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    id: &str,
    input: UpdatePost,
) -> Result<Post, HandlerError> {
    let mut keys = vec![StoreKey::of::<Post>(id)];
    if let Some(category_id) = input.category_id.as_deref().filter(|c| !c.is_empty()) {
        keys.push(StoreKey::of::<Category>(category_id));
    }
    let _guard = app.lock(&keys)?;
    let mut post = load::<Post, _>(app.store(), "post", id)?;
    ensure_can_mutate(actor, &post.data)?;

    if let Some(title) = &input.title {
        post.data.set_title(title);
    }
    if let Some(content) = &input.content {
        post.data.set_content(content);
    }
    if let Some(category_id) = input.category_id {
        if category_id.is_empty() {
            post.data.category_id = None;
        } else {
            check_category(app, &category_id)?;
            post.data.category_id = Some(category_id);
        }
    }
    if let Some(tag_list) = &input.tags {
        let tag_names = normalize_tags(tag_list);
        tags::ensure(app, &tag_names)?;
        post.data.tags = tag_names;
    }
    if let Some(status) = input.status {
        post.data.status = status;
    }
    post.data.updated_at = Utc::now();

    app.store()
        .batch()
        .update(&post)
        .insert(&ActivityLog::new(&actor.id, "post.update", "post", id))
        .commit()?;
    Ok(post.into_inner())
}

/// Delete a post together with its comments.
pub fn delete<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<(), HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<Post>(id)])?;
    let post = load::<Post, _>(app.store(), "post", id)?;
    ensure_can_mutate(actor, &post.data)?;

    let comments = app.store().models::<Comment>().find(&|c| c.post_id == id)?;
    app.store()
        .batch()
        .delete(&post)
        .delete_all(&comments)
        .insert(&ActivityLog::new(&actor.id, "post.delete", "post", id))
        .commit()?;
    Ok(())
}
