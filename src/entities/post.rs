use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::Owned;
use crate::text::{excerpt, slug_or_id};
use crate::Model;

const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLISHED" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "posts")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub view_count: u64,
    /// Denormalized count of this post's comments.
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: &str,
        title: &str,
        content: &str,
        category_id: Option<String>,
        tags: Vec<String>,
        status: PostStatus,
    ) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        Self {
            slug: slug_or_id(title, &id),
            id,
            title: title.trim().to_string(),
            content: content.to_string(),
            excerpt: excerpt(content, EXCERPT_CHARS),
            author_id: author_id.to_string(),
            category_id,
            tags,
            status,
            view_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.trim().to_string();
        self.slug = slug_or_id(title, &self.id);
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.excerpt = excerpt(content, EXCERPT_CHARS);
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

impl Owned for Post {
    const RESOURCE: &'static str = "post";
    const ADMIN_MODERATED: bool = true;

    fn owner_id(&self) -> &str {
        &self.author_id
    }
}
