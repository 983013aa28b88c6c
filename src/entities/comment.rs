use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::Owned;
use crate::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "comments")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: &str, author_id: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            content: content.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Comment {
    const RESOURCE: &'static str = "comment";
    const ADMIN_MODERATED: bool = true;

    fn owner_id(&self) -> &str {
        &self.author_id
    }
}
