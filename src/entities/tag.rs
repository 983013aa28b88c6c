use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::slug_or_id;
use crate::Model;

/// A label shared by posts and questions; referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "tags")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            slug: slug_or_id(name, &id),
            id,
            name: name.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}
