use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vote::{TargetType, Votable, VoteCounts};
use crate::policy::Owned;
use crate::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "questions")]
pub struct Question {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author_id: String,
    #[serde(flatten)]
    pub votes: VoteCounts,
    /// Denormalized count of this question's answers.
    pub answer_count: u32,
    pub view_count: u64,
    #[serde(default)]
    pub accepted_answer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(author_id: &str, title: &str, content: &str, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            content: content.to_string(),
            tags,
            author_id: author_id.to_string(),
            votes: VoteCounts::default(),
            answer_count: 0,
            view_count: 0,
            accepted_answer_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Question {
    const RESOURCE: &'static str = "question";

    fn owner_id(&self) -> &str {
        &self.author_id
    }
}

impl Votable for Question {
    const TARGET: TargetType = TargetType::Question;

    fn votes(&self) -> &VoteCounts {
        &self.votes
    }

    fn votes_mut(&mut self) -> &mut VoteCounts {
        &mut self.votes
    }
}
