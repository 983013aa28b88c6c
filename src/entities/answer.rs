use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vote::{TargetType, Votable, VoteCounts};
use crate::policy::Owned;
use crate::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "answers")]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub author_id: String,
    pub content: String,
    #[serde(flatten)]
    pub votes: VoteCounts,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: &str, author_id: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            question_id: question_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            votes: VoteCounts::default(),
            is_accepted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Owned for Answer {
    const RESOURCE: &'static str = "answer";

    fn owner_id(&self) -> &str {
        &self.author_id
    }
}

impl Votable for Answer {
    const TARGET: TargetType = TargetType::Answer;

    fn votes(&self) -> &VoteCounts {
        &self.votes
    }

    fn votes_mut(&mut self) -> &mut VoteCounts {
        &mut self.votes
    }
}
