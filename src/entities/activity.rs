use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Model;

/// Audit record of one mutation, written in the same batch as the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "activity_logs")]
pub struct ActivityLog {
    pub id: String,
    pub user_id: String,
    /// Dotted verb such as `question.create` or `vote.cast`.
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(user_id: &str, action: &str, resource_type: &str, resource_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
