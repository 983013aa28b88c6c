use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::policy::Owned;
use crate::Model;

/// An actor's opinion on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "UPVOTE",
            VoteType::Downvote => "DOWNVOTE",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UPVOTE" => Ok(VoteType::Upvote),
            "DOWNVOTE" => Ok(VoteType::Downvote),
            other => Err(format!("unknown vote type: {}", other)),
        }
    }
}

/// Which collection a vote's target lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Question,
    Answer,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Question => "question",
            TargetType::Answer => "answer",
        }
    }
}

/// One actor's current vote on one target.
///
/// The id is derived from (target_type, target_id, actor_id), so the store's
/// insert-if-absent is what guarantees at most one vote per tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
#[model(collection = "votes")]
pub struct Vote {
    pub id: String,
    pub actor_id: String,
    pub target_id: String,
    pub target_type: TargetType,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn key_for(target_type: TargetType, target_id: &str, actor_id: &str) -> String {
        format!("{}:{}:{}", target_type.as_str(), target_id, actor_id)
    }

    pub fn new(target_type: TargetType, target_id: &str, actor_id: &str, vote_type: VoteType) -> Self {
        let now = Utc::now();
        Self {
            id: Self::key_for(target_type, target_id, actor_id),
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            target_type,
            vote_type,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Denormalized vote counters stored on a target.
///
/// Serialized with a derived `netVotes` field; it is ignored on the way back in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounts {
    pub upvote_count: u32,
    pub downvote_count: u32,
}

impl VoteCounts {
    pub fn new(upvote_count: u32, downvote_count: u32) -> Self {
        Self {
            upvote_count,
            downvote_count,
        }
    }

    pub fn net_votes(&self) -> i64 {
        i64::from(self.upvote_count) - i64::from(self.downvote_count)
    }

    fn counter_mut(&mut self, vote_type: VoteType) -> &mut u32 {
        match vote_type {
            VoteType::Upvote => &mut self.upvote_count,
            VoteType::Downvote => &mut self.downvote_count,
        }
    }

    /// A new vote of `vote_type` was cast.
    pub fn record(&mut self, vote_type: VoteType) {
        let counter = self.counter_mut(vote_type);
        *counter = counter.saturating_add(1);
    }

    /// A vote of `vote_type` was withdrawn. Floors at 0.
    pub fn retract(&mut self, vote_type: VoteType) {
        let counter = self.counter_mut(vote_type);
        *counter = counter.saturating_sub(1);
    }

    /// An existing vote flipped from `from` to `to`.
    pub fn switch(&mut self, from: VoteType, to: VoteType) {
        if from != to {
            self.retract(from);
            self.record(to);
        }
    }
}

impl Serialize for VoteCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("VoteCounts", 3)?;
        state.serialize_field("upvoteCount", &self.upvote_count)?;
        state.serialize_field("downvoteCount", &self.downvote_count)?;
        state.serialize_field("netVotes", &self.net_votes())?;
        state.end()
    }
}

/// A model that votes can be cast against.
pub trait Votable: Model + Owned {
    const TARGET: TargetType;

    fn votes(&self) -> &VoteCounts;

    fn votes_mut(&mut self) -> &mut VoteCounts;
}
