//! Vote accounting for questions and answers.
//!
//! A vote row and the counters on its target are one consistency unit.
//! Every change runs with the target's record lock held and is committed as
//! a single batch (vote write, counter write, activity entry) with the
//! target's version checked, so the counters always equal the number of
//! vote rows of each type.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Answer, Question, Votable, Vote, VoteCounts, VoteType};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::policy::{ensure_admin, Actor};

use super::load;

/// Body of a vote request: `{ "voteType": "UPVOTE" }`. Case-insensitive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInput {
    pub vote_type: String,
}

impl VoteInput {
    pub fn parse(&self) -> Result<VoteType, HandlerError> {
        self.vote_type.parse().map_err(HandlerError::Validation)
    }
}

/// What a cast did to the caller's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteAction {
    Cast,
    Removed,
    Changed,
}

impl VoteAction {
    pub fn message(&self) -> &'static str {
        match self {
            VoteAction::Cast => "vote cast",
            VoteAction::Removed => "vote removed",
            VoteAction::Changed => "vote changed",
        }
    }

    fn activity(&self) -> &'static str {
        match self {
            VoteAction::Cast => "vote.cast",
            VoteAction::Removed => "vote.remove",
            VoteAction::Changed => "vote.change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub action: VoteAction,
    #[serde(flatten)]
    pub counts: VoteCounts,
    /// The caller's vote after this call.
    pub user_vote: Option<VoteType>,
}

/// Cast, retract or flip `actor`'s vote on target `target_id`.
///
/// Voting the same way twice removes the vote; voting the other way flips
/// it in place.
#[instrument(skip(app, actor), fields(actor = %actor.id))]
pub fn cast_vote<T: Votable, S: ModelStore>(
    app: &App<S>,
    target_id: &str,
    vote_type: VoteType,
    actor: &Actor,
) -> Result<VoteOutcome, HandlerError> {
    let _guard = app.lock(&[StoreKey::of::<T>(target_id)])?;
    let mut target = load::<T, _>(app.store(), T::RESOURCE, target_id)?;

    let vote_id = Vote::key_for(T::TARGET, target_id, &actor.id);
    let existing = app.store().models::<Vote>().get(&vote_id)?;

    let batch = app.store().batch();
    let (action, batch, user_vote) = match existing {
        None => {
            let vote = Vote::new(T::TARGET, target_id, &actor.id, vote_type);
            target.data.votes_mut().record(vote_type);
            (VoteAction::Cast, batch.insert(&vote), Some(vote_type))
        }
        Some(vote) if vote.data.vote_type == vote_type => {
            target.data.votes_mut().retract(vote_type);
            (VoteAction::Removed, batch.delete(&vote), None)
        }
        Some(mut vote) => {
            target.data.votes_mut().switch(vote.data.vote_type, vote_type);
            vote.data.vote_type = vote_type;
            vote.data.updated_at = Utc::now();
            (VoteAction::Changed, batch.update(&vote), Some(vote_type))
        }
    };

    batch
        .update(&target)
        .insert(&ActivityLog::new(&actor.id, action.activity(), T::RESOURCE, target_id))
        .commit()?;

    let counts = *target.data.votes();
    info!(
        target = T::TARGET.as_str(),
        action = action.message(),
        up = counts.upvote_count,
        down = counts.downvote_count,
        "vote recorded"
    );
    Ok(VoteOutcome {
        action,
        counts,
        user_vote,
    })
}

/// The caller's current vote on a target, if any.
pub fn vote_status<T: Votable, S: ModelStore>(
    app: &App<S>,
    target_id: &str,
    actor: &Actor,
) -> Result<Option<VoteType>, HandlerError> {
    load::<T, _>(app.store(), T::RESOURCE, target_id)?;
    current_vote(app, T::TARGET, target_id, &actor.id)
}

pub(crate) fn current_vote<S: ModelStore>(
    app: &App<S>,
    target: crate::entities::TargetType,
    target_id: &str,
    actor_id: &str,
) -> Result<Option<VoteType>, HandlerError> {
    Ok(app
        .store()
        .models::<Vote>()
        .get(&Vote::key_for(target, target_id, actor_id))?
        .map(|v| v.data.vote_type))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub targets_checked: usize,
    pub targets_corrected: usize,
}

/// Recompute every question's and answer's counters from the vote rows.
///
/// Counters cannot drift through [`cast_vote`]; this repairs data imported
/// or edited from outside.
pub fn reconcile_counters<S: ModelStore>(app: &App<S>, actor: &Actor) -> Result<ReconcileReport, HandlerError> {
    ensure_admin(actor)?;
    let mut report = ReconcileReport::default();
    reconcile::<Question, S>(app, &mut report)?;
    reconcile::<Answer, S>(app, &mut report)?;
    info!(
        checked = report.targets_checked,
        corrected = report.targets_corrected,
        "vote counters reconciled"
    );
    Ok(report)
}

fn reconcile<T: Votable, S: ModelStore>(app: &App<S>, report: &mut ReconcileReport) -> Result<(), HandlerError> {
    let ids: Vec<String> = app
        .store()
        .models::<T>()
        .all()?
        .into_iter()
        .map(|t| t.data.id().to_string())
        .collect();

    for id in ids {
        let _guard = app.lock(&[StoreKey::of::<T>(id.as_str())])?;
        let Some(mut target) = app.store().models::<T>().get(&id)? else {
            continue;
        };
        report.targets_checked += 1;

        let mut tally: HashMap<VoteType, u32> = HashMap::new();
        for vote in app
            .store()
            .models::<Vote>()
            .find(&|v| v.target_type == T::TARGET && v.target_id == id)?
        {
            *tally.entry(vote.data.vote_type).or_default() += 1;
        }
        let actual = VoteCounts::new(
            tally.get(&VoteType::Upvote).copied().unwrap_or(0),
            tally.get(&VoteType::Downvote).copied().unwrap_or(0),
        );

        if *target.data.votes() != actual {
            warn!(
                target = T::TARGET.as_str(),
                id = %id,
                stored_up = target.data.votes().upvote_count,
                stored_down = target.data.votes().downvote_count,
                actual_up = actual.upvote_count,
                actual_down = actual.downvote_count,
                "vote counters drifted"
            );
            *target.data.votes_mut() = actual;
            app.store().models::<T>().update(&target)?;
            report.targets_corrected += 1;
        }
    }
    Ok(())
}
