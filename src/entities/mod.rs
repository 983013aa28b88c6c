//! Persisted entities of the platform.

mod activity;
mod answer;
mod category;
mod comment;
mod post;
mod question;
mod tag;
mod user;
mod vote;

pub use activity::ActivityLog;
pub use answer::Answer;
pub use category::Category;
pub use comment::Comment;
pub use post::{Post, PostStatus};
pub use question::Question;
pub use tag::Tag;
pub use user::{normalize_email, Role, User, UserView};
pub use vote::{TargetType, Votable, Vote, VoteCounts, VoteType};
