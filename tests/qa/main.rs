//! Q&A integration tests, driven through command dispatch.

mod support;
mod votes;
mod lifecycle;
mod listing;
