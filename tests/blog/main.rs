//! Blog integration tests: posts, comments, categories and administration.

mod support;
mod posts;
mod admin;
