//! Command handlers, one module per resource.
//!
//! Every handler follows the same convention:
//!
//! - `COMMAND`: the command name the route table points at
//! - `guard`: cheap precondition on the input (required fields, route params)
//! - `handle`: decodes input, calls into [`services`](crate::services), wraps the result

pub mod admin;
pub mod answers;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod posts;
pub mod questions;
pub mod system;
pub mod tags;
pub mod users;

use crate::api::{Context, Service};
use crate::app::App;
use crate::model::ModelStore;

pub type Ctx<'a, S> = Context<'a, App<S>>;

/// A service with every command of the platform registered.
pub fn service<S: ModelStore + 'static>(app: App<S>) -> Service<App<S>> {
    crate::register_handlers!(
        Service::new(app),
        system::health,
        auth::register,
        auth::login,
        auth::me,
        users::list,
        users::get,
        users::update,
        users::delete,
        categories::list,
        categories::create,
        categories::update,
        categories::delete,
        tags::list,
        tags::create,
        posts::list,
        posts::create,
        posts::get,
        posts::update,
        posts::delete,
        comments::list,
        comments::create,
        comments::delete,
        questions::list,
        questions::create,
        questions::get,
        questions::update,
        questions::delete,
        questions::vote,
        questions::vote_status,
        answers::list,
        answers::create,
        answers::update,
        answers::delete,
        answers::vote,
        answers::vote_status,
        answers::accept,
        admin::stats,
        admin::activity,
        admin::reconcile_votes,
    )
}

/// Guard for commands addressed at one record.
pub fn has_id<R>(ctx: &Context<R>) -> bool {
    ctx.param("id").is_some_and(|id| !id.is_empty())
}

/// Guard for commands with no required input.
pub fn always<R>(_ctx: &Context<R>) -> bool {
    true
}
