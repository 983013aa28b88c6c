//! Handlers: question.list, question.create, question.get, question.update,
//! question.delete, question.vote, question.vote_status

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::questions::{self, QuestionFilter};

    pub const COMMAND: &str = "question.list";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let filter = QuestionFilter {
            search: ctx.param("search").map(str::to_string),
            tag: ctx.param("tag").map(str::to_string),
            author_id: ctx.param("authorId").map(str::to_string),
            unanswered: ctx.param_as("unanswered")?.unwrap_or(false),
            sort: ctx.param_as("sort")?.unwrap_or_default(),
        };
        let page = questions::list(ctx.app(), &filter, ctx.page_request()?)?;
        ApiResponse::page(&page)
    }
}

pub mod create {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::questions::{self, CreateQuestion};

    pub const COMMAND: &str = "question.create";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        ctx.has_fields(&["title", "content"])
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<CreateQuestion>()?;
        ApiResponse::created("question created", &questions::create(ctx.app(), &actor, input)?)
    }
}

pub mod get {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::questions;

    pub const COMMAND: &str = "question.get";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let viewer = ctx.optional_actor();
        ApiResponse::ok(&questions::get(ctx.app(), viewer.as_ref(), ctx.require_param("id")?)?)
    }
}

pub mod update {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::questions::{self, UpdateQuestion};

    pub const COMMAND: &str = "question.update";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<UpdateQuestion>()?;
        let question = questions::update(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::ok_with_message("question updated", &question)
    }
}

pub mod delete {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::questions;

    pub const COMMAND: &str = "question.delete";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        questions::delete(ctx.app(), &actor, ctx.require_param("id")?)?;
        Ok(ApiResponse::message("question deleted"))
    }
}

pub mod vote {
    use crate::api::handlers::{has_id, Ctx};
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::entities::Question;
    use crate::model::ModelStore;
    use crate::services::votes::{self, VoteInput};

    pub const COMMAND: &str = "question.vote";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        has_id(ctx) && ctx.has_field("voteType")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let vote_type = ctx.input::<VoteInput>()?.parse()?;
        let outcome = votes::cast_vote::<Question, S>(ctx.app(), ctx.require_param("id")?, vote_type, &actor)?;
        ApiResponse::ok_with_message(outcome.action.message(), &outcome)
    }
}

pub mod vote_status {
    use serde_json::json;

    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::entities::Question;
    use crate::model::ModelStore;
    use crate::services::votes;

    pub const COMMAND: &str = "question.vote_status";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let vote = votes::vote_status::<Question, S>(ctx.app(), ctx.require_param("id")?, &actor)?;
        ApiResponse::ok(&json!({ "userVote": vote }))
    }
}
