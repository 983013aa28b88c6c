//! Handlers: answer.list, answer.create, answer.update, answer.delete,
//! answer.vote, answer.vote_status, answer.accept

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::answers;

    pub const COMMAND: &str = "answer.list";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let page = answers::list(ctx.app(), ctx.require_param("id")?, ctx.page_request()?)?;
        ApiResponse::page(&page)
    }
}

pub mod create {
    use crate::api::handlers::{has_id, Ctx};
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::answers::{self, CreateAnswer};

    pub const COMMAND: &str = "answer.create";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        has_id(ctx) && ctx.has_field("content")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<CreateAnswer>()?;
        let answer = answers::create(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::created("answer posted", &answer)
    }
}

pub mod update {
    use crate::api::handlers::{has_id, Ctx};
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::answers::{self, UpdateAnswer};

    pub const COMMAND: &str = "answer.update";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        has_id(ctx) && ctx.has_field("content")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<UpdateAnswer>()?;
        let answer = answers::update(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::ok_with_message("answer updated", &answer)
    }
}

pub mod delete {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::answers;

    pub const COMMAND: &str = "answer.delete";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        answers::delete(ctx.app(), &actor, ctx.require_param("id")?)?;
        Ok(ApiResponse::message("answer deleted"))
    }
}

pub mod vote {
    use crate::api::handlers::{has_id, Ctx};
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::entities::Answer;
    use crate::model::ModelStore;
    use crate::services::votes::{self, VoteInput};

    pub const COMMAND: &str = "answer.vote";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        has_id(ctx) && ctx.has_field("voteType")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let vote_type = ctx.input::<VoteInput>()?.parse()?;
        let outcome = votes::cast_vote::<Answer, S>(ctx.app(), ctx.require_param("id")?, vote_type, &actor)?;
        ApiResponse::ok_with_message(outcome.action.message(), &outcome)
    }
}

pub mod vote_status {
    use serde_json::json;

    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::entities::Answer;
    use crate::model::ModelStore;
    use crate::services::votes;

    pub const COMMAND: &str = "answer.vote_status";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let vote = votes::vote_status::<Answer, S>(ctx.app(), ctx.require_param("id")?, &actor)?;
        ApiResponse::ok(&json!({ "userVote": vote }))
    }
}

pub mod accept {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::answers;

    pub const COMMAND: &str = "answer.accept";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let answer = answers::accept(ctx.app(), &actor, ctx.require_param("id")?)?;
        ApiResponse::ok_with_message("answer accepted", &answer)
    }
}
