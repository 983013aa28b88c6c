//! Handlers: comment.list, comment.create, comment.delete

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::comments;

    pub const COMMAND: &str = "comment.list";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let viewer = ctx.optional_actor();
        let page = comments::list(
            ctx.app(),
            viewer.as_ref(),
            ctx.require_param("id")?,
            ctx.page_request()?,
        )?;
        ApiResponse::page(&page)
    }
}

pub mod create {
    use crate::api::handlers::{has_id, Ctx};
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::comments::{self, CreateComment};

    pub const COMMAND: &str = "comment.create";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        has_id(ctx) && ctx.has_field("content")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<CreateComment>()?;
        let comment = comments::create(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::created("comment added", &comment)
    }
}

pub mod delete {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::comments;

    pub const COMMAND: &str = "comment.delete";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        comments::delete(ctx.app(), &actor, ctx.require_param("id")?)?;
        Ok(ApiResponse::message("comment deleted"))
    }
}
