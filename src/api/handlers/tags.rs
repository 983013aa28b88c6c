//! Handlers: tag.list, tag.create

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::tags;

    pub const COMMAND: &str = "tag.list";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        ApiResponse::ok(&tags::list(ctx.app())?)
    }
}

pub mod create {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::tags::{self, CreateTag};

    pub const COMMAND: &str = "tag.create";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        ctx.has_field("name")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<CreateTag>()?;
        ApiResponse::created("tag created", &tags::create(ctx.app(), &actor, input)?)
    }
}
