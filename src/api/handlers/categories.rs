//! Handlers: category.list, category.create, category.update, category.delete

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::categories;

    pub const COMMAND: &str = "category.list";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        ApiResponse::ok(&categories::list(ctx.app())?)
    }
}

pub mod create {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::categories::{self, CreateCategory};

    pub const COMMAND: &str = "category.create";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        ctx.has_field("name")
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<CreateCategory>()?;
        ApiResponse::created("category created", &categories::create(ctx.app(), &actor, input)?)
    }
}

pub mod update {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::categories::{self, UpdateCategory};

    pub const COMMAND: &str = "category.update";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<UpdateCategory>()?;
        let category = categories::update(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::ok_with_message("category updated", &category)
    }
}

pub mod delete {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::categories;

    pub const COMMAND: &str = "category.delete";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        categories::delete(ctx.app(), &actor, ctx.require_param("id")?)?;
        Ok(ApiResponse::message("category deleted"))
    }
}
