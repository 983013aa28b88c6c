//! Handlers: user.list, user.get, user.update, user.delete (admin only)

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::users::{self, UserFilter};

    pub const COMMAND: &str = "user.list";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let filter = UserFilter {
            search: ctx.param("search").map(str::to_string),
            role: ctx.param_as("role")?,
            is_active: ctx.param_as("isActive")?,
        };
        let page = users::list(ctx.app(), &actor, &filter, ctx.page_request()?)?;
        ApiResponse::page(&page)
    }
}

pub mod get {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::policy::ensure_admin;
    use crate::services::users;

    pub const COMMAND: &str = "user.get";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        ensure_admin(&ctx.actor()?)?;
        let user = users::get(ctx.app(), ctx.require_param("id")?)?;
        ApiResponse::ok(&user.view())
    }
}

pub mod update {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::users::{self, UpdateUser};

    pub const COMMAND: &str = "user.update";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<UpdateUser>()?;
        let user = users::update(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::ok_with_message("user updated", &user.view())
    }
}

pub mod delete {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::users;

    pub const COMMAND: &str = "user.delete";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        users::delete(ctx.app(), &actor, ctx.require_param("id")?)?;
        Ok(ApiResponse::message("user deleted"))
    }
}
