//! Handlers: post.list, post.create, post.get, post.update, post.delete

pub mod list {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::posts::{self, PostFilter};

    pub const COMMAND: &str = "post.list";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let viewer = ctx.optional_actor();
        let filter = PostFilter {
            search: ctx.param("search").map(str::to_string),
            category_id: ctx.param("categoryId").map(str::to_string),
            tag: ctx.param("tag").map(str::to_string),
            author_id: ctx.param("authorId").map(str::to_string),
            status: ctx.param_as("status")?,
        };
        let page = posts::list(ctx.app(), viewer.as_ref(), &filter, ctx.page_request()?)?;
        ApiResponse::page(&page)
    }
}

pub mod create {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::posts::{self, CreatePost};

    pub const COMMAND: &str = "post.create";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        ctx.has_fields(&["title", "content"])
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<CreatePost>()?;
        ApiResponse::created("post created", &posts::create(ctx.app(), &actor, input)?)
    }
}

pub mod get {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::posts;

    pub const COMMAND: &str = "post.get";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let viewer = ctx.optional_actor();
        ApiResponse::ok(&posts::get(ctx.app(), viewer.as_ref(), ctx.require_param("id")?)?)
    }
}

pub mod update {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::posts::{self, UpdatePost};

    pub const COMMAND: &str = "post.update";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let input = ctx.validated_input::<UpdatePost>()?;
        let post = posts::update(ctx.app(), &actor, ctx.require_param("id")?, input)?;
        ApiResponse::ok_with_message("post updated", &post)
    }
}

pub mod delete {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::posts;

    pub const COMMAND: &str = "post.delete";
    pub use crate::api::handlers::has_id as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        posts::delete(ctx.app(), &actor, ctx.require_param("id")?)?;
        Ok(ApiResponse::message("post deleted"))
    }
}
