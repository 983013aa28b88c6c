//! Handlers: auth.register, auth.login, auth.me

pub mod register {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::auth::{self, RegisterInput};

    pub const COMMAND: &str = "auth.register";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        ctx.has_fields(&["name", "email", "password"])
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let input = ctx.validated_input::<RegisterInput>()?;
        let session = auth::register(ctx.app(), input)?;
        ApiResponse::created("registration successful", &session)
    }
}

pub mod login {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, Context, HandlerError};
    use crate::model::ModelStore;
    use crate::services::auth::{self, LoginInput};

    pub const COMMAND: &str = "auth.login";

    pub fn guard<R>(ctx: &Context<R>) -> bool {
        ctx.has_fields(&["email", "password"])
    }

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let input = ctx.validated_input::<LoginInput>()?;
        let session = auth::login(ctx.app(), input)?;
        ApiResponse::ok_with_message("login successful", &session)
    }
}

pub mod me {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::auth;

    pub const COMMAND: &str = "auth.me";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        ApiResponse::ok(&auth::me(ctx.app(), &actor)?)
    }
}
