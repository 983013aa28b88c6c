//! Handlers: admin.stats, admin.activity, admin.reconcile_votes

pub mod stats {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::stats;

    pub const COMMAND: &str = "admin.stats";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        ApiResponse::ok(&stats::dashboard(ctx.app(), &actor)?)
    }
}

pub mod activity {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::activity::{self, ActivityFilter};

    pub const COMMAND: &str = "admin.activity";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let filter = ActivityFilter {
            user_id: ctx.param("userId").map(str::to_string),
            action: ctx.param("action").map(str::to_string),
        };
        let page = activity::list(ctx.app(), &actor, &filter, ctx.page_request()?)?;
        ApiResponse::page(&page)
    }
}

pub mod reconcile_votes {
    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;
    use crate::services::votes;

    pub const COMMAND: &str = "admin.reconcile_votes";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        let actor = ctx.actor()?;
        let report = votes::reconcile_counters(ctx.app(), &actor)?;
        ApiResponse::ok_with_message("vote counters reconciled", &report)
    }
}
