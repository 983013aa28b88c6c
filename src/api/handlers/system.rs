pub mod health {
    use serde_json::json;

    use crate::api::handlers::Ctx;
    use crate::api::{ApiResponse, HandlerError};
    use crate::model::ModelStore;

    pub const COMMAND: &str = "health";
    pub use crate::api::handlers::always as guard;

    pub fn handle<S: ModelStore>(_ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
        ApiResponse::ok(&json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
    }
}
