extern crate self as blogqa;

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod entities;
pub mod lock;
pub mod model;
pub mod pagination;
pub mod policy;
pub mod services;
pub mod text;

pub use api::{ApiResponse, Authenticator, HandlerError, Service, Session};
pub use app::App;
pub use config::{Config, ConfigError, LogFormat};
pub use lock::{InMemoryLockManager, LockError, LockGuard, LockManager};
pub use model::{
    CommitBuilder, CommitBuilderExt, InMemoryModelStore, Model, ModelError, ModelRepository,
    ModelStore, ModelsExt, StoreKey, Versioned,
};
pub use pagination::{Page, PageRequest, Pagination};
pub use policy::Actor;

// Derive macro for `Model`
pub use blogqa_macros::Model;
