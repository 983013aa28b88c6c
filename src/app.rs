//! Application state shared by every handler.

use tracing::info;

use crate::api::{Authenticator, HandlerError, Session};
use crate::auth::TokenSigner;
use crate::config::Config;
use crate::entities::User;
use crate::lock::{InMemoryLock, InMemoryLockManager, LockGuard, LockManager};
use crate::model::{InMemoryModelStore, ModelStore, ModelsExt, StoreKey};
use crate::services;

/// Store, record locks and token signer, wired from a [`Config`].
pub struct App<S = InMemoryModelStore> {
    store: S,
    locks: InMemoryLockManager,
    tokens: TokenSigner,
    config: Config,
}

impl<S: ModelStore> App<S> {
    pub fn new(store: S, config: Config) -> Self {
        let tokens = TokenSigner::new(config.token_secret.as_bytes(), config.token_ttl());
        Self {
            store,
            locks: InMemoryLockManager::new(),
            tokens,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tokens(&self) -> &TokenSigner {
        &self.tokens
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lock the given records until the guard drops.
    pub fn lock(&self, keys: &[StoreKey]) -> Result<LockGuard<InMemoryLock>, HandlerError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        Ok(self.locks.acquire(&keys)?)
    }

    /// Lock a key set that depends on stored data (a question and its
    /// answers, say). Keys are recomputed once held; if they changed in the
    /// meantime the locks are released and the set is taken again.
    pub fn lock_stable<F>(&self, mut keys_for: F) -> Result<LockGuard<InMemoryLock>, HandlerError>
    where
        F: FnMut() -> Result<Vec<StoreKey>, HandlerError>,
    {
        loop {
            let keys = keys_for()?;
            let guard = self.lock(&keys)?;
            if keys_for()? == keys {
                return Ok(guard);
            }
        }
    }

    /// Create the configured bootstrap admin if no account uses its email.
    pub fn bootstrap(&self) -> Result<(), HandlerError> {
        if let Some(admin) = &self.config.bootstrap_admin {
            if services::users::ensure_admin_account(self, admin)? {
                info!(email = %admin.email, "bootstrap admin created");
            }
        }
        Ok(())
    }
}

impl App<InMemoryModelStore> {
    pub fn in_memory(config: Config) -> Self {
        Self::new(InMemoryModelStore::new(), config)
    }
}

impl<S: ModelStore> Authenticator for App<S> {
    /// Valid signature, not expired, and the account still exists and is
    /// active. The role comes from the stored user, not the token.
    fn authenticate(&self, token: &str) -> Result<Session, HandlerError> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|e| HandlerError::Unauthorized(e.to_string()))?;
        let user = self
            .store
            .models::<User>()
            .get(&claims.sub)?
            .map(|v| v.into_inner())
            .filter(|user| user.is_active)
            .ok_or_else(|| HandlerError::Unauthorized("account is not active".into()))?;
        Ok(Session::authenticated(user.id, user.role))
    }
}
