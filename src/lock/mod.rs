//! Keyed locks used to serialize read-modify-write sequences on one record.
//!
//! A record holding denormalized counters (question, answer, post) is only
//! ever mutated while its key is locked; the resulting writes are then
//! committed as one atomic batch. Keys are acquired in sorted order so two
//! callers locking overlapping key sets cannot deadlock.

mod in_memory;

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

pub use in_memory::{InMemoryLock, InMemoryLockManager};

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The underlying lock primitive was poisoned (a thread panicked while holding it).
    #[error("lock poisoned: {0}")]
    Poisoned(String),
    /// Failed to acquire the lock.
    #[error("lock acquire failed: {0}")]
    AcquireFailed(String),
}

/// A single lock instance.
///
/// In-memory locks use `Mutex` + `Condvar`; a multi-process deployment would
/// back this with Redis, Postgres advisory locks, etc.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Factory for per-key locks.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) the lock for `key`. Repeated calls with the same key
    /// return the same logical lock.
    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Lock every key (sorted, deduplicated) and return a guard that
    /// releases them when dropped.
    fn acquire<K: AsRef<str>>(&self, keys: &[K]) -> Result<LockGuard<Self::Lock>, LockError>
    where
        Self: Sized,
    {
        let mut unique: Vec<&str> = keys.iter().map(|k| k.as_ref()).collect();
        unique.sort_unstable();
        unique.dedup();

        let mut guard = LockGuard {
            held: Vec::with_capacity(unique.len()),
        };
        for key in unique {
            let lock = self.get_lock(key)?;
            lock.lock()?;
            // Pushed only once held, so a failure part-way releases exactly
            // what was taken when `guard` drops.
            guard.held.push((key.to_string(), lock));
        }
        Ok(guard)
    }
}

/// Releases its locks, in reverse acquisition order, on drop.
pub struct LockGuard<L: Lock> {
    held: Vec<(String, Arc<L>)>,
}

impl<L: Lock> LockGuard<L> {
    /// Keys currently held by this guard.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(|(key, _)| key.as_str())
    }
}

impl<L: Lock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        while let Some((key, lock)) = self.held.pop() {
            if let Err(e) = lock.unlock() {
                warn!(key = %key, error = %e, "failed to release lock");
            }
        }
    }
}
