use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use super::{Lock, LockError, LockManager};

/// In-memory lock backed by `Mutex<bool>` + `Condvar`.
pub struct InMemoryLock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
        }
        *locked = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
        Ok(())
    }
}

/// Size the table may reach before idle entries are swept.
const MIN_SWEEP_AT: usize = 256;

struct LockTable {
    entries: HashMap<String, Arc<InMemoryLock>>,
    sweep_at: usize,
}

impl LockTable {
    /// Drop entries nobody holds or waits on. Holders and waiters keep an
    /// `Arc` clone, so a count of one means only the table refers to it.
    fn sweep(&mut self) {
        self.entries.retain(|_, lock| Arc::strong_count(lock) > 1);
        self.sweep_at = (self.entries.len() * 2).max(MIN_SWEEP_AT);
    }
}

/// In-memory lock manager: lazily creates one `InMemoryLock` per key.
///
/// Idle entries are swept whenever the table doubles past its last swept
/// size, so memory tracks the number of keys in use, not every key ever seen.
pub struct InMemoryLockManager {
    locks: Mutex<LockTable>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(LockTable {
                entries: HashMap::new(),
                sweep_at: MIN_SWEEP_AT,
            }),
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks.lock().map_or(0, |table| table.entries.len())
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, key: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut table = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        if !table.entries.contains_key(key) && table.entries.len() >= table.sweep_at {
            table.sweep();
        }
        Ok(table
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(InMemoryLock::new()))
            .clone())
    }
}
