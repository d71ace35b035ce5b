use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// (guild_id, user_id)
pub type PairKey = (u64, u64);

#[derive(Debug)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    /// Holders plus waiters.
    users: usize,
}

type LockMap = HashMap<PairKey, Slot>;

/// One async mutex per (guild, user) pair, created on demand and dropped once
/// nobody holds or waits on it.
#[derive(Clone, Debug, Default)]
pub struct PairLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl PairLocks {
    /// Wait for exclusive access to `key`. Waiters are served in FIFO order.
    ///
    /// The returned guard is registered before waiting, so a waiter that is
    /// cancelled still releases its slot.
    pub async fn acquire(&self, key: PairKey) -> PairGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = locks.entry(key).or_insert_with(|| Slot {
                lock: Arc::default(),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.lock)
        };

        let mut pair = PairGuard {
            key,
            locks: Arc::clone(&self.locks),
            guard: None,
        };
        pair.guard = Some(lock.lock_owned().await);

        pair
    }

    /// Number of pairs currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct PairGuard {
    key: PairKey,
    locks: Arc<Mutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PairGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let unused = match locks.get_mut(&self.key) {
            Some(slot) => {
                slot.users = slot.users.saturating_sub(1);
                slot.users == 0
            }
            None => false,
        };

        if unused {
            locks.remove(&self.key);
        }
    }
}
