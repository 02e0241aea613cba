use crate::domain::model::UserId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per creator. Holding the guard serializes the
/// count-then-write sequence for that creator only.
#[derive(Debug, Default)]
pub struct CreatorLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl CreatorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, creator: UserId) -> OwnedMutexGuard<()> {
        // clone out of the shard before awaiting
        let lock = Arc::clone(self.locks.entry(creator).or_default().value());
        lock.lock_owned().await
    }
}
