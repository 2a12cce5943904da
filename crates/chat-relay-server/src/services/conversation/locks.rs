use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::chat::UserId;

/// Per-user async mutual exclusion around a whole exchange.
///
/// Lock entries are created on demand and live as long as the process, like
/// the sessions they guard.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other exchange for `user_id` is in flight.
    pub async fn acquire(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        // Shard guard is released above; only the per-user mutex is awaited.
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(SessionLocks::new());
        let user = UserId::from("u1");

        let guard = locks.acquire(&user).await;
        let contender = {
            let locks = locks.clone();
            let user = user.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let locks = SessionLocks::new();
        let _a = locks.acquire(&UserId::from("a")).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(&UserId::from("b"))).await;
        assert!(b.is_ok());
    }
}
