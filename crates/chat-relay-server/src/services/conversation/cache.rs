use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, info};

use super::types::{SessionSeed, DEFAULT_MAX_TURNS};
use crate::models::chat::{Turn, UserId};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("no session for user {0}")]
    SessionNotFound(UserId),
}

/// In-memory conversation store: user_id -> ordered turns.
///
/// Every operation locks only the shard holding that user, so different users
/// never contend. A whole exchange is several operations though, and two
/// concurrent exchanges for the same user may interleave their appends; see
/// [`super::SessionLocks`] for the opt-in serialization.
pub struct ConversationStore {
    sessions: DashMap<UserId, Vec<Turn>>,
    seed: SessionSeed,
    max_turns: usize,
}

impl ConversationStore {
    pub fn new(seed: SessionSeed, max_turns: usize) -> Self {
        info!("Initializing conversation store (window: {} turns)", max_turns);
        Self {
            sessions: DashMap::new(),
            seed,
            max_turns: max_turns.max(1),
        }
    }

    pub fn with_seed(seed: SessionSeed) -> Self {
        Self::new(seed, DEFAULT_MAX_TURNS)
    }

    /// Return the user's turns, creating a seeded session on first use.
    pub fn get_or_create(&self, user_id: &UserId) -> Vec<Turn> {
        let entry = self.sessions.entry(user_id.clone()).or_insert_with(|| {
            debug!("Creating session for user {}", user_id);
            self.seed.turns()
        });
        entry.value().clone()
    }

    /// Append a user turn and return the history to forward to the backend.
    pub fn append_user(
        &self,
        user_id: &UserId,
        content: impl Into<String>,
    ) -> Result<Vec<Turn>, StoreError> {
        let mut turns = self
            .sessions
            .get_mut(user_id)
            .ok_or_else(|| StoreError::SessionNotFound(user_id.clone()))?;
        turns.push(Turn::user(content));
        Ok(turns.clone())
    }

    /// Append the assistant reply, then keep only the newest `max_turns`.
    pub fn append_assistant(
        &self,
        user_id: &UserId,
        content: impl Into<String>,
    ) -> Result<(), StoreError> {
        let mut turns = self
            .sessions
            .get_mut(user_id)
            .ok_or_else(|| StoreError::SessionNotFound(user_id.clone()))?;
        turns.push(Turn::assistant(content));

        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
            debug!("Trimmed {} oldest turns for user {}", excess, user_id);
        }
        Ok(())
    }

    /// Snapshot of a session, if it exists.
    pub fn history(&self, user_id: &UserId) -> Option<Vec<Turn>> {
        self.sessions.get(user_id).map(|turns| turns.value().clone())
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Number of sessions held
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    fn store() -> ConversationStore {
        ConversationStore::with_seed(SessionSeed::new("context", "be brief"))
    }

    #[test]
    fn test_get_or_create_seeds_once() {
        let store = store();
        let user = UserId::from("u1");

        let turns = store.get_or_create(&user);
        assert_eq!(turns, vec![Turn::system("context"), Turn::user("be brief")]);

        store.append_user(&user, "hola").unwrap();
        let again = store.get_or_create(&user);
        assert_eq!(again.len(), 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_user_requires_session() {
        let store = store();
        let user = UserId::from("ghost");
        assert_eq!(
            store.append_user(&user, "hola"),
            Err(StoreError::SessionNotFound(user.clone()))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_user_returns_history() {
        let store = store();
        let user = UserId::from("u1");
        store.get_or_create(&user);

        let history = store.append_user(&user, "¿Dónde está ubicada la escuela?").unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2], Turn::user("¿Dónde está ubicada la escuela?"));

        store.append_assistant(&user, "En Madrid.").unwrap();
        assert_eq!(store.history(&user).unwrap().len(), 4);
    }

    #[test]
    fn test_window_keeps_newest_turns_in_order() {
        let store = store();
        let user = UserId::from("u1");
        store.get_or_create(&user);

        for i in 0..8 {
            store.append_user(&user, format!("q{}", i)).unwrap();
            store.append_assistant(&user, format!("a{}", i)).unwrap();
            assert!(store.history(&user).unwrap().len() <= 10);
        }

        let turns = store.history(&user).unwrap();
        assert_eq!(turns.len(), 10);
        // Seed turns are evicted once enough exchanges pile up.
        assert!(turns.iter().all(|t| t.role != Role::System));
        let expected: Vec<Turn> = (3..8)
            .flat_map(|i| vec![Turn::user(format!("q{}", i)), Turn::assistant(format!("a{}", i))])
            .collect();
        assert_eq!(turns, expected);
    }

    #[test]
    fn test_trim_happens_only_after_assistant_turn() {
        let store = ConversationStore::new(SessionSeed::new("c", "b"), 3);
        let user = UserId::from("u1");
        store.get_or_create(&user);

        let history = store.append_user(&user, "q").unwrap();
        assert_eq!(history.len(), 3);
        let history = store.append_user(&user, "q2").unwrap();
        assert_eq!(history.len(), 4);

        store.append_assistant(&user, "a").unwrap();
        assert_eq!(
            store.history(&user).unwrap(),
            vec![Turn::user("q"), Turn::user("q2"), Turn::assistant("a")]
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = store();
        let a = UserId::from("a");
        let b = UserId::from("b");
        store.get_or_create(&a);
        store.get_or_create(&b);

        store.append_user(&a, "solo a").unwrap();
        store.append_assistant(&a, "ok").unwrap();

        assert_eq!(store.history(&a).unwrap().len(), 4);
        assert_eq!(store.history(&b).unwrap().len(), 2);
    }
}
