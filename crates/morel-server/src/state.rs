//! State shared across all connections

use crate::config::Config;
use chrono::{DateTime, Utc};
use morel_core::ChangeEvent;
use morel_store::ItemDb;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// One signed-in session
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

/// Shared server state: the item database, the change broadcast, and the
/// live session table.
pub struct ServerState {
    pub db: ItemDb,
    pub config: Config,
    events: broadcast::Sender<ChangeEvent>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl ServerState {
    pub fn new(db: ItemDb, config: Config) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            db,
            config,
            events,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Publish one committed change to every feed subscriber.
    ///
    /// Sending fails only when nobody is subscribed, which is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    /// Subscribe to changes committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Issue a session token when the credentials match the configured admin.
    pub async fn sign_in(&self, username: &str, password: &str) -> Option<String> {
        if username != self.config.admin_username || password != self.config.admin_password {
            return None;
        }
        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            issued_at: Utc::now(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        Some(token)
    }

    /// True when `token` belongs to a live session.
    pub async fn check_token(&self, token: &str) -> bool {
        self.sessions.read().await.contains_key(token)
    }

    /// Revoke one session; true when it existed.
    pub async fn sign_out(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> ServerState {
        let config: Config = ron::from_str(
            "(admin_username: \"admin\", admin_password: \"secret\")",
        )
        .unwrap();
        ServerState::new(ItemDb::in_memory().unwrap(), config)
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_credentials() {
        let state = test_state();
        assert!(state.sign_in("admin", "wrong").await.is_none());
        assert!(state.sign_in("intruder", "secret").await.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_issues_distinct_live_tokens() {
        let state = test_state();
        let first = state.sign_in("admin", "secret").await.unwrap();
        let second = state.sign_in("admin", "secret").await.unwrap();

        assert_ne!(first, second);
        assert!(state.check_token(&first).await);
        assert!(state.check_token(&second).await);
        assert!(!state.check_token("made-up").await);
    }

    #[tokio::test]
    async fn test_sign_out_revokes_only_that_token() {
        let state = test_state();
        let first = state.sign_in("admin", "secret").await.unwrap();
        let second = state.sign_in("admin", "secret").await.unwrap();

        assert!(state.sign_out(&first).await);
        assert!(!state.sign_out(&first).await);
        assert!(!state.check_token(&first).await);
        assert!(state.check_token(&second).await);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let state = test_state();
        let mut receiver = state.subscribe();

        state.publish(ChangeEvent::Delete {
            id: morel_core::ItemId::new("id-1"),
        });

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.item_id().as_str(), "id-1");
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let state = test_state();
        state.publish(ChangeEvent::Delete {
            id: morel_core::ItemId::new("id-1"),
        });
    }
}
