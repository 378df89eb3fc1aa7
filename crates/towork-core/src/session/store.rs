use super::storage::KeyValueStore;
use crate::auth::{Role, Session};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::watch;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const USER_KEY: &str = "user";

const KEYS: [&str; 3] = [TOKEN_KEY, ROLE_KEY, USER_KEY];

/// Snapshot published on every session change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub user: Option<Session>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.user_id)
    }
}

/// Holds the authenticated session across two storage scopes.
///
/// The durable scope keeps a "remember me" login across restarts; the
/// ephemeral one only lives as long as the login. After any write at most one
/// scope carries the session keys.
pub struct SessionStore {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Rebuilds the session from whatever the scopes currently hold.
    ///
    /// # Arguments
    ///
    /// * `durable` - Scope that survives restarts
    /// * `ephemeral` - Scope tied to the current login
    ///
    /// # Returns
    ///
    /// A store whose state reflects the stored keys, durable scope first.
    pub fn restore(
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let read = |key: &str| -> Result<Option<String>> {
            match durable.get(key)? {
                Some(value) => Ok(Some(value)),
                None => ephemeral.get(key),
            }
        };

        let token = read(TOKEN_KEY)?;
        let user = match read(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable stored user: {}", e);
                    None
                }
            },
            None => None,
        };
        let role = user
            .as_ref()
            .map(|user| user.role.clone())
            .or(read(ROLE_KEY)?.map(|raw| Role::parse(&raw)));

        let state = SessionState { token, role, user };
        if state.is_logged_in() {
            tracing::info!("Restored session (role: {:?})", state.role);
        }
        let (sender, _) = watch::channel(state);

        Ok(Self {
            durable,
            ephemeral,
            state: sender,
        })
    }

    /// Stores the session in the scope chosen by `remember` and clears the
    /// other one.
    pub fn persist_session(&self, session: &Session, remember: bool) -> Result<()> {
        let (primary, secondary) = if remember {
            (&self.durable, &self.ephemeral)
        } else {
            (&self.ephemeral, &self.durable)
        };

        let user_json = serde_json::to_string(session)?;
        primary.set(TOKEN_KEY, &session.token)?;
        primary.set(ROLE_KEY, session.role.as_str())?;
        primary.set(USER_KEY, &user_json)?;
        for key in KEYS {
            secondary.remove(key)?;
        }

        tracing::info!(
            "Session persisted for user {} ({}, remember: {})",
            session.user_id,
            session.role,
            remember
        );
        self.state.send_replace(SessionState {
            token: Some(session.token.clone()),
            role: Some(session.role.clone()),
            user: Some(session.clone()),
        });
        Ok(())
    }

    /// Removes the session keys from both scopes.
    pub fn logout(&self) -> Result<()> {
        for key in KEYS {
            self.durable.remove(key)?;
            self.ephemeral.remove(key)?;
        }
        tracing::info!("Session cleared");
        self.state.send_replace(SessionState::default());
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role.clone()
    }

    pub fn current_user(&self) -> Option<Session> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on login and logout.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryKeyValueStore;

    fn session(role: Role) -> Session {
        Session {
            token: "abc".into(),
            token_type: "Bearer".into(),
            user_id: 7,
            email: "ada@example.com".into(),
            role,
            first_name: Some("Ada".into()),
            last_name: None,
        }
    }

    fn scopes() -> (Arc<MemoryKeyValueStore>, Arc<MemoryKeyValueStore>) {
        (
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryKeyValueStore::new()),
        )
    }

    #[test]
    fn remember_moves_session_between_scopes() {
        let (durable, ephemeral) = scopes();
        let store = SessionStore::restore(durable.clone(), ephemeral.clone()).unwrap();
        assert!(!store.is_logged_in());

        store.persist_session(&session(Role::Client), false).unwrap();
        assert_eq!(ephemeral.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert!(durable.is_empty());

        store.persist_session(&session(Role::Client), true).unwrap();
        assert_eq!(durable.get(ROLE_KEY).unwrap().as_deref(), Some("ROLE_CLIENT"));
        assert!(ephemeral.is_empty());
        assert_eq!(store.role(), Some(Role::Client));
    }

    #[test]
    fn logout_clears_both_scopes() {
        let (durable, ephemeral) = scopes();
        ephemeral.set(TOKEN_KEY, "stale").unwrap();
        let store = SessionStore::restore(durable.clone(), ephemeral.clone()).unwrap();
        store.persist_session(&session(Role::Admin), true).unwrap();
        ephemeral.set(TOKEN_KEY, "stale").unwrap();

        store.logout().unwrap();
        assert!(durable.is_empty());
        assert!(ephemeral.is_empty());
        assert!(store.current_user().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn corrupt_user_falls_back_to_role_key() {
        let (durable, ephemeral) = scopes();
        durable.set(TOKEN_KEY, "t").unwrap();
        durable.set(USER_KEY, "{not json").unwrap();
        ephemeral.set(ROLE_KEY, "ROLE_FREELANCER").unwrap();

        let store = SessionStore::restore(durable, ephemeral).unwrap();
        assert!(store.is_logged_in());
        assert!(store.current_user().is_none());
        assert_eq!(store.role(), Some(Role::Freelancer));
    }

    #[tokio::test]
    async fn subscribers_see_login_and_logout() {
        let (durable, ephemeral) = scopes();
        let store = SessionStore::restore(durable, ephemeral).unwrap();
        let mut rx = store.subscribe();

        store.persist_session(&session(Role::Freelancer), false).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().user_id(), Some(7));

        store.logout().unwrap();
        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_logged_in());
    }
}
