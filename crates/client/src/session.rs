use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use api_types::auth::SessionUser;

use crate::{
    error::{ClientError, Result},
    storage::LocalStorage,
};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Authenticated identity plus the storage it is persisted to.
///
/// Clones share the same session. Only login and logout write to it.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    storage: Box<dyn LocalStorage>,
    user: Option<SessionUser>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.read().user)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Wraps `storage` and restores any session persisted in it.
    pub fn new(storage: impl LocalStorage + 'static) -> Self {
        let user = read_user(&storage);
        if let Some(user) = &user {
            tracing::debug!("restored session for {}", user.username);
        }
        Self {
            inner: Arc::new(RwLock::new(Inner {
                storage: Box::new(storage),
                user,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    /// The current identity, or `NoSession` when nobody is logged in.
    pub fn require_user(&self) -> Result<SessionUser> {
        self.current_user().ok_or(ClientError::NoSession)
    }

    /// Bearer token to attach to outgoing requests.
    pub fn token(&self) -> Option<String> {
        self.read()
            .storage
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// Persists a freshly issued token and identity.
    pub fn establish(&self, token: &str, user: SessionUser) -> Result<()> {
        let record =
            serde_json::to_string(&user).map_err(|err| ClientError::Storage(err.to_string()))?;
        let mut inner = self.write();
        inner.storage.set(TOKEN_KEY, token)?;
        inner.storage.set(USER_KEY, &record)?;
        inner.user = Some(user);
        Ok(())
    }

    /// Forgets the session, both in memory and in storage.
    pub fn logout(&self) {
        let mut inner = self.write();
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = inner.storage.remove(key) {
                tracing::warn!("failed to remove {key} from local storage: {err}");
            }
        }
        if let Some(user) = inner.user.take() {
            tracing::info!("{} logged out", user.username);
        }
    }
}

fn read_user(storage: &dyn LocalStorage) -> Option<SessionUser> {
    let record = storage.get(USER_KEY)?;
    match serde_json::from_str(&record) {
        Ok(user) => Some(user),
        Err(err) => {
            tracing::warn!("ignoring malformed session record: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn alice() -> SessionUser {
        SessionUser {
            username: "alice".to_string(),
        }
    }

    #[test]
    fn restores_persisted_user() {
        let storage = MemoryStorage::new()
            .with_entry(TOKEN_KEY, "tok")
            .with_entry(USER_KEY, r#"{"username":"alice"}"#);
        let session = SessionStore::new(storage);
        assert_eq!(session.current_user(), Some(alice()));
        assert_eq!(session.token().as_deref(), Some("tok"));
    }

    #[test]
    fn malformed_user_record_is_no_session() {
        let storage = MemoryStorage::new().with_entry(USER_KEY, "{not json");
        let session = SessionStore::new(storage);
        assert_eq!(session.current_user(), None);
        assert!(matches!(session.require_user(), Err(ClientError::NoSession)));
    }

    #[test]
    fn logout_clears_storage_and_memory() {
        let session = SessionStore::new(MemoryStorage::new());
        session.establish("tok", alice()).unwrap();
        assert!(session.is_authenticated());

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        let inner = session.read();
        assert_eq!(inner.storage.get(TOKEN_KEY), None);
        assert_eq!(inner.storage.get(USER_KEY), None);
    }

    #[test]
    fn logout_without_session_is_harmless() {
        let session = SessionStore::new(MemoryStorage::new().with_entry(TOKEN_KEY, "stale"));
        session.logout();
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clones_share_state() {
        let session = SessionStore::new(MemoryStorage::new());
        let other = session.clone();
        session.establish("tok", alice()).unwrap();
        assert_eq!(other.current_user(), Some(alice()));
    }
}
