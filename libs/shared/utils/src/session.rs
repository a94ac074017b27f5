use tokio::sync::watch;

use shared_models::auth::User;

/// An authenticated caller: the bearer token plus the user it decoded to.
/// Built once at the request boundary and handed to services explicitly,
/// so nothing below the handlers reads ambient auth state.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Process-wide login/logout lifecycle with subscribe/notify semantics.
/// Observers get a `watch` receiver and see transitions as they happen
/// instead of polling for them.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn login(&self, session: Session) {
        // send_replace updates the value even with no subscribers around.
        self.tx.send_replace(Some(session));
    }

    pub fn logout(&self) {
        self.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
