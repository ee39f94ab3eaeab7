//! In-memory bearer-token sessions.
//!
//! Tokens are random UUIDs handed out at login and dropped at logout or
//! restart. Good enough for a single-process deployment; a multi-node
//! setup would swap this for a shared store behind the same interface.

use dashmap::DashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct SessionStore {
    tokens: DashMap<String, i64>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for the account and returns it.
    pub fn issue(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    /// The account id behind a token, if the session is live.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        self.tokens.get(token).map(|entry| *entry)
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }

    /// Drops every session belonging to `user_id` (account deletion).
    pub fn revoke_user(&self, user_id: i64) {
        self.tokens.retain(|_, uid| *uid != user_id);
    }
}
