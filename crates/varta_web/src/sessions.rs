use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

pub const SESSION_COOKIE: &str = "varta_session";

/// In-process session store: opaque uuid token -> string key/value map.
/// Sessions live for the process lifetime; there is no expiry, matching
/// the legacy system's behavior.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session holding `values` and returns its token.
    pub fn create(&self, values: HashMap<String, String>) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.insert(token.clone(), values);
        token
    }

    pub fn get(&self, token: &str, key: &str) -> Option<String> {
        let sessions = self.sessions.read().expect("session lock poisoned");
        sessions.get(token)?.get(key).cloned()
    }

    pub fn set(&self, token: &str, key: &str, value: &str) {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        if let Some(session) = sessions.get_mut(token) {
            session.insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove(&self, token: &str) {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.remove(token);
    }

    /// Pulls the session token out of a Cookie header value.
    pub fn token_from_cookie(header: &str) -> Option<String> {
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.to_string())
        })
    }
}
