//! Session variables established by the transport for one request.

use std::collections::HashMap;

use crate::entities::Role;

pub const USER_ID: &str = "user-id";
pub const USER_ROLE: &str = "user-role";

/// Identity of the caller, as vouched for by the transport.
///
/// The HTTP transport fills it only from a verified bearer token; request
/// headers are never copied in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty (anonymous) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Session for an authenticated user.
    pub fn authenticated(user_id: impl Into<String>, role: Role) -> Self {
        let mut session = Self::new();
        session.set(USER_ID, user_id);
        session.set(USER_ROLE, role.as_str());
        session
    }

    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID)
    }

    pub fn role(&self) -> Option<&str> {
        self.get(USER_ROLE)
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Check if a session variable exists.
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn is_anonymous(&self) -> bool {
        !self.has(USER_ID)
    }
}
