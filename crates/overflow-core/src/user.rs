//! User type: an author whose reputation moves with votes and acceptance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A registered user.
///
/// `password_hash` is opaque to the forum; the identity collaborator
/// produces and verifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub password_hash: String,

    /// May go negative.
    #[serde(default)]
    pub reputation: i64,

    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl User {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            reputation: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn adjust_reputation(&mut self, delta: i64, at: DateTime<Utc>) {
        self.reputation += delta;
        self.updated_at = at;
    }
}
