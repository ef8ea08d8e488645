//! Answer type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AnswerId, QuestionId, UserId};

/// An answer to a question.
///
/// At most one answer per question carries `is_accepted = true`; the
/// accept rule in [`crate::rules`] is the only writer of that flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub body: String,
    pub question_id: QuestionId,
    pub user_id: UserId,

    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub is_accepted: bool,

    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl Answer {
    pub fn new(question_id: QuestionId, user_id: UserId, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AnswerId::generate(),
            body: body.into(),
            question_id,
            user_id,
            votes: 0,
            is_accepted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
