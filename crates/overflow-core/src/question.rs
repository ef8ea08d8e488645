//! Question type: the primary forum entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{QuestionId, UserId};

/// A question owned by its author.
///
/// Tags are stored by (lowercased) name, not by tag id, in the order the
/// author gave them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    pub user_id: UserId,
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub votes: i64,
    /// Monotonic non-decreasing.
    #[serde(default)]
    pub view_count: u64,

    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl Question {
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: QuestionId::generate(),
            title: title.into(),
            body: body.into(),
            user_id,
            tags,
            votes: 0,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Exact match against the stored tag names.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag == name)
    }

    /// Case-insensitive substring match on title, body, or any tag.
    ///
    /// `needle` must already be lowercased.
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}
