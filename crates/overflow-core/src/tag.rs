//! Tag type: a lazily created label with a usage counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{TagId, UserId};

/// A tag, unique by case-insensitive name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    /// Always stored lowercased.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of questions currently carrying this tag.
    #[serde(default)]
    pub count: u64,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
    /// User whose question first used the tag; `None` for seeded tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

impl Tag {
    pub fn new(name: &str, created_by: Option<UserId>) -> Self {
        Self {
            id: TagId::generate(),
            name: name.trim().to_lowercase(),
            description: None,
            count: 0,
            created_at: Utc::now(),
            created_by,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name.trim().to_lowercase()
    }
}

/// A tag installed at store creation, before any question uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTag {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl SeedTag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The tags a fresh forum starts with.
pub fn default_seed_tags() -> Vec<SeedTag> {
    vec![
        SeedTag::new("chatgpt", "Questions related to ChatGPT prompts and usage"),
        SeedTag::new(
            "midjourney",
            "Questions about Midjourney image generation prompts",
        ),
        SeedTag::new("dalle", "Questions about DALL-E image generation prompts"),
        SeedTag::new(
            "stable-diffusion",
            "Questions about Stable Diffusion prompts and techniques",
        ),
        SeedTag::new(
            "prompt-engineering",
            "General prompt engineering techniques and best practices",
        ),
    ]
}
