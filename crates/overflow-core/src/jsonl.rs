//! JSONL snapshots of a forum.
//!
//! Each line is a user, tag, question, or answer, discriminated by `kind`.
//! Line order is insertion order, which listings use to break timestamp
//! ties. Loading checks that the records still describe a consistent
//! forum: every reference resolves, at most one answer per question is
//! accepted, and no tag counts fewer questions than actually carry it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::answer::Answer;
use crate::ids::{AnswerId, QuestionId};
use crate::memory::Forum;
use crate::question::Question;
use crate::tag::Tag;
use crate::user::User;

/// One persisted entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForumRecord {
    User(User),
    Tag(Tag),
    Question(Question),
    Answer(Answer),
}

/// Decode snapshot text. Blank lines and `#` comments are skipped.
pub fn decode_records(text: &str) -> Result<Vec<ForumRecord>, JsonlError> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, raw)| {
            serde_json::from_str::<ForumRecord>(raw).map_err(|e| JsonlError::Parse {
                line,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Encode records one per line, each newline-terminated.
pub fn encode_records(records: &[ForumRecord]) -> Result<String, JsonlError> {
    let mut text = String::new();
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

/// Content reference of a forum snapshot: `sha256:<hex>` over its JSONL text.
pub fn snapshot_ref(forum: &Forum) -> Result<String, JsonlError> {
    let text = encode_records(&forum.to_records())?;
    Ok(format!("sha256:{:x}", Sha256::digest(text.as_bytes())))
}

/// Read, decode and verify the snapshot at `path`.
pub(crate) fn load_snapshot(path: &Path) -> Result<Forum, JsonlError> {
    let bytes = fs::read(path).map_err(|e| JsonlError::io(path, e))?;
    if bytes.contains(&0) {
        return Err(JsonlError::corrupt(
            "text",
            format!("{} contains NUL bytes", path.display()),
        ));
    }
    let text = String::from_utf8(bytes).map_err(|_| {
        JsonlError::corrupt("text", format!("{} is not valid UTF-8", path.display()))
    })?;

    let forum = Forum::from_records(decode_records(&text)?);
    check_integrity(&forum)?;
    Ok(forum)
}

/// Replace the snapshot at `path` with `forum`.
///
/// The text goes to a staging file next to the store, is fsynced, and is
/// renamed over the target, so readers see the old snapshot or the new one.
pub(crate) fn store_snapshot(path: &Path, forum: &Forum) -> Result<(), JsonlError> {
    let text = encode_records(&forum.to_records())?;
    if let Some(dir) = parent_dir(path) {
        fs::create_dir_all(dir).map_err(|e| JsonlError::io(dir, e))?;
    }

    let staging = sibling_path(path, &format!("{}.tmp", Uuid::new_v4().simple()));
    let staged = write_synced(&staging, text.as_bytes())
        .and_then(|()| fs::rename(&staging, path).map_err(|e| JsonlError::io(path, e)));
    if let Err(err) = staged {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    if let Some(dir) = parent_dir(path) {
        File::open(dir)
            .and_then(|handle| handle.sync_all())
            .map_err(|e| JsonlError::io(dir, e))?;
    }
    Ok(())
}

/// `<path>.<suffix>`, in the same directory as the store.
pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

pub(crate) fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    let mut file = File::create(path).map_err(|e| JsonlError::io(path, e))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| JsonlError::io(path, e))
}

fn check_integrity(forum: &Forum) -> Result<(), JsonlError> {
    let mut usernames = BTreeSet::new();
    let mut emails = BTreeSet::new();
    for user in forum.users().iter() {
        if !usernames.insert(user.username.to_ascii_lowercase()) {
            return Err(JsonlError::corrupt(
                "unique-username",
                format!("username `{}` is registered twice", user.username),
            ));
        }
        if !emails.insert(user.email.to_ascii_lowercase()) {
            return Err(JsonlError::corrupt(
                "unique-email",
                format!("email `{}` is registered twice", user.email),
            ));
        }
    }

    let mut tag_counts = BTreeMap::new();
    for tag in forum.tags().iter() {
        if tag_counts.insert(tag.name.to_lowercase(), tag.count).is_some() {
            return Err(JsonlError::corrupt(
                "unique-tag-name",
                format!("tag `{}` appears twice", tag.name),
            ));
        }
    }

    let mut carried: BTreeMap<String, u64> = BTreeMap::new();
    for question in forum.questions().iter() {
        if forum.user(&question.user_id).is_none() {
            return Err(JsonlError::corrupt(
                "question-author",
                format!(
                    "question {} names missing user {}",
                    question.id, question.user_id
                ),
            ));
        }
        for name in &question.tags {
            *carried.entry(name.to_lowercase()).or_default() += 1;
        }
    }
    for (name, carriers) in carried {
        match tag_counts.get(&name) {
            None => {
                return Err(JsonlError::corrupt(
                    "question-tag",
                    format!("tag `{name}` is carried by {carriers} question(s) but has no record"),
                ));
            }
            Some(&count) if count < carriers => {
                return Err(JsonlError::corrupt(
                    "tag-count",
                    format!("tag `{name}` counts {count} but {carriers} question(s) carry it"),
                ));
            }
            Some(_) => {}
        }
    }

    let mut accepted: BTreeMap<&QuestionId, &AnswerId> = BTreeMap::new();
    for answer in forum.answers().iter() {
        if forum.question(&answer.question_id).is_none() {
            return Err(JsonlError::corrupt(
                "answer-question",
                format!(
                    "answer {} belongs to missing question {}",
                    answer.id, answer.question_id
                ),
            ));
        }
        if forum.user(&answer.user_id).is_none() {
            return Err(JsonlError::corrupt(
                "answer-author",
                format!("answer {} names missing user {}", answer.id, answer.user_id),
            ));
        }
        if answer.is_accepted
            && let Some(previous) = accepted.insert(&answer.question_id, &answer.id)
        {
            return Err(JsonlError::corrupt(
                "single-accepted-answer",
                format!(
                    "question {} has both {previous} and {} accepted",
                    answer.question_id, answer.id
                ),
            ));
        }
    }
    Ok(())
}

/// Errors from reading or writing forum snapshots.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("line {line}: parse error: {message}")]
    Parse { line: usize, message: String },

    #[error("serialization error: {0}")]
    Serialize(String),

    /// The snapshot decoded but breaks a forum invariant, named by `invariant`.
    #[error("corrupted snapshot ({invariant}): {detail}")]
    Corrupt {
        invariant: &'static str,
        detail: String,
    },
}

impl JsonlError {
    fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn corrupt(invariant: &'static str, detail: impl Into<String>) -> Self {
        Self::Corrupt {
            invariant,
            detail: detail.into(),
        }
    }
}
