use overflow_core::{
    Answer, AtomicStoreMutationError, EscapingRenderer, Forum, ForumError, MarkdownRenderer,
    Question, StaticIdentity, Tag, User, UserId, mutate_forum_jsonl, require_user,
};
use serde_json::{Value, json};
use std::fmt::Display;

use crate::config::Settings;

pub fn fail(message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn load_forum_or_exit(settings: &Settings) -> Forum {
    let path = &settings.store;
    if !path.exists() {
        fail(format!(
            "forum store not found: {} (run `overflow init`)",
            path.display()
        ));
    }
    Forum::load_jsonl(path)
        .unwrap_or_else(|e| fail(format!("failed to load {}: {e}", path.display())))
}

/// Run one lock-scoped mutation against the configured store.
///
/// The mutator returns `(value, changed)`; see [`mutate_forum_jsonl`].
pub fn mutate_forum_or_exit<T, F>(settings: &Settings, mutator: F) -> T
where
    F: FnOnce(&mut Forum) -> Result<(T, bool), ForumError>,
{
    let path = &settings.store;
    if !path.exists() {
        fail(format!(
            "forum store not found: {} (run `overflow init`)",
            path.display()
        ));
    }
    mutate_forum_jsonl(path, mutator).unwrap_or_else(|e| {
        if let AtomicStoreMutationError::Mutation(err) = &e {
            tracing::info!(class = err.class(), "mutation refused");
        }
        fail(e)
    })
}

/// The identity selected with `--as`, which may name a user by id or username.
pub fn acting_identity(forum: &Forum, acting_as: Option<&str>) -> StaticIdentity {
    match acting_as {
        None => StaticIdentity::anonymous(),
        Some(raw) => match forum.user_by_username(raw) {
            Some(user) => StaticIdentity::user(user.id.clone()),
            None => StaticIdentity::user(raw),
        },
    }
}

/// Resolve `--as` inside a mutation, refusing anonymous or unknown users.
pub fn acting_user(forum: &Forum, settings: &Settings) -> Result<UserId, ForumError> {
    let identity = acting_identity(forum, settings.acting_as.as_deref());
    require_user(&identity, forum)
}

/// Look a user up by id, then by username.
pub fn find_user<'a>(forum: &'a Forum, key: &str) -> Option<&'a User> {
    forum
        .user(&UserId::from(key))
        .or_else(|| forum.user_by_username(key))
}

pub fn print_json(payload: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}

pub fn user_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "reputation": user.reputation,
        "createdAt": user.created_at.to_rfc3339(),
    })
}

pub fn question_json(question: &Question) -> Value {
    json!({
        "id": question.id,
        "title": question.title,
        "body": question.body,
        "userId": question.user_id,
        "tags": question.tags,
        "votes": question.votes,
        "viewCount": question.view_count,
        "createdAt": question.created_at.to_rfc3339(),
        "updatedAt": question.updated_at.to_rfc3339(),
    })
}

pub fn answer_json(answer: &Answer) -> Value {
    json!({
        "id": answer.id,
        "body": answer.body,
        "questionId": answer.question_id,
        "userId": answer.user_id,
        "votes": answer.votes,
        "isAccepted": answer.is_accepted,
        "createdAt": answer.created_at.to_rfc3339(),
        "updatedAt": answer.updated_at.to_rfc3339(),
    })
}

pub fn tag_json(tag: &Tag) -> Value {
    json!({
        "id": tag.id,
        "name": tag.name,
        "description": tag.description,
        "count": tag.count,
        "createdBy": tag.created_by,
    })
}

/// Body rendered for display, alongside the stored text.
pub fn render_body(body: &str) -> String {
    EscapingRenderer.render(body)
}

pub fn question_line(question: &Question) -> String {
    format!(
        "{} [{} votes, {} views] {} ({})",
        question.id,
        question.votes,
        question.view_count,
        question.title,
        question.tags.join(", ")
    )
}
