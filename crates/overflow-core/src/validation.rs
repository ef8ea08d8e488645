//! Input shape checks, applied before any mutation.
//!
//! Lengths count Unicode scalar values. Each `check_*` helper appends to a
//! shared [`ValidationErrors`] so one call reports every failing field.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ForumError, ValidationErrors};

pub const TITLE_MIN_CHARS: usize = 15;
pub const TITLE_MAX_CHARS: usize = 150;
pub const BODY_MIN_CHARS: usize = 30;
pub const TAGS_MIN: usize = 1;
pub const TAGS_MAX: usize = 5;
pub const TAG_NAME_MIN_CHARS: usize = 2;
pub const TAG_NAME_MAX_CHARS: usize = 25;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const SEARCH_QUERY_MIN_CHARS: usize = 3;

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("username regex must compile"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile"))
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Trim, lowercase, drop empties, and collapse duplicates (first wins).
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Split a comma-separated tag field and normalize it.
pub fn parse_tag_list(field: &str) -> Vec<String> {
    let parts: Vec<&str> = field.split(',').collect();
    normalize_tags(&parts)
}

pub fn check_title(title: &str, errors: &mut ValidationErrors) {
    let len = char_len(title);
    if len < TITLE_MIN_CHARS {
        errors.push(
            "title",
            format!("title must be at least {TITLE_MIN_CHARS} characters"),
        );
    } else if len > TITLE_MAX_CHARS {
        errors.push(
            "title",
            format!("title must be at most {TITLE_MAX_CHARS} characters"),
        );
    }
}

pub fn check_body(body: &str, errors: &mut ValidationErrors) {
    if char_len(body) < BODY_MIN_CHARS {
        errors.push(
            "body",
            format!("body must be at least {BODY_MIN_CHARS} characters"),
        );
    }
}

pub fn check_tag_name(name: &str, errors: &mut ValidationErrors) {
    let len = char_len(name);
    if !(TAG_NAME_MIN_CHARS..=TAG_NAME_MAX_CHARS).contains(&len) {
        errors.push(
            "tags",
            format!(
                "tag `{name}` must be between {TAG_NAME_MIN_CHARS} and {TAG_NAME_MAX_CHARS} characters"
            ),
        );
    }
}

/// Cardinality and per-tag length. Expects already-normalized tags.
pub fn check_tags(tags: &[String], errors: &mut ValidationErrors) {
    if tags.len() < TAGS_MIN {
        errors.push("tags", "at least one tag is required");
    } else if tags.len() > TAGS_MAX {
        errors.push("tags", format!("at most {TAGS_MAX} tags are allowed"));
    }
    for tag in tags {
        check_tag_name(tag, errors);
    }
}

pub fn check_username(username: &str, errors: &mut ValidationErrors) {
    let len = char_len(username);
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
        errors.push(
            "username",
            format!(
                "username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
            ),
        );
    } else if !username_re().is_match(username) {
        errors.push(
            "username",
            "username can only contain letters, numbers, underscores, and hyphens",
        );
    }
}

pub fn check_email(email: &str, errors: &mut ValidationErrors) {
    if !email_re().is_match(email) {
        errors.push("email", "invalid email address");
    }
}

/// Validate a complete question draft.
pub fn validate_question(title: &str, body: &str, tags: &[String]) -> Result<(), ForumError> {
    let mut errors = ValidationErrors::new();
    check_title(title, &mut errors);
    check_body(body, &mut errors);
    check_tags(tags, &mut errors);
    errors.into_result()
}

/// Validate a search query, returning it trimmed.
pub fn check_search_query(query: &str) -> Result<&str, ForumError> {
    let query = query.trim();
    if char_len(query) < SEARCH_QUERY_MIN_CHARS {
        return Err(ForumError::invalid(
            "q",
            format!("search query must be at least {SEARCH_QUERY_MIN_CHARS} characters"),
        ));
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_list_normalizes_and_dedupes() {
        assert_eq!(
            parse_tag_list(" ChatGPT, dalle ,,chatgpt, "),
            vec!["chatgpt".to_string(), "dalle".to_string()]
        );
    }

    #[test]
    fn question_draft_reports_every_failing_field() {
        let err = validate_question("short", "too short", &[]).expect_err("must fail");
        match err {
            ForumError::Validation(errors) => {
                assert!(errors.has_field("title"));
                assert!(errors.has_field("body"));
                assert!(errors.has_field("tags"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn tag_bounds_are_enforced() {
        let tags: Vec<String> = ["a", "bb", "cc", "dd", "ee", "ff"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let mut errors = ValidationErrors::new();
        check_tags(&tags, &mut errors);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"at most 5 tags are allowed"));
        assert!(messages.iter().any(|m| m.contains("`a`")));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        check_title(&"é".repeat(15), &mut errors);
        assert!(errors.is_empty());

        check_title(&"x".repeat(151), &mut errors);
        assert!(errors.has_field("title"));
    }

    #[test]
    fn username_shape_is_checked() {
        let mut errors = ValidationErrors::new();
        check_username("good_name-1", &mut errors);
        assert!(errors.is_empty());

        check_username("no spaces", &mut errors);
        check_username("ab", &mut errors);
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn email_shape_is_checked() {
        let mut errors = ValidationErrors::new();
        check_email("alice@example.com", &mut errors);
        assert!(errors.is_empty());
        check_email("alice.example.com", &mut errors);
        assert!(errors.has_field("email"));
    }

    #[test]
    fn search_query_needs_three_characters() {
        assert!(matches!(
            check_search_query("ab"),
            Err(ForumError::Validation(ref errors)) if errors.has_field("q")
        ));
        assert_eq!(check_search_query("  gpt ").expect("valid query"), "gpt");
    }
}
