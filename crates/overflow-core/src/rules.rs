//! Counter consistency rules.
//!
//! Every mutation of the forum goes through one of these methods. Each rule
//! checks all of its preconditions first and only then writes, so a failed
//! call leaves the forum untouched. Invariants kept here:
//! - a vote moves the target's `votes` and its author's `reputation` together
//! - at most one answer per question is accepted
//! - a tag's `count` tracks the questions carrying it and never drops below 0
//! - `view_count` only grows

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::answer::Answer;
use crate::error::{ForumError, ValidationErrors};
use crate::ids::{AnswerId, EntityKind, QuestionId, UserId};
use crate::memory::Forum;
use crate::question::Question;
use crate::tag::Tag;
use crate::user::User;
use crate::validation::{
    check_body, check_email, check_tag_name, check_username, normalize_tags, validate_question,
};

/// Reputation granted to an answer's author when it is accepted.
pub const ACCEPT_REPUTATION_BONUS: i64 = 15;
/// Reputation granted for posting an answer.
pub const ANSWER_REPUTATION_BONUS: i64 = 1;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn delta(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = ForumError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            _ => Err(ForumError::invalid("value", "invalid vote value")),
        }
    }
}

impl FromStr for VoteValue {
    type Err = ForumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" | "+1" | "1" => Ok(VoteValue::Up),
            "down" | "-1" => Ok(VoteValue::Down),
            _ => Err(ForumError::invalid("value", "invalid vote value")),
        }
    }
}

/// What a vote is cast on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTarget {
    Question(QuestionId),
    Answer(AnswerId),
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTarget::Question(id) => write!(f, "question {id}"),
            VoteTarget::Answer(id) => write!(f, "answer {id}"),
        }
    }
}

/// Counters after a vote was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub target: VoteTarget,
    pub votes: i64,
    pub author_id: UserId,
    pub author_reputation: i64,
}

/// Input for [`Forum::ask_question`]. Tags are normalized by the rule.
#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Partial edit of a question. `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.tags.is_none()
    }
}

impl Forum {
    /// Create a user. Email and username must be unused (case-insensitive).
    pub fn register_user(
        &mut self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, ForumError> {
        let email = email.trim();
        let username = username.trim();

        let mut errors = ValidationErrors::new();
        check_email(email, &mut errors);
        check_username(username, &mut errors);
        if self.user_by_email(email).is_some() {
            errors.push("email", "email is already registered");
        }
        if self.user_by_username(username).is_some() {
            errors.push("username", "username is already taken");
        }
        errors.into_result()?;

        let user = self
            .users
            .insert(User::new(email, username, password_hash))?
            .clone();
        tracing::debug!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Insert a question and bump the usage count of each of its tags.
    pub fn ask_question(
        &mut self,
        author_id: &UserId,
        draft: NewQuestion,
    ) -> Result<Question, ForumError> {
        self.require_user(author_id)?;

        let title = draft.title.trim().to_string();
        let body = draft.body.trim().to_string();
        let tags = normalize_tags(&draft.tags);
        validate_question(&title, &body, &tags)?;

        let question = self
            .questions
            .insert(Question::new(author_id.clone(), title, body, tags))?
            .clone();
        for tag in &question.tags {
            self.increment_tag_usage(tag, Some(author_id))?;
        }
        tracing::debug!(question_id = %question.id, tags = ?question.tags, "question created");
        Ok(question)
    }

    /// Insert an answer and grant its author [`ANSWER_REPUTATION_BONUS`].
    pub fn post_answer(
        &mut self,
        question_id: &QuestionId,
        author_id: &UserId,
        body: &str,
    ) -> Result<Answer, ForumError> {
        self.require_question(question_id)?;
        self.require_user(author_id)?;

        let body = body.trim();
        let mut errors = ValidationErrors::new();
        check_body(body, &mut errors);
        errors.into_result()?;

        let answer = self
            .answers
            .insert(Answer::new(question_id.clone(), author_id.clone(), body))?
            .clone();
        let now = Utc::now();
        self.users.update(author_id, |user| {
            user.adjust_reputation(ANSWER_REPUTATION_BONUS, now)
        })?;
        tracing::debug!(answer_id = %answer.id, question_id = %question_id, "answer posted");
        Ok(answer)
    }

    /// Apply a partial edit to a question. Only its author may edit.
    ///
    /// Tags gained by the edit are counted up (created if needed); tags
    /// dropped by the edit are counted down.
    pub fn edit_question(
        &mut self,
        question_id: &QuestionId,
        requester_id: &UserId,
        patch: QuestionPatch,
    ) -> Result<Question, ForumError> {
        let current = self.require_question(question_id)?;
        if current.user_id != *requester_id {
            return Err(ForumError::permission(
                "only the question author can edit it",
            ));
        }

        let title = patch
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| current.title.clone());
        let body = patch
            .body
            .map(|b| b.trim().to_string())
            .unwrap_or_else(|| current.body.clone());
        let tags = patch
            .tags
            .map(|t| normalize_tags(&t))
            .unwrap_or_else(|| current.tags.clone());
        validate_question(&title, &body, &tags)?;

        let added: Vec<String> = tags
            .iter()
            .filter(|t| !current.has_tag(t))
            .cloned()
            .collect();
        let removed: Vec<String> = current
            .tags
            .iter()
            .filter(|t| !tags.contains(t))
            .cloned()
            .collect();

        let now = Utc::now();
        let question = self.questions.update(question_id, |q| {
            q.title = title;
            q.body = body;
            q.tags = tags;
            q.updated_at = now;
        })?;
        for tag in &added {
            self.increment_tag_usage(tag, Some(requester_id))?;
        }
        for tag in &removed {
            self.decrement_tag_usage(tag);
        }
        tracing::debug!(question_id = %question_id, ?added, ?removed, "question edited");
        Ok(question)
    }

    /// Replace an answer's body. Only its author may edit.
    pub fn edit_answer(
        &mut self,
        answer_id: &AnswerId,
        requester_id: &UserId,
        body: &str,
    ) -> Result<Answer, ForumError> {
        let current = self.require_answer(answer_id)?;
        if current.user_id != *requester_id {
            return Err(ForumError::permission("only the answer author can edit it"));
        }

        let body = body.trim().to_string();
        let mut errors = ValidationErrors::new();
        check_body(&body, &mut errors);
        errors.into_result()?;

        let now = Utc::now();
        self.answers.update(answer_id, |a| {
            a.body = body;
            a.updated_at = now;
        })
    }

    /// Cast one vote on a question or answer.
    ///
    /// Voting on your own post is rejected. Votes are not recorded per
    /// voter, so repeated votes by the same user all count.
    pub fn vote(
        &mut self,
        target: &VoteTarget,
        value: VoteValue,
        voter_id: &UserId,
    ) -> Result<VoteOutcome, ForumError> {
        let author_id = match target {
            VoteTarget::Question(id) => self.require_question(id)?.user_id.clone(),
            VoteTarget::Answer(id) => self.require_answer(id)?.user_id.clone(),
        };
        self.require_user(voter_id)?;
        if author_id == *voter_id {
            return Err(ForumError::invalid(
                "voter",
                "you cannot vote on your own post",
            ));
        }
        self.require_user(&author_id)?;

        let delta = value.delta();
        let now = Utc::now();
        let votes = match target {
            VoteTarget::Question(id) => {
                self.questions
                    .update(id, |q| {
                        q.votes += delta;
                        q.updated_at = now;
                    })?
                    .votes
            }
            VoteTarget::Answer(id) => {
                self.answers
                    .update(id, |a| {
                        a.votes += delta;
                        a.updated_at = now;
                    })?
                    .votes
            }
        };
        let author = self
            .users
            .update(&author_id, |user| user.adjust_reputation(delta, now))?;

        tracing::debug!(
            vote_target = %target,
            delta,
            votes,
            author_id = %author_id,
            "vote applied"
        );
        Ok(VoteOutcome {
            target: target.clone(),
            votes,
            author_id,
            author_reputation: author.reputation,
        })
    }

    /// Mark an answer as the accepted one for its question.
    ///
    /// Only the question's author may accept. Any previously accepted
    /// answer of the same question is un-accepted in the same call, and the
    /// answer's author gains [`ACCEPT_REPUTATION_BONUS`].
    pub fn accept_answer(
        &mut self,
        answer_id: &AnswerId,
        requester_id: &UserId,
    ) -> Result<Answer, ForumError> {
        let answer = self.require_answer(answer_id)?;
        let question_id = answer.question_id.clone();
        let answer_author = answer.user_id.clone();
        let question = self.require_question(&question_id)?;
        if question.user_id != *requester_id {
            return Err(ForumError::permission(
                "only the question author can accept an answer",
            ));
        }
        self.require_user(&answer_author)?;

        let now = Utc::now();
        for other in self.answers.iter_mut().filter(|a| {
            a.question_id == question_id && a.is_accepted && a.id != *answer_id
        }) {
            other.is_accepted = false;
            other.updated_at = now;
        }
        let accepted = self.answers.update(answer_id, |a| {
            a.is_accepted = true;
            a.updated_at = now;
        })?;
        self.users.update(&answer_author, |user| {
            user.adjust_reputation(ACCEPT_REPUTATION_BONUS, now)
        })?;

        tracing::debug!(answer_id = %answer_id, question_id = %question_id, "answer accepted");
        Ok(accepted)
    }

    /// Look a tag up by name (case-insensitive), creating it when absent.
    ///
    /// New tags start with count 0 and no description.
    pub fn get_or_create_tag(
        &mut self,
        name: &str,
        created_by: Option<&UserId>,
    ) -> Result<Tag, ForumError> {
        if let Some(tag) = self.tag_by_name(name) {
            return Ok(tag.clone());
        }

        let name = name.trim().to_lowercase();
        let mut errors = ValidationErrors::new();
        check_tag_name(&name, &mut errors);
        errors.into_result()?;

        let tag = self
            .tags
            .insert(Tag::new(&name, created_by.cloned()))?
            .clone();
        tracing::debug!(tag = %tag.name, created_by = ?tag.created_by, "tag created");
        Ok(tag)
    }

    /// Count one more question carrying `name`, creating the tag if needed.
    pub fn increment_tag_usage(
        &mut self,
        name: &str,
        actor: Option<&UserId>,
    ) -> Result<Tag, ForumError> {
        let tag = self.get_or_create_tag(name, actor)?;
        self.tags.update(&tag.id, |t| t.count += 1)
    }

    fn decrement_tag_usage(&mut self, name: &str) {
        if let Some(tag_id) = self.tag_by_name(name).map(|t| t.id.clone()) {
            let _ = self
                .tags
                .update(&tag_id, |t| t.count = t.count.saturating_sub(1));
        }
    }

    /// Set or clear a tag's description.
    pub fn describe_tag(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<Tag, ForumError> {
        let tag_id = self
            .tag_by_name(name)
            .map(|t| t.id.clone())
            .ok_or_else(|| ForumError::not_found(EntityKind::Tag, name.trim()))?;
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.tags.update(&tag_id, |t| t.description = description)
    }

    /// Count one view of a question. Every fetch counts, including repeats.
    pub fn increment_view_count(
        &mut self,
        question_id: &QuestionId,
    ) -> Result<Question, ForumError> {
        self.questions
            .update(question_id, |q| q.view_count = q.view_count.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "This body is comfortably longer than thirty characters.";

    fn forum_with_users(names: &[&str]) -> (Forum, Vec<UserId>) {
        let mut forum = Forum::new();
        let ids = names
            .iter()
            .map(|name| {
                forum
                    .register_user(&format!("{name}@example.com"), name, "hash")
                    .expect("user should register")
                    .id
            })
            .collect();
        (forum, ids)
    }

    fn draft(title: &str, tags: &[&str]) -> NewQuestion {
        NewQuestion {
            title: title.to_string(),
            body: BODY.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn votes_move_target_and_author_reputation_together() {
        let (mut forum, users) = forum_with_users(&["alice", "bob", "carol", "dave"]);
        let question = forum
            .ask_question(&users[0], draft("How should I phrase this?", &["chatgpt"]))
            .expect("question should be created");
        let target = VoteTarget::Question(question.id.clone());

        forum.vote(&target, VoteValue::Up, &users[1]).expect("vote");
        forum.vote(&target, VoteValue::Up, &users[2]).expect("vote");
        let outcome = forum
            .vote(&target, VoteValue::Down, &users[3])
            .expect("vote");

        assert_eq!(outcome.votes, 1);
        assert_eq!(outcome.author_reputation, 1);
        assert_eq!(forum.question(&question.id).expect("question").votes, 1);
        assert_eq!(forum.user(&users[0]).expect("author").reputation, 1);
    }

    #[test]
    fn self_vote_is_rejected_without_side_effects() {
        let (mut forum, users) = forum_with_users(&["alice", "bob"]);
        let question = forum
            .ask_question(&users[0], draft("How should I phrase this?", &["chatgpt"]))
            .expect("question");
        let answer = forum
            .post_answer(&question.id, &users[1], BODY)
            .expect("answer");
        let bob_reputation = forum.user(&users[1]).expect("bob").reputation;

        let err = forum
            .vote(&VoteTarget::Answer(answer.id.clone()), VoteValue::Up, &users[1])
            .expect_err("self-vote must fail");
        assert!(matches!(err, ForumError::Validation(_)));
        assert_eq!(forum.answer(&answer.id).expect("answer").votes, 0);
        assert_eq!(forum.user(&users[1]).expect("bob").reputation, bob_reputation);
    }

    #[test]
    fn vote_on_missing_target_reports_not_found() {
        let (mut forum, users) = forum_with_users(&["alice"]);
        let err = forum
            .vote(
                &VoteTarget::Question(QuestionId::from("q-missing")),
                VoteValue::Up,
                &users[0],
            )
            .expect_err("missing target must fail");
        assert!(matches!(
            err,
            ForumError::NotFound { kind: EntityKind::Question, .. }
        ));
    }

    #[test]
    fn raw_vote_values_other_than_unit_are_invalid() {
        assert_eq!(VoteValue::try_from(-1).expect("down"), VoteValue::Down);
        assert!(VoteValue::try_from(2).is_err());
        assert!("sideways".parse::<VoteValue>().is_err());
        assert_eq!("up".parse::<VoteValue>().expect("up"), VoteValue::Up);
    }

    #[test]
    fn accepting_flips_previous_answer_and_keeps_one_accepted() {
        let (mut forum, users) = forum_with_users(&["alice", "bob", "carol"]);
        let question = forum
            .ask_question(&users[0], draft("How should I phrase this?", &["chatgpt"]))
            .expect("question");
        let first = forum
            .post_answer(&question.id, &users[1], BODY)
            .expect("answer");
        let second = forum
            .post_answer(&question.id, &users[2], BODY)
            .expect("answer");

        forum.accept_answer(&first.id, &users[0]).expect("accept");
        forum.accept_answer(&second.id, &users[0]).expect("accept");

        let accepted: Vec<&AnswerId> = forum
            .answers_to(&question.id)
            .filter(|a| a.is_accepted)
            .map(|a| &a.id)
            .collect();
        assert_eq!(accepted, vec![&second.id]);
        assert_eq!(
            forum.user(&users[2]).expect("carol").reputation,
            ANSWER_REPUTATION_BONUS + ACCEPT_REPUTATION_BONUS
        );
    }

    #[test]
    fn only_question_author_can_accept() {
        let (mut forum, users) = forum_with_users(&["alice", "bob"]);
        let question = forum
            .ask_question(&users[0], draft("How should I phrase this?", &["chatgpt"]))
            .expect("question");
        let answer = forum
            .post_answer(&question.id, &users[1], BODY)
            .expect("answer");

        let err = forum
            .accept_answer(&answer.id, &users[1])
            .expect_err("non-author must be refused");
        assert!(matches!(err, ForumError::Permission(_)));
        assert!(forum.answers_to(&question.id).all(|a| !a.is_accepted));
        assert_eq!(
            forum.user(&users[1]).expect("bob").reputation,
            ANSWER_REPUTATION_BONUS
        );
    }

    #[test]
    fn tag_usage_is_case_insensitive_and_creates_lazily() {
        let mut forum = Forum::new();
        let created = forum
            .increment_tag_usage("NewTag", None)
            .expect("tag should be created");
        assert_eq!(created.name, "newtag");
        assert_eq!(created.count, 1);

        let again = forum
            .increment_tag_usage("NEWTAG", None)
            .expect("tag should be found");
        assert_eq!(again.id, created.id);
        assert_eq!(again.count, 2);
        assert_eq!(forum.tags().len(), 1);
    }

    #[test]
    fn asking_counts_each_tag_once_and_records_creator() {
        let (mut forum, users) = forum_with_users(&["alice"]);
        forum
            .ask_question(
                &users[0],
                draft("Which sampler works best?", &["Stable-Diffusion", "samplers", "samplers"]),
            )
            .expect("question");

        let samplers = forum.tag_by_name("samplers").expect("tag created");
        assert_eq!(samplers.count, 1);
        assert_eq!(samplers.created_by.as_ref(), Some(&users[0]));
        assert_eq!(forum.tag_by_name("stable-diffusion").expect("tag").count, 1);
    }

    #[test]
    fn invalid_question_creates_nothing() {
        let (mut forum, users) = forum_with_users(&["alice"]);
        let err = forum
            .ask_question(&users[0], draft("short", &["fresh-tag"]))
            .expect_err("short title must fail");
        assert!(matches!(err, ForumError::Validation(_)));
        assert!(forum.questions().is_empty());
        assert!(forum.tag_by_name("fresh-tag").is_none());
    }

    #[test]
    fn editing_tags_moves_usage_counts() {
        let (mut forum, users) = forum_with_users(&["alice", "bob"]);
        let question = forum
            .ask_question(&users[0], draft("How should I phrase this?", &["chatgpt", "dalle"]))
            .expect("question");

        let err = forum
            .edit_question(&question.id, &users[1], QuestionPatch::default())
            .expect_err("non-owner edit must fail");
        assert!(matches!(err, ForumError::Permission(_)));

        let edited = forum
            .edit_question(
                &question.id,
                &users[0],
                QuestionPatch {
                    tags: Some(vec!["chatgpt".to_string(), "midjourney".to_string()]),
                    ..QuestionPatch::default()
                },
            )
            .expect("owner edit");
        assert_eq!(edited.tags, vec!["chatgpt", "midjourney"]);
        assert_eq!(forum.tag_by_name("chatgpt").expect("tag").count, 1);
        assert_eq!(forum.tag_by_name("dalle").expect("tag").count, 0);
        assert_eq!(forum.tag_by_name("midjourney").expect("tag").count, 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let (mut forum, _) = forum_with_users(&["alice"]);
        let err = forum
            .register_user("ALICE@example.com", "Alice", "hash")
            .expect_err("duplicate must fail");
        match err {
            ForumError::Validation(errors) => {
                assert!(errors.has_field("email"));
                assert!(errors.has_field("username"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn view_count_grows_on_every_fetch() {
        let (mut forum, users) = forum_with_users(&["alice"]);
        let question = forum
            .ask_question(&users[0], draft("How should I phrase this?", &["chatgpt"]))
            .expect("question");
        forum.increment_view_count(&question.id).expect("view");
        let viewed = forum.increment_view_count(&question.id).expect("view");
        assert_eq!(viewed.view_count, 2);

        assert!(matches!(
            forum.increment_view_count(&QuestionId::from("q-missing")),
            Err(ForumError::NotFound { kind: EntityKind::Question, .. })
        ));
    }

    #[test]
    fn describe_tag_requires_existing_tag() {
        let mut forum = Forum::new();
        forum.get_or_create_tag("dalle", None).expect("tag");
        let described = forum
            .describe_tag("DALLE", Some("  Image prompts  ".to_string()))
            .expect("describe");
        assert_eq!(described.description.as_deref(), Some("Image prompts"));
        assert!(matches!(
            forum.describe_tag("unknown", None),
            Err(ForumError::NotFound { kind: EntityKind::Tag, .. })
        ));
    }
}
