//! Canonical in-memory forum state.
//!
//! This is the memory boundary for `overflow-core`:
//! - own the four entity stores (users, questions, answers, tags)
//! - load/store JSONL snapshots
//! - expose id-keyed and secondary lookups
//!
//! A `Forum` is an explicit value: construct one per process (or per test)
//! and hand it to the rules and query layers. Mutations live in
//! [`crate::rules`].

use std::path::Path;

use crate::answer::Answer;
use crate::collection::Collection;
use crate::error::{ForumError, ValidationErrors};
use crate::ids::{AnswerId, QuestionId, TagId, UserId};
use crate::jsonl::{ForumRecord, JsonlError, load_snapshot, store_snapshot};
use crate::question::Question;
use crate::tag::{SeedTag, Tag};
use crate::user::User;
use crate::validation::check_tag_name;

/// The four entity stores of one forum.
#[derive(Debug, Clone, Default)]
pub struct Forum {
    pub(crate) users: Collection<User>,
    pub(crate) questions: Collection<Question>,
    pub(crate) answers: Collection<Answer>,
    pub(crate) tags: Collection<Tag>,
}

impl Forum {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh forum holding the given seed tags (count 0, no creator).
    ///
    /// Seeds whose name is already present (case-insensitively) are skipped.
    /// A seed with an invalid name fails the whole construction.
    pub fn seeded(seeds: &[SeedTag]) -> Result<Self, ForumError> {
        let mut forum = Self::new();
        for seed in seeds {
            forum.install_seed_tag(seed)?;
        }
        Ok(forum)
    }

    /// Add one seed tag if no tag with that name exists. Returns whether it was added.
    ///
    /// Seed names obey the same length limits as tags created by questions.
    pub fn install_seed_tag(&mut self, seed: &SeedTag) -> Result<bool, ForumError> {
        let name = seed.name.trim().to_lowercase();
        let mut errors = ValidationErrors::new();
        check_tag_name(&name, &mut errors);
        errors.into_result()?;

        if self.tag_by_name(&name).is_some() {
            return Ok(false);
        }
        let mut tag = Tag::new(&name, None);
        if !seed.description.is_empty() {
            tag.description = Some(seed.description.clone());
        }
        self.tags.insert(tag)?;
        Ok(true)
    }

    /// Build a forum from persisted records, keeping their order.
    pub fn from_records(records: Vec<ForumRecord>) -> Self {
        let mut users = Vec::new();
        let mut questions = Vec::new();
        let mut answers = Vec::new();
        let mut tags = Vec::new();
        for record in records {
            match record {
                ForumRecord::User(user) => users.push(user),
                ForumRecord::Tag(tag) => tags.push(tag),
                ForumRecord::Question(question) => questions.push(question),
                ForumRecord::Answer(answer) => answers.push(answer),
            }
        }
        Self {
            users: Collection::from_records(users),
            questions: Collection::from_records(questions),
            answers: Collection::from_records(answers),
            tags: Collection::from_records(tags),
        }
    }

    /// Flatten into records: users, tags, questions, answers, each in insertion order.
    pub fn to_records(&self) -> Vec<ForumRecord> {
        self.users
            .iter()
            .cloned()
            .map(ForumRecord::User)
            .chain(self.tags.iter().cloned().map(ForumRecord::Tag))
            .chain(self.questions.iter().cloned().map(ForumRecord::Question))
            .chain(self.answers.iter().cloned().map(ForumRecord::Answer))
            .collect()
    }

    /// Load forum state from a JSONL file, refusing snapshots that break
    /// a forum invariant.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, JsonlError> {
        load_snapshot(path.as_ref())
    }

    /// Persist forum state to a JSONL file.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), JsonlError> {
        store_snapshot(path.as_ref(), self)
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn questions(&self) -> &Collection<Question> {
        &self.questions
    }

    pub fn answers(&self) -> &Collection<Answer> {
        &self.answers
    }

    pub fn tags(&self) -> &Collection<Tag> {
        &self.tags
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn answer(&self, id: &AnswerId) -> Option<&Answer> {
        self.answers.get(id)
    }

    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.get(id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users.find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        let username = username.trim();
        self.users
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    /// Case-insensitive tag lookup.
    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.find(|t| t.matches_name(name))
    }

    /// Answers of one question, in insertion order.
    pub fn answers_to<'a>(
        &'a self,
        question_id: &'a QuestionId,
    ) -> impl Iterator<Item = &'a Answer> {
        self.answers.filter(move |a| a.question_id == *question_id)
    }

    pub fn questions_by<'a>(&'a self, user_id: &'a UserId) -> impl Iterator<Item = &'a Question> {
        self.questions.filter(move |q| q.user_id == *user_id)
    }

    pub(crate) fn require_user(&self, id: &UserId) -> Result<&User, ForumError> {
        self.users.require(id)
    }

    pub(crate) fn require_question(&self, id: &QuestionId) -> Result<&Question, ForumError> {
        self.questions.require(id)
    }

    pub(crate) fn require_answer(&self, id: &AnswerId) -> Result<&Answer, ForumError> {
        self.answers.require(id)
    }
}
