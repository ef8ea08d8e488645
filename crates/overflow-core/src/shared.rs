//! In-process shared handle over one forum.
//!
//! `SharedForum` wraps a [`Forum`] in `Arc<RwLock<_>>`. Each rule runs in
//! a single write-locked critical section, so concurrent counter updates
//! are never lost and the accepted-answer flip is observed whole. Readers
//! take the read lock and see a consistent state.
//!
//! Rules check every precondition before writing, so a panic while the
//! lock is held cannot leave a half-applied mutation behind; a poisoned
//! lock is therefore recovered rather than propagated.

use std::sync::{Arc, PoisonError, RwLock};

use crate::answer::Answer;
use crate::error::ForumError;
use crate::ids::{AnswerId, QuestionId, UserId};
use crate::memory::Forum;
use crate::question::Question;
use crate::rules::{NewQuestion, VoteOutcome, VoteTarget, VoteValue};
use crate::tag::Tag;

#[derive(Debug, Clone, Default)]
pub struct SharedForum {
    inner: Arc<RwLock<Forum>>,
}

impl SharedForum {
    pub fn new(forum: Forum) -> Self {
        Self {
            inner: Arc::new(RwLock::new(forum)),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&Forum) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` under the write lock.
    pub fn write<T>(&self, f: impl FnOnce(&mut Forum) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// A detached copy of the current state.
    pub fn snapshot(&self) -> Forum {
        self.read(Forum::clone)
    }

    pub fn ask_question(
        &self,
        author_id: &UserId,
        draft: NewQuestion,
    ) -> Result<Question, ForumError> {
        self.write(|forum| forum.ask_question(author_id, draft))
    }

    pub fn post_answer(
        &self,
        question_id: &QuestionId,
        author_id: &UserId,
        body: &str,
    ) -> Result<Answer, ForumError> {
        self.write(|forum| forum.post_answer(question_id, author_id, body))
    }

    pub fn vote(
        &self,
        target: &VoteTarget,
        value: VoteValue,
        voter_id: &UserId,
    ) -> Result<VoteOutcome, ForumError> {
        self.write(|forum| forum.vote(target, value, voter_id))
    }

    pub fn accept_answer(
        &self,
        answer_id: &AnswerId,
        requester_id: &UserId,
    ) -> Result<Answer, ForumError> {
        self.write(|forum| forum.accept_answer(answer_id, requester_id))
    }

    pub fn increment_tag_usage(
        &self,
        name: &str,
        actor: Option<&UserId>,
    ) -> Result<Tag, ForumError> {
        self.write(|forum| forum.increment_tag_usage(name, actor))
    }

    pub fn increment_view_count(&self, question_id: &QuestionId) -> Result<Question, ForumError> {
        self.write(|forum| forum.increment_view_count(question_id))
    }
}

impl From<Forum> for SharedForum {
    fn from(forum: Forum) -> Self {
        Self::new(forum)
    }
}
