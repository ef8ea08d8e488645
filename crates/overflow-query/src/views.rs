//! Composed page views.
//!
//! Each view gathers what one page shows in a single pass over the
//! forum. `open_question` is the only one that writes: it counts a view
//! and then reads, so the returned detail already includes that view.

use serde::Serialize;

use overflow_core::{
    Answer, EntityKind, Forum, ForumError, Question, QuestionId, SharedForum, Tag, User, UserId,
};

use crate::ForumQuery;

/// Questions shown on the front page.
pub const FRONT_PAGE_QUESTIONS: usize = 5;
/// Tags shown on the front page.
pub const FRONT_PAGE_TAGS: usize = 10;

/// Activity counters shown on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub question_count: usize,
    pub answer_count: usize,
    pub accepted_answer_count: usize,
}

#[derive(Debug, Clone)]
pub struct UserProfile<'a> {
    pub user: &'a User,
    pub questions: Vec<&'a Question>,
    pub answers: Vec<&'a Answer>,
    pub stats: UserStats,
}

#[derive(Debug, Clone)]
pub struct TagPage<'a> {
    pub tag: &'a Tag,
    pub questions: Vec<&'a Question>,
}

#[derive(Debug, Clone)]
pub struct FrontPage<'a> {
    pub recent_questions: Vec<&'a Question>,
    pub top_tags: Vec<&'a Tag>,
}

/// A question with its ordered answers, detached from the forum.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDetail {
    pub question: Question,
    pub answers: Vec<Answer>,
}

impl<'a> ForumQuery<'a> {
    pub fn user_profile(&self, user_id: &UserId) -> Result<UserProfile<'a>, ForumError> {
        let user = self
            .forum()
            .user(user_id)
            .ok_or_else(|| ForumError::not_found(EntityKind::User, user_id))?;
        let questions = self.questions_by_user(user_id);
        let answers = self.answers_by_user(user_id);
        let stats = UserStats {
            question_count: questions.len(),
            answer_count: answers.len(),
            accepted_answer_count: answers.iter().filter(|a| a.is_accepted).count(),
        };
        Ok(UserProfile {
            user,
            questions,
            answers,
            stats,
        })
    }

    /// A tag (looked up ignoring case) with the questions carrying it.
    pub fn tag_page(&self, name: &str) -> Result<TagPage<'a>, ForumError> {
        let tag = self
            .forum()
            .tag_by_name(name)
            .ok_or_else(|| ForumError::not_found(EntityKind::Tag, name.trim()))?;
        Ok(TagPage {
            tag,
            questions: self.filter_by_tag(&tag.name),
        })
    }

    pub fn front_page(&self) -> FrontPage<'a> {
        let mut recent_questions = self.list_questions();
        recent_questions.truncate(FRONT_PAGE_QUESTIONS);
        let mut top_tags = self.list_tags();
        top_tags.truncate(FRONT_PAGE_TAGS);
        FrontPage {
            recent_questions,
            top_tags,
        }
    }

    /// Question and ordered answers, without counting a view.
    pub fn question_detail(&self, question_id: &QuestionId) -> Result<QuestionDetail, ForumError> {
        let question = self
            .forum()
            .question(question_id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Question, question_id))?;
        Ok(QuestionDetail {
            question: question.clone(),
            answers: self
                .list_answers_for_question(question_id)
                .into_iter()
                .cloned()
                .collect(),
        })
    }
}

/// Count one view of a question, then return it with its ordered answers.
pub fn open_question(
    forum: &mut Forum,
    question_id: &QuestionId,
) -> Result<QuestionDetail, ForumError> {
    forum.increment_view_count(question_id)?;
    ForumQuery::new(forum).question_detail(question_id)
}

/// [`open_question`] as one write-locked step on a shared forum.
pub fn open_shared_question(
    shared: &SharedForum,
    question_id: &QuestionId,
) -> Result<QuestionDetail, ForumError> {
    shared.write(|forum| open_question(forum, question_id))
}
