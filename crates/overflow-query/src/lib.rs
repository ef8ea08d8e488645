//! Query layer for forum state.
//!
//! `ForumQuery` borrows a [`Forum`] from `overflow-core` and answers the
//! read-side questions the pages ask: ordered listings, search, and the
//! composed user/tag/front/question views.
//!
//! It does not own canonical storage and never writes, except through
//! [`open_question`], which counts a view before reading.
//!
//! Every query is a full scan. Orderings use stable sorts over insertion
//! order, so equal keys keep the order in which records were created.

mod search;
mod views;

#[cfg(test)]
mod testing;

pub use search::SearchResults;
pub use views::{
    FRONT_PAGE_QUESTIONS, FRONT_PAGE_TAGS, FrontPage, QuestionDetail, TagPage, UserProfile,
    UserStats, open_question, open_shared_question,
};

use overflow_core::{Answer, Forum, Question, QuestionId, Tag, User, UserId};

/// Read-only view over one forum.
#[derive(Debug, Clone, Copy)]
pub struct ForumQuery<'a> {
    forum: &'a Forum,
}

impl<'a> ForumQuery<'a> {
    pub fn new(forum: &'a Forum) -> Self {
        Self { forum }
    }

    pub fn forum(&self) -> &'a Forum {
        self.forum
    }

    /// All questions, newest first.
    pub fn list_questions(&self) -> Vec<&'a Question> {
        newest_first(self.forum.questions().iter().collect())
    }

    /// Answers of one question: the accepted answer first, then by votes.
    pub fn list_answers_for_question(&self, question_id: &QuestionId) -> Vec<&'a Answer> {
        let mut answers: Vec<&'a Answer> = self
            .forum
            .answers()
            .iter()
            .filter(|a| a.question_id == *question_id)
            .collect();
        answers.sort_by(|a, b| {
            b.is_accepted
                .cmp(&a.is_accepted)
                .then_with(|| b.votes.cmp(&a.votes))
        });
        answers
    }

    pub fn answer_count(&self, question_id: &QuestionId) -> usize {
        self.forum
            .answers()
            .iter()
            .filter(|a| a.question_id == *question_id)
            .count()
    }

    /// Questions carrying `tag` exactly as stored (lowercase), newest first.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&'a Question> {
        newest_first(
            self.forum
                .questions()
                .iter()
                .filter(|q| q.has_tag(tag))
                .collect(),
        )
    }

    /// All tags, most used first.
    pub fn list_tags(&self) -> Vec<&'a Tag> {
        let mut tags: Vec<&'a Tag> = self.forum.tags().iter().collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count));
        tags
    }

    /// All users, highest reputation first.
    pub fn list_users(&self) -> Vec<&'a User> {
        let mut users: Vec<&'a User> = self.forum.users().iter().collect();
        users.sort_by(|a, b| b.reputation.cmp(&a.reputation));
        users
    }

    /// Questions asked by one user, in the order they were asked.
    pub fn questions_by_user(&self, user_id: &UserId) -> Vec<&'a Question> {
        self.forum
            .questions()
            .iter()
            .filter(|q| q.user_id == *user_id)
            .collect()
    }

    /// Answers written by one user, in the order they were posted.
    pub fn answers_by_user(&self, user_id: &UserId) -> Vec<&'a Answer> {
        self.forum
            .answers()
            .iter()
            .filter(|a| a.user_id == *user_id)
            .collect()
    }
}

fn newest_first(mut questions: Vec<&Question>) -> Vec<&Question> {
    questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{answer, forum, question, tag, user};

    fn titles(questions: &[&Question]) -> Vec<String> {
        questions.iter().map(|q| q.title.clone()).collect()
    }

    #[test]
    fn questions_list_newest_first_with_insertion_tie_break() {
        let forum = forum(vec![
            user("u-1", "alice", 0),
            question("q-old", "u-1", "Oldest question", &["chatgpt"], 0),
            question("q-tie-a", "u-1", "Tie inserted first", &["chatgpt"], 5),
            question("q-tie-b", "u-1", "Tie inserted second", &["chatgpt"], 5),
            question("q-new", "u-1", "Newest question", &["dalle"], 9),
        ]);
        let query = ForumQuery::new(&forum);
        insta::assert_json_snapshot!(titles(&query.list_questions()), @r###"
        [
          "Newest question",
          "Tie inserted first",
          "Tie inserted second",
          "Oldest question"
        ]
        "###);
    }

    #[test]
    fn accepted_answer_sorts_before_higher_votes() {
        let forum = forum(vec![
            user("u-1", "alice", 0),
            question("q-1", "u-1", "Question with answers", &["chatgpt"], 0),
            answer("a-other", "q-1", "u-1", 10, false, 1),
            answer("a-accepted", "q-1", "u-1", 2, true, 2),
            answer("a-low", "q-1", "u-1", -1, false, 3),
        ]);
        let ids: Vec<&str> = ForumQuery::new(&forum)
            .list_answers_for_question(&QuestionId::from("q-1"))
            .into_iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a-accepted", "a-other", "a-low"]);
    }

    #[test]
    fn tag_filter_matches_stored_name_exactly() {
        let forum = forum(vec![
            user("u-1", "alice", 0),
            question("q-1", "u-1", "Uses chatgpt", &["chatgpt"], 0),
            question("q-2", "u-1", "Uses chatgpt-4", &["chatgpt-4"], 1),
        ]);
        let query = ForumQuery::new(&forum);
        assert_eq!(titles(&query.filter_by_tag("chatgpt")), vec!["Uses chatgpt"]);
        assert!(query.filter_by_tag("ChatGPT").is_empty());
    }

    #[test]
    fn tags_and_users_rank_by_counter() {
        let forum = forum(vec![
            user("u-1", "alice", 3),
            user("u-2", "bob", 12),
            user("u-3", "carol", 3),
            tag("dalle", 1),
            tag("chatgpt", 4),
            tag("midjourney", 1),
        ]);
        let query = ForumQuery::new(&forum);

        let tags: Vec<&str> = query.list_tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["chatgpt", "dalle", "midjourney"]);

        let users: Vec<&str> = query
            .list_users()
            .iter()
            .map(|u| u.username.as_str())
            .collect();
        assert_eq!(users, vec!["bob", "alice", "carol"]);
    }
}
