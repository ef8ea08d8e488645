//! Substring search over questions and tags.

use overflow_core::{ForumError, Question, Tag, check_search_query};

use crate::ForumQuery;

/// Combined result of one search request.
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    /// The query as matched, trimmed.
    pub query: String,
    pub questions: Vec<&'a Question>,
    pub tags: Vec<&'a Tag>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.tags.is_empty()
    }
}

impl<'a> ForumQuery<'a> {
    /// Questions whose title, body, or tags contain `query`, ignoring case.
    ///
    /// Results are ordered like [`ForumQuery::list_questions`].
    pub fn search(&self, query: &str) -> Result<Vec<&'a Question>, ForumError> {
        let needle = check_search_query(query)?.to_lowercase();
        Ok(self.matching_questions(&needle))
    }

    /// Tags whose name or description contain `query`, ignoring case.
    pub fn search_tags(&self, query: &str) -> Result<Vec<&'a Tag>, ForumError> {
        let needle = check_search_query(query)?.to_lowercase();
        Ok(self.matching_tags(&needle))
    }

    /// Questions and tags for one query, validated once.
    pub fn search_all(&self, query: &str) -> Result<SearchResults<'a>, ForumError> {
        let query = check_search_query(query)?;
        let needle = query.to_lowercase();
        Ok(SearchResults {
            query: query.to_string(),
            questions: self.matching_questions(&needle),
            tags: self.matching_tags(&needle),
        })
    }

    fn matching_questions(&self, needle: &str) -> Vec<&'a Question> {
        self.list_questions()
            .into_iter()
            .filter(|q| q.mentions(needle))
            .collect()
    }

    fn matching_tags(&self, needle: &str) -> Vec<&'a Tag> {
        self.forum()
            .tags()
            .iter()
            .filter(|tag| {
                tag.name.to_lowercase().contains(needle)
                    || tag
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(needle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{described_tag, forum, question, tag, user};

    fn sample() -> overflow_core::Forum {
        forum(vec![
            user("u-1", "alice", 0),
            described_tag("chatgpt", 2, "Questions about ChatGPT prompts"),
            tag("dalle", 1),
            described_tag("prompt-engineering", 0, "General technique, any model"),
            question("q-1", "u-1", "Making GPT answer tersely", &["chatgpt"], 0),
            question("q-2", "u-1", "Upscaling faces in portraits", &["dalle"], 1),
            question("q-3", "u-1", "System prompt for code review", &["chatgpt"], 2),
        ])
    }

    #[test]
    fn short_queries_fail_validation() {
        let forum = sample();
        let query = ForumQuery::new(&forum);
        for short in ["", "ab", "  ab  "] {
            assert!(matches!(
                query.search(short),
                Err(ForumError::Validation(ref errors)) if errors.has_field("q")
            ));
        }
        assert!(query.search_all("ab").is_err());
    }

    #[test]
    fn question_search_covers_title_body_and_tags() {
        let forum = sample();
        let hits: Vec<&str> = ForumQuery::new(&forum)
            .search("GPT")
            .expect("valid query")
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        // q-3 matches through its tag only; newest first.
        assert_eq!(hits, vec!["q-3", "q-1"]);
    }

    #[test]
    fn tag_search_matches_name_or_description_in_insertion_order() {
        let forum = sample();
        let query = ForumQuery::new(&forum);
        let names = |q: &str| -> Vec<String> {
            query
                .search_tags(q)
                .expect("valid query")
                .iter()
                .map(|t| t.name.clone())
                .collect()
        };
        assert_eq!(names("CHATGPT"), vec!["chatgpt"]);
        assert_eq!(names("technique"), vec!["prompt-engineering"]);
        assert_eq!(names("prompt"), vec!["chatgpt", "prompt-engineering"]);
        assert!(names("midjourney").is_empty());
        assert!(matches!(
            query.search_tags(" x "),
            Err(ForumError::Validation(ref errors)) if errors.has_field("q")
        ));
    }

    #[test]
    fn combined_search_reports_tags_by_name_or_description() {
        let forum = sample();
        let results = ForumQuery::new(&forum)
            .search_all("  prompt ")
            .expect("valid query");
        assert!(!results.is_empty());
        let tags: Vec<&str> = results.tags.iter().map(|t| t.name.as_str()).collect();
        let questions: Vec<&str> = results.questions.iter().map(|q| q.id.as_str()).collect();
        insta::assert_json_snapshot!(
            serde_json::json!({
                "query": results.query,
                "questions": questions,
                "tags": tags,
            }),
            @r###"
        {
          "query": "prompt",
          "questions": [
            "q-3"
          ],
          "tags": [
            "chatgpt",
            "prompt-engineering"
          ]
        }
        "###
        );
    }
}
