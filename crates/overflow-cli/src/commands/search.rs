use overflow_query::ForumQuery;
use serde_json::json;

use crate::config::Settings;
use crate::support::{fail, load_forum_or_exit, print_json, question_json, question_line, tag_json};

pub fn run(settings: &Settings, query: String, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let results = ForumQuery::new(&forum)
        .search_all(&query)
        .unwrap_or_else(|e| fail(e));
    tracing::debug!(
        query = %results.query,
        questions = results.questions.len(),
        tags = results.tags.len(),
        "search finished"
    );

    if json_output {
        print_json(&json!({
            "action": "search",
            "query": results.query,
            "questions": results.questions.iter().map(|q| question_json(q)).collect::<Vec<_>>(),
            "tags": results.tags.iter().map(|t| tag_json(t)).collect::<Vec<_>>()
        }));
        return;
    }

    println!("overflow search");
    println!(
        "  Found {} questions and {} tags for \"{}\"",
        results.questions.len(),
        results.tags.len(),
        results.query
    );
    for question in &results.questions {
        println!("  - {}", question_line(question));
    }
    for tag in &results.tags {
        println!("  # {} x{}", tag.name, tag.count);
    }
}
