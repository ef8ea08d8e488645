use overflow_query::ForumQuery;
use serde_json::json;

use crate::config::Settings;
use crate::support::{load_forum_or_exit, print_json, question_json, question_line, tag_json};

pub fn run(settings: &Settings, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let query = ForumQuery::new(&forum);
    let page = query.front_page();

    if json_output {
        let questions = page
            .recent_questions
            .iter()
            .map(|q| {
                let mut item = question_json(q);
                item["answerCount"] = json!(query.answer_count(&q.id));
                item
            })
            .collect::<Vec<_>>();
        let tags = page.top_tags.iter().map(|t| tag_json(t)).collect::<Vec<_>>();
        print_json(&json!({
            "action": "front",
            "questions": questions,
            "tags": tags
        }));
        return;
    }

    println!("overflow front");
    println!("  Recent questions:");
    if page.recent_questions.is_empty() {
        println!("    (none yet)");
    }
    for question in &page.recent_questions {
        println!(
            "    - {} [{} answers]",
            question_line(question),
            query.answer_count(&question.id)
        );
    }
    println!("  Popular tags:");
    for tag in &page.top_tags {
        println!("    - {} x{}", tag.name, tag.count);
    }
}
