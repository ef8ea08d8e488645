use overflow_core::{NewQuestion, QuestionId, QuestionPatch, UserId, parse_tag_list};
use overflow_query::{ForumQuery, QuestionDetail, open_question};
use serde_json::json;
use std::collections::BTreeMap;

use crate::cli::QuestionCommands;
use crate::config::Settings;
use crate::support::{
    acting_user, answer_json, fail, load_forum_or_exit, mutate_forum_or_exit, print_json,
    question_json, question_line, render_body,
};

pub fn run(settings: &Settings, command: QuestionCommands) {
    match command {
        QuestionCommands::Ask {
            title,
            body,
            tags,
            json,
        } => run_ask(settings, title, body, tags, json),

        QuestionCommands::List { tag, json } => run_list(settings, tag, json),

        QuestionCommands::Show { id, html, json } => run_show(settings, id, html, json),

        QuestionCommands::Edit {
            id,
            title,
            body,
            tags,
            json,
        } => run_edit(settings, id, title, body, tags, json),
    }
}

fn run_ask(settings: &Settings, title: String, body: String, tags: String, json_output: bool) {
    let draft = NewQuestion {
        title,
        body,
        tags: parse_tag_list(&tags),
    };
    let question = mutate_forum_or_exit(settings, |forum| {
        let author = acting_user(forum, settings)?;
        let question = forum.ask_question(&author, draft)?;
        Ok((question, true))
    });
    tracing::info!(question_id = %question.id, "question asked");

    if json_output {
        print_json(&json!({
            "action": "question.ask",
            "storePath": settings.store.display().to_string(),
            "question": question_json(&question)
        }));
    } else {
        println!(
            "overflow question ask\n  Asked: {}\n  Title: {}\n  Tags: {}\n  Path: {}",
            question.id,
            question.title,
            question.tags.join(", "),
            settings.store.display()
        );
    }
}

fn run_list(settings: &Settings, tag: Option<String>, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let query = ForumQuery::new(&forum);
    let tag = tag.map(|t| t.trim().to_lowercase());
    let rows = match &tag {
        Some(tag) => query.filter_by_tag(tag),
        None => query.list_questions(),
    };

    if json_output {
        let items = rows
            .iter()
            .map(|q| {
                let mut item = question_json(q);
                item["answerCount"] = json!(query.answer_count(&q.id));
                item
            })
            .collect::<Vec<_>>();
        print_json(&json!({
            "action": "question.list",
            "tag": tag,
            "count": items.len(),
            "items": items
        }));
        return;
    }

    println!("overflow question list");
    if rows.is_empty() {
        println!("  (no questions)");
    }
    for question in rows {
        println!(
            "  - {} [{} answers]",
            question_line(question),
            query.answer_count(&question.id)
        );
    }
}

fn run_show(settings: &Settings, id: String, html: bool, json_output: bool) {
    let question_id = QuestionId::from(id);
    let (detail, usernames) = mutate_forum_or_exit(settings, |forum| {
        let detail = open_question(forum, &question_id)?;
        let usernames = author_names(&detail, |user_id| {
            forum.user(user_id).map(|u| u.username.clone())
        });
        Ok(((detail, usernames), true))
    });
    let name_of = |user_id: &UserId| {
        usernames
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    };

    if json_output {
        let mut question = question_json(&detail.question);
        question["author"] = json!(name_of(&detail.question.user_id));
        question["bodyHtml"] = json!(render_body(&detail.question.body));
        let answers = detail
            .answers
            .iter()
            .map(|a| {
                let mut item = answer_json(a);
                item["author"] = json!(name_of(&a.user_id));
                item["bodyHtml"] = json!(render_body(&a.body));
                item
            })
            .collect::<Vec<_>>();
        print_json(&json!({
            "action": "question.show",
            "question": question,
            "answers": answers
        }));
        return;
    }

    let show_body = |body: &str| {
        if html {
            render_body(body)
        } else {
            body.to_string()
        }
    };
    let question = &detail.question;
    println!("overflow question show");
    println!("  {}", question_line(question));
    println!("  asked by {}", name_of(&question.user_id));
    println!();
    for line in show_body(&question.body).lines() {
        println!("  {line}");
    }
    println!();
    println!("  {} answers", detail.answers.len());
    for answer in &detail.answers {
        let marker = if answer.is_accepted { " (accepted)" } else { "" };
        println!(
            "  - {} [{} votes]{} by {}",
            answer.id,
            answer.votes,
            marker,
            name_of(&answer.user_id)
        );
        for line in show_body(&answer.body).lines() {
            println!("      {line}");
        }
    }
}

fn run_edit(
    settings: &Settings,
    id: String,
    title: Option<String>,
    body: Option<String>,
    tags: Option<String>,
    json_output: bool,
) {
    let patch = QuestionPatch {
        title,
        body,
        tags: tags.as_deref().map(parse_tag_list),
    };
    if patch.is_empty() {
        fail("no update fields provided");
    }

    let question_id = QuestionId::from(id);
    let question = mutate_forum_or_exit(settings, |forum| {
        let editor = acting_user(forum, settings)?;
        let question = forum.edit_question(&question_id, &editor, patch)?;
        Ok((question, true))
    });
    tracing::info!(question_id = %question.id, "question edited");

    if json_output {
        print_json(&json!({
            "action": "question.edit",
            "storePath": settings.store.display().to_string(),
            "question": question_json(&question)
        }));
    } else {
        println!(
            "overflow question edit\n  Updated: {}\n  Title: {}\n  Tags: {}",
            question.id,
            question.title,
            question.tags.join(", ")
        );
    }
}

fn author_names(
    detail: &QuestionDetail,
    lookup: impl Fn(&UserId) -> Option<String>,
) -> BTreeMap<UserId, String> {
    std::iter::once(&detail.question.user_id)
        .chain(detail.answers.iter().map(|a| &a.user_id))
        .filter_map(|id| lookup(id).map(|name| (id.clone(), name)))
        .collect()
}
