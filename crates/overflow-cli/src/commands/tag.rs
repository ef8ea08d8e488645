use overflow_query::ForumQuery;
use serde_json::json;

use crate::cli::TagCommands;
use crate::config::Settings;
use crate::support::{
    acting_user, fail, load_forum_or_exit, mutate_forum_or_exit, print_json, question_json,
    question_line, tag_json,
};

pub fn run(settings: &Settings, command: TagCommands) {
    match command {
        TagCommands::List { json } => run_list(settings, json),

        TagCommands::Show { name, json } => run_show(settings, name, json),

        TagCommands::Describe {
            name,
            description,
            json,
        } => run_describe(settings, name, description, json),
    }
}

fn run_list(settings: &Settings, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let tags = ForumQuery::new(&forum).list_tags();

    if json_output {
        print_json(&json!({
            "action": "tag.list",
            "count": tags.len(),
            "items": tags.iter().map(|t| tag_json(t)).collect::<Vec<_>>()
        }));
        return;
    }

    println!("overflow tag list");
    for tag in tags {
        match &tag.description {
            Some(description) => println!("  - {} x{}: {}", tag.name, tag.count, description),
            None => println!("  - {} x{}", tag.name, tag.count),
        }
    }
}

fn run_show(settings: &Settings, name: String, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let page = ForumQuery::new(&forum)
        .tag_page(&name)
        .unwrap_or_else(|e| fail(e));

    if json_output {
        print_json(&json!({
            "action": "tag.show",
            "tag": tag_json(page.tag),
            "questions": page.questions.iter().map(|q| question_json(q)).collect::<Vec<_>>()
        }));
        return;
    }

    println!("overflow tag show");
    println!("  {} x{}", page.tag.name, page.tag.count);
    if let Some(description) = &page.tag.description {
        println!("  {description}");
    }
    for question in &page.questions {
        println!("  - {}", question_line(question));
    }
}

fn run_describe(
    settings: &Settings,
    name: String,
    description: Option<String>,
    json_output: bool,
) {
    let tag = mutate_forum_or_exit(settings, |forum| {
        acting_user(forum, settings)?;
        let tag = forum.describe_tag(&name, description)?;
        Ok((tag, true))
    });
    tracing::info!(tag = %tag.name, "tag described");

    if json_output {
        print_json(&json!({
            "action": "tag.describe",
            "storePath": settings.store.display().to_string(),
            "tag": tag_json(&tag)
        }));
    } else {
        println!(
            "overflow tag describe\n  Tag: {}\n  Description: {}",
            tag.name,
            tag.description.as_deref().unwrap_or("(none)")
        );
    }
}
