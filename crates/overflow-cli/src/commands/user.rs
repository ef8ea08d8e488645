use overflow_core::{EntityKind, ForumError};
use overflow_query::ForumQuery;
use serde_json::json;

use crate::cli::UserCommands;
use crate::config::Settings;
use crate::support::{
    answer_json, fail, find_user, load_forum_or_exit, mutate_forum_or_exit, print_json,
    question_json, question_line, user_json,
};

pub fn run(settings: &Settings, command: UserCommands) {
    match command {
        UserCommands::Register {
            email,
            username,
            password_hash,
            json,
        } => run_register(settings, email, username, password_hash, json),

        UserCommands::Show { user, json } => run_show(settings, user, json),

        UserCommands::List { json } => run_list(settings, json),
    }
}

fn run_register(
    settings: &Settings,
    email: String,
    username: String,
    password_hash: String,
    json_output: bool,
) {
    let user = mutate_forum_or_exit(settings, |forum| {
        let user = forum.register_user(&email, &username, &password_hash)?;
        Ok((user, true))
    });
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    if json_output {
        print_json(&json!({
            "action": "user.register",
            "storePath": settings.store.display().to_string(),
            "user": user_json(&user)
        }));
    } else {
        println!(
            "overflow user register\n  Registered: {} ({})\n  Path: {}",
            user.username,
            user.id,
            settings.store.display()
        );
    }
}

fn run_show(settings: &Settings, key: String, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let user = find_user(&forum, &key)
        .unwrap_or_else(|| fail(ForumError::not_found(EntityKind::User, key.trim())));
    let profile = ForumQuery::new(&forum)
        .user_profile(&user.id)
        .unwrap_or_else(|e| fail(e));

    if json_output {
        print_json(&json!({
            "action": "user.show",
            "user": user_json(profile.user),
            "stats": profile.stats,
            "questions": profile.questions.iter().map(|q| question_json(q)).collect::<Vec<_>>(),
            "answers": profile.answers.iter().map(|a| answer_json(a)).collect::<Vec<_>>()
        }));
        return;
    }

    println!("overflow user show");
    println!(
        "  {} ({}) reputation {}",
        profile.user.username, profile.user.id, profile.user.reputation
    );
    println!(
        "  questions: {}  answers: {}  accepted: {}",
        profile.stats.question_count,
        profile.stats.answer_count,
        profile.stats.accepted_answer_count
    );
    for question in &profile.questions {
        println!("    - {}", question_line(question));
    }
}

fn run_list(settings: &Settings, json_output: bool) {
    let forum = load_forum_or_exit(settings);
    let users = ForumQuery::new(&forum).list_users();

    if json_output {
        print_json(&json!({
            "action": "user.list",
            "count": users.len(),
            "items": users.iter().map(|u| user_json(u)).collect::<Vec<_>>()
        }));
        return;
    }

    println!("overflow user list");
    if users.is_empty() {
        println!("  (no users)");
    }
    for user in users {
        println!("  - {} [{}] {}", user.username, user.reputation, user.id);
    }
}
