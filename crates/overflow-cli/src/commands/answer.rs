use overflow_core::{AnswerId, QuestionId};
use serde_json::json;

use crate::cli::AnswerCommands;
use crate::config::Settings;
use crate::support::{acting_user, answer_json, mutate_forum_or_exit, print_json};

pub fn run(settings: &Settings, command: AnswerCommands) {
    match command {
        AnswerCommands::Post {
            question_id,
            body,
            json,
        } => run_post(settings, question_id, body, json),

        AnswerCommands::Edit { id, body, json } => run_edit(settings, id, body, json),

        AnswerCommands::Accept { id, json } => run_accept(settings, id, json),
    }
}

fn run_post(settings: &Settings, question_id: String, body: String, json_output: bool) {
    let question_id = QuestionId::from(question_id);
    let (answer, reputation) = mutate_forum_or_exit(settings, |forum| {
        let author = acting_user(forum, settings)?;
        let answer = forum.post_answer(&question_id, &author, &body)?;
        let reputation = forum.user(&author).map(|u| u.reputation).unwrap_or_default();
        Ok(((answer, reputation), true))
    });
    tracing::info!(answer_id = %answer.id, question_id = %answer.question_id, "answer posted");

    if json_output {
        print_json(&json!({
            "action": "answer.post",
            "storePath": settings.store.display().to_string(),
            "answer": answer_json(&answer),
            "authorReputation": reputation
        }));
    } else {
        println!(
            "overflow answer post\n  Posted: {} on {}\n  Author reputation: {}",
            answer.id, answer.question_id, reputation
        );
    }
}

fn run_edit(settings: &Settings, id: String, body: String, json_output: bool) {
    let answer_id = AnswerId::from(id);
    let answer = mutate_forum_or_exit(settings, |forum| {
        let editor = acting_user(forum, settings)?;
        let answer = forum.edit_answer(&answer_id, &editor, &body)?;
        Ok((answer, true))
    });
    tracing::info!(answer_id = %answer.id, "answer edited");

    if json_output {
        print_json(&json!({
            "action": "answer.edit",
            "storePath": settings.store.display().to_string(),
            "answer": answer_json(&answer)
        }));
    } else {
        println!("overflow answer edit\n  Updated: {}", answer.id);
    }
}

fn run_accept(settings: &Settings, id: String, json_output: bool) {
    let answer_id = AnswerId::from(id);
    let (answer, reputation) = mutate_forum_or_exit(settings, |forum| {
        let requester = acting_user(forum, settings)?;
        let answer = forum.accept_answer(&answer_id, &requester)?;
        let reputation = forum
            .user(&answer.user_id)
            .map(|u| u.reputation)
            .unwrap_or_default();
        Ok(((answer, reputation), true))
    });
    tracing::info!(answer_id = %answer.id, question_id = %answer.question_id, "answer accepted");

    if json_output {
        print_json(&json!({
            "action": "answer.accept",
            "storePath": settings.store.display().to_string(),
            "answer": answer_json(&answer),
            "authorReputation": reputation
        }));
    } else {
        println!(
            "overflow answer accept\n  Accepted: {} on {}\n  Author reputation: {}",
            answer.id, answer.question_id, reputation
        );
    }
}
