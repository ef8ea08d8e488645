use overflow_core::{AnswerId, QuestionId, VoteTarget, VoteValue};
use serde_json::json;

use crate::cli::VoteKindArg;
use crate::config::Settings;
use crate::support::{acting_user, fail, mutate_forum_or_exit, print_json};

pub fn run(settings: &Settings, kind: VoteKindArg, id: String, value: String, json_output: bool) {
    let value: VoteValue = value.parse().unwrap_or_else(|e| fail(e));
    let target = match kind {
        VoteKindArg::Question => VoteTarget::Question(QuestionId::from(id)),
        VoteKindArg::Answer => VoteTarget::Answer(AnswerId::from(id)),
    };

    let outcome = mutate_forum_or_exit(settings, |forum| {
        let voter = acting_user(forum, settings)?;
        let outcome = forum.vote(&target, value, &voter)?;
        Ok((outcome, true))
    });
    tracing::info!(vote_target = %outcome.target, delta = value.delta(), "vote recorded");

    let (kind_name, target_id) = match &outcome.target {
        VoteTarget::Question(id) => ("question", id.to_string()),
        VoteTarget::Answer(id) => ("answer", id.to_string()),
    };
    if json_output {
        print_json(&json!({
            "action": "vote",
            "storePath": settings.store.display().to_string(),
            "target": {
                "kind": kind_name,
                "id": target_id
            },
            "value": value,
            "votes": outcome.votes,
            "authorId": outcome.author_id,
            "authorReputation": outcome.author_reputation
        }));
    } else {
        println!(
            "overflow vote\n  {}: {} now at {} votes\n  Author reputation: {}",
            kind_name, target_id, outcome.votes, outcome.author_reputation
        );
    }
}
