use overflow_core::{Forum, snapshot_ref, store_lock_path};
use serde_json::json;

use crate::config::Settings;
use crate::support::{fail, print_json, yes_no};

pub fn run(settings: &Settings, json_output: bool) {
    let path = &settings.store;
    let exists = path.is_file();
    let lock_held = store_lock_path(path).exists();

    let forum = if exists {
        Some(
            Forum::load_jsonl(path)
                .unwrap_or_else(|e| fail(format!("failed to load {}: {e}", path.display()))),
        )
    } else {
        None
    };
    let snapshot = forum.as_ref().map(|forum| {
        snapshot_ref(forum).unwrap_or_else(|e| fail(format!("failed to digest store: {e}")))
    });

    if json_output {
        let counts = forum.as_ref().map(|forum| {
            json!({
                "users": forum.users().len(),
                "questions": forum.questions().len(),
                "answers": forum.answers().len(),
                "tags": forum.tags().len()
            })
        });
        print_json(&json!({
            "action": "status",
            "storePath": path.display().to_string(),
            "configPath": settings.config_path.as_ref().map(|p| p.display().to_string()),
            "exists": exists,
            "lockHeld": lock_held,
            "snapshotRef": snapshot,
            "counts": counts
        }));
        return;
    }

    println!("overflow status");
    println!("  store path: {}", path.display());
    println!("  exists: {}", yes_no(exists));
    println!("  lock held: {}", yes_no(lock_held));
    if let Some(config_path) = &settings.config_path {
        println!("  config: {}", config_path.display());
    }
    if let (Some(forum), Some(snapshot)) = (&forum, &snapshot) {
        println!("  snapshot: {snapshot}");
        println!(
            "  records: {} users, {} questions, {} answers, {} tags",
            forum.users().len(),
            forum.questions().len(),
            forum.answers().len(),
            forum.tags().len()
        );
    }
}
