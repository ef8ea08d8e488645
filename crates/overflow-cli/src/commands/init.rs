use overflow_core::{Forum, ForumError, SeedTag, create_forum_jsonl, mutate_forum_jsonl};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::support::{fail, print_json, yes_no};

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub store_path: PathBuf,
    pub created_store_dir: bool,
    pub created_store_file: bool,
    /// Seed tags added by this run (all of them for a new store, only the
    /// missing ones for an existing store).
    pub seeded_tags: Vec<String>,
}

/// Create the store with its seed tags, or top up an existing store with
/// any seed tags it lacks.
pub fn init_store(path: &Path, seeds: &[SeedTag]) -> Result<InitOutcome, String> {
    if path.exists() && !path.is_file() {
        return Err(format!(
            "store path exists but is not a file: {}",
            path.display()
        ));
    }

    let mut created_store_dir = false;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            format!(
                "failed to create store directory {}: {e}",
                parent.display()
            )
        })?;
        created_store_dir = true;
    }

    let created = create_forum_jsonl(path, || Forum::seeded(seeds)).map_err(|e| e.to_string())?;
    if let Some(forum) = created {
        return Ok(InitOutcome {
            store_path: path.to_path_buf(),
            created_store_dir,
            created_store_file: true,
            seeded_tags: forum.tags().iter().map(|t| t.name.clone()).collect(),
        });
    }

    let seeded_tags = mutate_forum_jsonl(path, |forum| {
        let mut added = Vec::new();
        for seed in seeds {
            if forum.install_seed_tag(seed)? {
                added.push(seed.name.trim().to_lowercase());
            }
        }
        let changed = !added.is_empty();
        Ok::<_, ForumError>((added, changed))
    })
    .map_err(|e| e.to_string())?;

    Ok(InitOutcome {
        store_path: path.to_path_buf(),
        created_store_dir,
        created_store_file: false,
        seeded_tags,
    })
}

pub fn run(settings: &Settings, json_output: bool) {
    let outcome = init_store(&settings.store, &settings.seed_tags).unwrap_or_else(|e| fail(e));
    tracing::info!(
        store = %outcome.store_path.display(),
        created = outcome.created_store_file,
        seeded = outcome.seeded_tags.len(),
        "store initialised"
    );

    if json_output {
        print_json(&json!({
            "action": "init",
            "storePath": outcome.store_path.display().to_string(),
            "configPath": settings.config_path.as_ref().map(|p| p.display().to_string()),
            "created": {
                "storeDir": outcome.created_store_dir,
                "storeFile": outcome.created_store_file
            },
            "seededTags": outcome.seeded_tags
        }));
    } else {
        println!("overflow init");
        println!("  store path: {}", outcome.store_path.display());
        println!("  created store: {}", yes_no(outcome.created_store_file));
        if outcome.seeded_tags.is_empty() {
            println!("  seeded tags: (none)");
        } else {
            println!("  seeded tags: {}", outcome.seeded_tags.join(", "));
        }
    }
}
