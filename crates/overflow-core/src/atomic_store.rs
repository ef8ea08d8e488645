//! Lock-scoped writes to a forum JSONL store.
//!
//! Every writer, including the one creating the store, holds
//! `<store>.lock` from its existence check or load until its save, so two
//! processes never interleave a read-modify-write. A held lock is
//! reported as busy rather than waited on.

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::jsonl::{JsonlError, parent_dir, sibling_path};
use crate::memory::Forum;

pub fn store_lock_path(store_path: &Path) -> PathBuf {
    sibling_path(store_path, "lock")
}

#[derive(Debug, thiserror::Error)]
pub enum AtomicStoreMutationError<E> {
    #[error("forum store lock busy: {lock_path}")]
    LockBusy { lock_path: String },

    #[error("failed to acquire forum store lock {lock_path}: {message}")]
    LockIo { lock_path: String, message: String },

    #[error("{0}")]
    Store(JsonlError),

    #[error("{0}")]
    Mutation(E),
}

impl<E> AtomicStoreMutationError<E> {
    /// The mutation's own error, if that is what failed.
    pub fn mutation(&self) -> Option<&E> {
        match self {
            Self::Mutation(err) => Some(err),
            _ => None,
        }
    }
}

/// Execute one lock-scoped mutation against an existing forum store.
///
/// The mutator returns `(value, changed)`:
/// - `value` is handed back to the caller
/// - `changed=true` persists the forum before the lock is released
///
/// A mutator error leaves the file untouched.
pub fn mutate_forum_jsonl<T, E, F>(
    path: impl AsRef<Path>,
    mutator: F,
) -> Result<T, AtomicStoreMutationError<E>>
where
    F: FnOnce(&mut Forum) -> Result<(T, bool), E>,
{
    let path = path.as_ref();
    let _lock = StoreLock::acquire::<E>(path)?;

    let mut forum = Forum::load_jsonl(path).map_err(AtomicStoreMutationError::Store)?;
    let (value, changed) = mutator(&mut forum).map_err(AtomicStoreMutationError::Mutation)?;
    if changed {
        forum
            .save_jsonl(path)
            .map_err(AtomicStoreMutationError::Store)?;
    }
    Ok(value)
}

/// Create the store at `path` with the forum `build` returns.
///
/// Returns `Ok(None)` without calling `build` when a store already exists,
/// so of two racing creators exactly one writes the file.
pub fn create_forum_jsonl<E, F>(
    path: impl AsRef<Path>,
    build: F,
) -> Result<Option<Forum>, AtomicStoreMutationError<E>>
where
    F: FnOnce() -> Result<Forum, E>,
{
    let path = path.as_ref();
    let _lock = StoreLock::acquire::<E>(path)?;
    if path.exists() {
        return Ok(None);
    }

    let forum = build().map_err(AtomicStoreMutationError::Mutation)?;
    forum
        .save_jsonl(path)
        .map_err(AtomicStoreMutationError::Store)?;
    Ok(Some(forum))
}

/// Exclusive claim on one store, released on drop.
struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    fn acquire<E>(store: &Path) -> Result<Self, AtomicStoreMutationError<E>> {
        let path = store_lock_path(store);
        let lock_io = |err: std::io::Error| AtomicStoreMutationError::LockIo {
            lock_path: path.display().to_string(),
            message: err.to_string(),
        };

        if let Some(dir) = parent_dir(&path) {
            fs::create_dir_all(dir).map_err(lock_io)?;
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(AtomicStoreMutationError::LockBusy {
                    lock_path: path.display().to_string(),
                });
            }
            Err(err) => return Err(lock_io(err)),
        };
        // Holder stamp, for whoever finds a stale lock.
        let _ = writeln!(
            file,
            "pid={} utc={}",
            std::process::id(),
            Utc::now().to_rfc3339()
        );
        Ok(Self { path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForumError;
    use crate::tag::{SeedTag, default_seed_tags};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "overflow-atomic-{prefix}-{}-{unique}",
            std::process::id()
        ))
    }

    fn temp_store(prefix: &str) -> PathBuf {
        let path = temp_dir(prefix).join("forum.jsonl");
        Forum::seeded(&default_seed_tags())
            .expect("default seeds are valid")
            .save_jsonl(&path)
            .expect("seed store should write");
        path
    }

    #[test]
    fn changed_mutation_is_persisted_and_lock_released() {
        let path = temp_store("persist");
        let count = mutate_forum_jsonl(&path, |forum| {
            let tag = forum.increment_tag_usage("dalle", None)?;
            Ok::<_, ForumError>((tag.count, true))
        })
        .expect("mutation should succeed");
        assert_eq!(count, 1);
        assert!(!store_lock_path(&path).exists());

        let reloaded = Forum::load_jsonl(&path).expect("store should reload");
        assert_eq!(reloaded.tag_by_name("dalle").expect("tag").count, 1);
    }

    #[test]
    fn failed_mutation_leaves_file_untouched() {
        let path = temp_store("failed");
        let before = fs::read_to_string(&path).expect("store should read");

        let err = mutate_forum_jsonl(&path, |forum| {
            forum.increment_tag_usage("dalle", None)?;
            Err::<((), bool), _>(ForumError::permission("refused"))
        })
        .expect_err("mutation should fail");
        assert!(matches!(err.mutation(), Some(ForumError::Permission(_))));
        assert_eq!(err.to_string(), "permission denied: refused");
        assert_eq!(fs::read_to_string(&path).expect("store should read"), before);
    }

    #[test]
    fn held_lock_reports_busy() {
        let path = temp_store("busy");
        fs::write(store_lock_path(&path), "pid=0\n").expect("lock fixture should write");

        let err = mutate_forum_jsonl(&path, |_| Ok::<_, ForumError>(((), false)))
            .expect_err("busy lock must fail");
        assert!(matches!(err, AtomicStoreMutationError::LockBusy { .. }));
        assert!(err.to_string().starts_with("forum store lock busy: "));

        let _ = fs::remove_file(store_lock_path(&path));
    }

    #[test]
    fn create_writes_once_under_the_lock() {
        let path = temp_dir("create").join("nested").join("forum.jsonl");
        let created = create_forum_jsonl(&path, || Forum::seeded(&default_seed_tags()))
            .expect("create should succeed")
            .expect("first create writes the store");
        assert_eq!(created.tags().len(), 5);
        assert!(path.is_file());
        assert!(!store_lock_path(&path).exists());

        let again = create_forum_jsonl(&path, || -> Result<Forum, ForumError> {
            panic!("build must not run for an existing store")
        })
        .expect("second create should succeed");
        assert!(again.is_none());
    }

    #[test]
    fn create_respects_a_held_lock_and_build_errors() {
        let path = temp_dir("create-busy").join("forum.jsonl");
        fs::create_dir_all(path.parent().expect("parent")).expect("dir should exist");
        fs::write(store_lock_path(&path), "pid=0\n").expect("lock fixture should write");
        let err = create_forum_jsonl(&path, || Forum::seeded(&default_seed_tags()))
            .expect_err("busy lock must fail");
        assert!(matches!(err, AtomicStoreMutationError::LockBusy { .. }));
        assert!(!path.exists());
        let _ = fs::remove_file(store_lock_path(&path));

        let err = create_forum_jsonl(&path, || Forum::seeded(&[SeedTag::new("x", "")]))
            .expect_err("invalid seed must fail");
        assert!(matches!(err.mutation(), Some(ForumError::Validation(_))));
        assert!(!path.exists());
        assert!(!store_lock_path(&path).exists());
    }
}
