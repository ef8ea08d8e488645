//! # overflow-core
//!
//! Memory layer for a question-and-answer forum.
//!
//! This crate provides:
//! - `User`, `Question`, `Answer` and `Tag` records with typed ids
//! - `Collection` and `Forum` (canonical in-memory state)
//! - the counter consistency rules (votes, accepted answers, tag usage,
//!   view counts) as methods on `Forum`
//! - JSONL read/write and lock-scoped mutation of a JSONL store
//! - `SharedForum` for in-process concurrent callers
//!
//! Listing and search live in `overflow-query`.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one tagged record per line)
//!     <->  load / save
//! Forum (users, tags, questions, answers in insertion order)
//! ```

pub mod answer;
pub mod atomic_store;
pub mod collection;
pub mod error;
pub mod identity;
pub mod ids;
pub mod jsonl;
pub mod memory;
pub mod question;
pub mod render;
pub mod rules;
pub mod shared;
pub mod tag;
pub mod user;
pub mod validation;

pub use answer::Answer;
pub use atomic_store::{
    AtomicStoreMutationError, create_forum_jsonl, mutate_forum_jsonl, store_lock_path,
};
pub use collection::{Collection, Entity};
pub use error::{FieldError, ForumError, ValidationErrors};
pub use identity::{IdentityProvider, StaticIdentity, require_user};
pub use ids::{AnswerId, EntityKind, QuestionId, TagId, UserId};
pub use jsonl::{ForumRecord, JsonlError, decode_records, encode_records, snapshot_ref};
pub use memory::Forum;
pub use question::Question;
pub use render::{EscapingRenderer, MarkdownRenderer};
pub use rules::{
    ACCEPT_REPUTATION_BONUS, ANSWER_REPUTATION_BONUS, NewQuestion, QuestionPatch, VoteOutcome,
    VoteTarget, VoteValue,
};
pub use shared::SharedForum;
pub use tag::{SeedTag, Tag, default_seed_tags};
pub use user::User;
pub use validation::{check_search_query, normalize_tags, parse_tag_list};
