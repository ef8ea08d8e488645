use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "overflow",
    about = "Prompt Overflow: a question-and-answer forum over a JSONL store",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand. Unset values fall back to the
/// config file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the forum JSONL store
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Path to a TOML config file (default: .overflow/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Act as this user (id or username)
    #[arg(long = "as", global = true, value_name = "USER")]
    pub acting_as: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the forum store with its seed tags
    Init {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store path, record counts, and snapshot digest
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recent questions and most used tags
    Front {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Ask, list, show, and edit questions
    Question {
        #[command(subcommand)]
        command: QuestionCommands,
    },

    /// Post, edit, and accept answers
    Answer {
        #[command(subcommand)]
        command: AnswerCommands,
    },

    /// Vote a question or answer up or down
    Vote {
        /// What the vote is cast on
        #[arg(value_enum)]
        kind: VoteKindArg,

        /// Question or answer ID
        id: String,

        /// Vote value: up, down, +1, or -1
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search questions and tags
    Search {
        /// Search text (at least 3 characters)
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse and describe tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VoteKindArg {
    #[value(name = "question")]
    Question,
    #[value(name = "answer")]
    Answer,
}

#[derive(Subcommand, Clone, Debug)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Email address
        email: String,

        /// Username (3-20 letters, digits, `_` or `-`)
        username: String,

        /// Opaque password hash from the identity provider
        #[arg(long, default_value = "")]
        password_hash: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's profile
    Show {
        /// User ID or username
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List users by reputation
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum QuestionCommands {
    /// Ask a new question (requires --as)
    Ask {
        /// Question title (15-150 characters)
        title: String,

        /// Question body (at least 30 characters)
        #[arg(long)]
        body: String,

        /// Comma-separated tags (1-5)
        #[arg(long)]
        tags: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List questions, newest first
    List {
        /// Only questions carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a question with its answers (counts a view)
    Show {
        /// Question ID
        id: String,

        /// Print bodies as escaped HTML
        #[arg(long)]
        html: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit your own question (requires --as)
    Edit {
        /// Question ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        body: Option<String>,

        /// New comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum AnswerCommands {
    /// Answer a question (requires --as)
    Post {
        /// Question ID
        question_id: String,

        /// Answer body (at least 30 characters)
        #[arg(long)]
        body: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit your own answer (requires --as)
    Edit {
        /// Answer ID
        id: String,

        /// New body
        #[arg(long)]
        body: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Accept an answer to your question (requires --as)
    Accept {
        /// Answer ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum TagCommands {
    /// List tags, most used first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a tag and its questions
    Show {
        /// Tag name (case-insensitive)
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set or clear a tag description (requires --as)
    Describe {
        /// Tag name (case-insensitive)
        name: String,

        /// New description; omit to clear
        #[arg(long)]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
