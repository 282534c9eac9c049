//! Clap derive structures for the `lineup` CLI.
//!
//! Defines the command tree, global flags, and shared value types. This file
//! is also compiled by `build.rs`, so it may only depend on clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lineup -- manage Smart Line Up waiting queues from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "lineup",
    version,
    about = "Manage Smart Line Up waiting queues from the command line",
    long_about = "Inspect and operate waiting lines hosted on a Smart Line Up server.\n\n\
        Entries can be added, edited, marked as entered and reordered. Reorders\n\
        are applied locally first and then confirmed by the server.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "LINEUP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, env = "LINEUP_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "LINEUP_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LINEUP_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "LINEUP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "LINEUP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage waiting lines
    #[command(alias = "l")]
    Lines(LinesArgs),

    /// Inspect and operate the entries of a line
    #[command(alias = "q")]
    Queue(QueueArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LINES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LinesArgs {
    #[command(subcommand)]
    pub command: LinesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinesCommand {
    /// List lines owned by the account
    #[command(alias = "ls")]
    List,

    /// Show one line with its display settings
    Get {
        /// Line ID
        line: i64,
    },

    /// Create a new line
    Create {
        /// Display name of the line
        name: String,
    },

    /// Delete a line and its entries
    #[command(alias = "rm")]
    Delete {
        /// Line ID
        line: i64,
    },

    /// Print the public link attendees use to follow a line
    Share {
        /// Line ID
        line: i64,

        /// Public site base URL (defaults to the server URL)
        #[arg(long)]
        base: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUEUE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// List the entries of a line in queue order
    #[command(alias = "ls")]
    List {
        /// Line ID
        line: i64,

        /// Leave out attendees that already entered
        #[arg(long)]
        hide_entered: bool,

        /// Number waiting attendees 1..n
        #[arg(long)]
        numbers: bool,
    },

    /// Add an attendee to the end of a line
    Add {
        /// Line ID
        line: i64,

        /// Attendee name
        #[arg(long)]
        name: String,

        /// Attendee phone number
        #[arg(long)]
        phone: String,

        /// Extra attribute (repeatable)
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },

    /// Edit an attendee's details
    Edit {
        /// Entry ID
        entry: i64,

        /// New attendee name
        #[arg(long)]
        name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,

        /// Replace attributes (repeatable)
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,

        /// Remove all attributes
        #[arg(long, conflicts_with = "attrs")]
        clear_attrs: bool,
    },

    /// Mark an entry as waiting or entered
    Status {
        /// Entry ID
        entry: i64,

        /// New status
        status: StatusArg,
    },

    /// Remove an entry from its line
    #[command(alias = "rm")]
    Remove {
        /// Entry ID
        entry: i64,
    },

    /// Move an entry to the slot of another entry
    #[command(alias = "mv")]
    Move {
        /// Line ID
        line: i64,

        /// Entry being moved
        moved: i64,

        /// Entry whose slot it takes
        target: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    /// Still waiting in line
    Waiting,
    /// Already let in
    Entered,
}

/// Parses `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_attr(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("attribute key is empty in `{raw}`"));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Set a profile value
    Set {
        /// Profile key (server, token_env, ca_cert, insecure, timeout, default_line)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
