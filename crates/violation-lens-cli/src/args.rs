use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "violation-lens")]
#[command(about = "Rule-based violation classifier for moderation reasons")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.violation-lens)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify texts into violation categories
    Classify {
        /// Texts to classify
        texts: Vec<String>,

        /// Read texts from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Show confidence and evidence per category
        #[arg(short, long)]
        details: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Aggregate statistics over a file of texts (one per line)
    Stats {
        /// Input file
        #[arg(short, long)]
        file: PathBuf,

        /// Also list samples that suggest rule improvements
        #[arg(short, long)]
        suggest: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage the rule set
    Patterns {
        #[command(subcommand)]
        action: PatternsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum PatternsAction {
    /// List categories and their patterns
    List,

    /// Show rule set summary and cache statistics
    Info,

    /// Add a new category
    Add {
        /// Category name
        name: String,

        /// Regular expressions (use `a.*?b` for gap patterns)
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Human-readable description
        #[arg(short, long)]
        description: Option<String>,

        /// Extra keywords, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,
    },

    /// Remove a category
    Remove {
        /// Category name
        name: String,
    },

    /// Replace the patterns of a category
    Update {
        /// Category name
        name: String,

        /// New regular expressions
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Restore the built-in rule set
    Reset,

    /// Export the rule set (.toml or .json)
    Save {
        /// Output file
        path: PathBuf,
    },

    /// Import a rule set (.toml or .json)
    Load {
        /// Input file
        path: PathBuf,
    },

    /// Replace the whole rule set with the categories of a file
    Set {
        /// File with a `patterns` table (.toml or .json)
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., engine.cache_enabled)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., log.level)
        key: String,

        /// Value to set (e.g., "debug" or "false")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
