//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build and inspect menu trees from flat record lists
#[derive(Parser, Debug)]
#[command(name = "treeindex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .treeindex.toml
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Record field holding the item id
    #[arg(long, global = true)]
    pub id_field: Option<String>,

    /// Record field holding the item label
    #[arg(long, global = true)]
    pub label_field: Option<String>,

    /// Record field holding the parent id
    #[arg(long, global = true)]
    pub parent_field: Option<String>,

    /// Reject record lists with duplicate ids
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree built from a JSON record list
    Tree {
        /// JSON array of flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the tree as nested JSON
    Json {
        /// JSON array of flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Show one item with its derived position and depth
    Find {
        /// JSON array of flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Item id
        id: String,
    },

    /// List ids of items without children
    Leaves {
        /// JSON array of flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
