//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Build and inspect the namespace tree of dotted schema paths
#[derive(Parser, Debug)]
#[command(name = "ecstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .ecstree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Reject paths with empty segments
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Path list inputs shared by the tree commands.
#[derive(Args, Debug, Clone, Default)]
pub struct Inputs {
    /// Files or directories with one dotted path per line (default: stdin)
    #[arg(value_hint = ValueHint::AnyPath)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the namespace tree
    Tree {
        /// Render only the subtree at this path
        #[arg(long)]
        at: Option<String>,
        #[command(flatten)]
        inputs: Inputs,
    },

    /// List direct children in name order
    List {
        /// Parent path (default: top level)
        #[arg(long)]
        at: Option<String>,
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Print every absolute path in walk order
    Paths {
        /// Only paths without children
        #[arg(long)]
        leaves: bool,
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Show a single node
    Resolve {
        /// Dotted path to look up
        path: String,
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Summarize the tree
    Stats {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show config file locations
    Path,
}
