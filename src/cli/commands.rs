//! Command dispatch

use std::env;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::arena::{NodeRef, Root};
use crate::builder::TreeBuilder;
use crate::cli::args::{Cli, Commands, ConfigCommands, Inputs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::errors::TreeError;
use crate::tree_traits::{labeled_tree, TreeRender};
use crate::util::path::DottedPathExt;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { at, inputs }) => {
            let settings = load_settings(cli)?;
            let root = load_tree(&settings, inputs)?;
            _tree(&root, &settings, at.as_deref())
        }
        Some(Commands::List { at, inputs }) => {
            let root = load_tree(&load_settings(cli)?, inputs)?;
            _list(&root, at.as_deref())
        }
        Some(Commands::Paths { leaves, inputs }) => {
            let root = load_tree(&load_settings(cli)?, inputs)?;
            _paths(&root, *leaves)
        }
        Some(Commands::Resolve { path, inputs }) => {
            let root = load_tree(&load_settings(cli)?, inputs)?;
            _resolve(&root, path)
        }
        Some(Commands::Stats { inputs }) => {
            let root = load_tree(&load_settings(cli)?, inputs)?;
            _stats(&root)
        }
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try 'ecstree --help'".to_string(),
        )),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(env::current_dir().map_err(TreeError::FileReadError)?),
    }
}

/// Layered settings with command line overrides applied.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if cli.strict {
        settings.strict_segments = true;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Builds the tree from the given inputs, or from stdin when there are none.
#[instrument(level = "debug", skip(settings))]
pub fn load_tree(settings: &Settings, inputs: &Inputs) -> CliResult<Root> {
    let mut builder = TreeBuilder::with_settings(settings);

    if inputs.inputs.is_empty() {
        builder.add_reader(io::stdin().lock(), "<stdin>")?;
    } else {
        for input in &inputs.inputs {
            builder.add_input(input)?;
        }
    }

    let root = builder.build();
    if root.is_empty() {
        output::warning("no paths loaded");
    }
    Ok(root)
}

fn lookup<'a>(root: &'a Root, path: &str) -> CliResult<NodeRef<'a>> {
    if path.is_empty() {
        return Err(CliError::InvalidArgs("node path must not be empty".to_string()));
    }
    root.get(path)
        .ok_or_else(|| TreeError::PathNotFound(path.to_string()).into())
}

#[instrument(skip(root, settings))]
fn _tree(root: &Root, settings: &Settings, at: Option<&str>) -> CliResult<()> {
    let tree = match at {
        Some(path) => lookup(root, path)?.to_tree_string(),
        None => labeled_tree(root, &settings.root_label),
    };
    output::info(&tree);
    Ok(())
}

#[instrument(skip(root))]
fn _list(root: &Root, at: Option<&str>) -> CliResult<()> {
    match at {
        Some(path) => {
            for child in lookup(root, path)?.list_children() {
                output::info(child.name());
            }
        }
        None => {
            for node in root.list_children() {
                output::info(node.name());
            }
        }
    }
    Ok(())
}

#[instrument(skip(root))]
fn _paths(root: &Root, leaves: bool) -> CliResult<()> {
    if leaves {
        for path in root.leaf_paths() {
            output::info(path);
        }
    } else {
        for node in root.walk() {
            output::info(node.path());
        }
    }
    Ok(())
}

#[instrument(skip(root))]
fn _resolve(root: &Root, path: &str) -> CliResult<()> {
    let node = lookup(root, path)?;
    output::field("name", node.name());
    output::field("path", node.path());
    output::field("parent", node.path().parent_path().unwrap_or("-"));
    output::field("depth", &node.depth());
    output::field("children", &node.child_count());
    for child in node.list_children() {
        output::info(&format!("  {}", child.name()));
    }
    Ok(())
}

#[instrument(skip(root))]
fn _stats(root: &Root) -> CliResult<()> {
    output::header("Namespace tree");
    output::field("nodes", &root.len());
    output::field("top-level", &root.top_level_len());
    output::field("depth", &root.depth());
    output::field("leaves", &root.leaf_paths().len());
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let describe = |path: &std::path::Path| {
                let state = if path.exists() { "found" } else { "not found" };
                format!("{} ({})", path.display(), state)
            };
            match global_config_path() {
                Some(path) => output::field("global", &describe(path.as_path())),
                None => output::field("global", "unavailable"),
            }
            let local = local_config_path(&project_dir(cli)?);
            output::field("local", &describe(local.as_path()));
        }
    }
    Ok(())
}
