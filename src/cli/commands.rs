//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::ConfiguredIndex;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{DuplicatePolicy, TreeRender};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings);
    execute_with(cli, &container)
}

/// Layered settings with command line flags applied last.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config_dir.as_deref())?;
    if let Some(field) = &cli.id_field {
        settings.flat.id_field = field.clone();
    }
    if let Some(field) = &cli.label_field {
        settings.flat.label_field = field.clone();
    }
    if let Some(field) = &cli.parent_field {
        settings.flat.parent_field = field.clone();
    }
    if cli.strict {
        settings.duplicate_ids = DuplicatePolicy::Reject;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

pub fn execute_with(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { file }) => cmd_tree(container, file),
        Some(Commands::Json { file, compact }) => cmd_json(container, file, *compact),
        Some(Commands::Find { file, id }) => cmd_find(container, file, id),
        Some(Commands::Leaves { file }) => cmd_leaves(container, file),
        Some(Commands::Config) => cmd_config(container),
        Some(Commands::Completion { shell }) => {
            generate(*shell, &mut Cli::command(), "treeindex", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Read and convert a record file, warning about records that were dropped.
pub fn load_index(container: &ServiceContainer, file: &Path) -> CliResult<ConfiguredIndex> {
    if !container.fs.exists(file) {
        return Err(CliError::NoInput(file.to_path_buf()));
    }
    let records = container.tree_service.load_records(file)?;
    let index = container.tree_service.build(&records)?;

    let dropped = records.len().saturating_sub(index.tree().len());
    if dropped > 0 {
        output::warning(&format!(
            "{} record(s) dropped: parent missing or listed after its child",
            dropped
        ));
    }
    Ok(index)
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let index = load_index(container, file)?;
    output::info(&index.tree().to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_json(container: &ServiceContainer, file: &Path, compact: bool) -> CliResult<()> {
    let index = load_index(container, file)?;
    let json = container.tree_service.to_json(index.tree(), !compact)?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_find(container: &ServiceContainer, file: &Path, id: &str) -> CliResult<()> {
    let index = load_index(container, file)?;
    let item = index
        .find_item(id)
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;

    output::header(&item.name);
    output::field("id", &item.id);
    let parent = if item.parent_id.is_empty() {
        "-"
    } else {
        item.parent_id.as_str()
    };
    output::field("parent", parent);
    output::field("pos", &item.pos);
    output::field("level", &item.level);
    output::field("children", &item.children.len());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_leaves(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let index = load_index(container, file)?;
    for leaf in index.tree().leaf_nodes() {
        output::info(&leaf);
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}
