//! Command implementations for vrocli.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers shared between them: config loading,
//! the `--yes` confirmation gate, and the expand/build composites reused by
//! `pull --expand` and `push --build`.

mod build;
mod expand;
mod list;
mod pull;
mod push;

use crate::cli::Command;
use crate::config::{Config, CONFIG_FILE};
use crate::error::{Result, VrocliError};
use crate::package::{BuildSummary, ExpandSummary, Package};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, verbose: bool) -> Result<()> {
    match command {
        Command::List(args) => list::cmd_list(args),
        Command::Pull(args) => pull::cmd_pull(args, verbose),
        Command::Push(args) => push::cmd_push(args, verbose),
        Command::Expand(args) => expand::cmd_expand(args, verbose),
        Command::Build(args) => build::cmd_build(args, verbose),
    }
}

/// Load the configuration from the current directory.
pub(crate) fn load_config() -> Result<Config> {
    Config::load(CONFIG_FILE)
}

/// Refuse to run a destructive command unless `--yes` was passed.
///
/// The warning states what would be replaced; the error tells the user how
/// to proceed.
pub(crate) fn require_confirmation(yes: bool, warning: &str) -> Result<()> {
    if yes {
        return Ok(());
    }
    Err(VrocliError::UserError(format!(
        "{}\nRe-run with --yes to continue.",
        warning
    )))
}

/// Unzip the package archive and regenerate the module files.
pub(crate) fn expand_package(package: &Package, verbose: bool) -> Result<ExpandSummary> {
    package.unzip()?;
    let summary = package.expand(verbose)?;
    println!(
        "Expanded {} action(s) into {} module file(s) in '{}'",
        summary.actions,
        summary.categories.len(),
        package.working_dir.display()
    );
    if summary.ignored > 0 {
        println!("Skipped {} non-action element(s)", summary.ignored);
    }
    Ok(summary)
}

/// Regenerate element data from the module files and rebuild the archive.
pub(crate) fn build_package(package: &Package) -> Result<BuildSummary> {
    let summary = package.build()?;
    package.rebuild()?;
    println!(
        "Built '{}' from {} action(s) in {} module file(s)",
        package.build_target.display(),
        summary.actions,
        summary.modules
    );
    Ok(summary)
}
