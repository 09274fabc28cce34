//! Implementation of the `vrocli list` command.

use super::load_config;
use crate::cli::ListArgs;
use crate::error::{Result, VrocliError};

/// What `list` can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListTarget {
    Servers,
    Packages,
}

/// Accepts singular and plural spellings, nothing else.
pub(crate) fn parse_list_target(item_type: &str) -> Result<ListTarget> {
    match item_type {
        "server" | "servers" => Ok(ListTarget::Servers),
        "package" | "packages" => Ok(ListTarget::Packages),
        other => Err(VrocliError::UserError(format!(
            "invalid item type '{}': only 'server(s)' or 'package(s)' can be listed",
            other
        ))),
    }
}

/// Execute the `vrocli list` command.
pub fn cmd_list(args: ListArgs) -> Result<()> {
    let target = parse_list_target(&args.item_type)?;
    let config = load_config()?;

    let (label, names): (&str, Vec<&String>) = match target {
        ListTarget::Servers => ("vro_servers", config.vro_servers.keys().collect()),
        ListTarget::Packages => ("packages", config.packages.keys().collect()),
    };

    if names.is_empty() {
        println!("No {} configured.", label);
        return Ok(());
    }

    println!("Configured {}:", label);
    for name in names {
        println!("  > {}", name);
    }

    Ok(())
}
