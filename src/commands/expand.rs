//! Implementation of the `vrocli expand` command.

use super::{expand_package, load_config, require_confirmation};
use crate::cli::ExpandArgs;
use crate::error::Result;
use crate::events::{log_event, Event, EventAction, EVENTS_FILE};
use crate::package::Package;
use serde_json::json;

/// Execute the `vrocli expand` command.
///
/// Unzips the source archive and regenerates the per-category module files,
/// replacing whatever was in the working directory.
pub fn cmd_expand(args: ExpandArgs, verbose: bool) -> Result<()> {
    require_confirmation(args.yes, "This will replace any local work.")?;

    let config = load_config()?;
    let package = Package::resolve(&args.package, &config)?;

    let summary = expand_package(&package, verbose)?;

    log_event(
        EVENTS_FILE,
        Event::new(EventAction::Expand)
            .with_package(&package.name)
            .with_details(json!({
                "actions": summary.actions,
                "categories": summary.categories,
                "ignored": summary.ignored,
            })),
    );

    Ok(())
}
