//! Implementation of the `vrocli build` command.

use super::{build_package, load_config, require_confirmation};
use crate::cli::BuildArgs;
use crate::error::Result;
use crate::events::{log_event, Event, EventAction, EVENTS_FILE};
use crate::package::Package;
use serde_json::json;

/// Execute the `vrocli build` command.
///
/// Extracts actions from the module files, regenerates their element data,
/// and zips the expand target into the build target archive.
pub fn cmd_build(args: BuildArgs, _verbose: bool) -> Result<()> {
    require_confirmation(
        args.yes,
        "This will rebuild the package archive from local work.",
    )?;

    let config = load_config()?;
    let package = Package::resolve(&args.package, &config)?;

    let summary = build_package(&package)?;

    log_event(
        EVENTS_FILE,
        Event::new(EventAction::Build)
            .with_package(&package.name)
            .with_details(json!({
                "archive": package.build_target.display().to_string(),
                "actions": summary.actions,
                "modules": summary.modules,
            })),
    );

    Ok(())
}
