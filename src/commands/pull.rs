//! Implementation of the `vrocli pull` command.

use super::{expand_package, load_config, require_confirmation};
use crate::cli::PullArgs;
use crate::error::Result;
use crate::events::{log_event, Event, EventAction, EVENTS_FILE};
use crate::package::Package;
use crate::server::VroServer;
use serde_json::json;

/// Execute the `vrocli pull` command.
///
/// Downloads the package archive from the server into the configured source
/// location; with `--expand`, also unzips it and regenerates the module
/// files.
pub fn cmd_pull(args: PullArgs, verbose: bool) -> Result<()> {
    require_confirmation(args.yes, "This will replace your local copy of the package.")?;

    let config = load_config()?;
    let package = Package::resolve(&args.package, &config)?;
    let server = VroServer::resolve(&args.server, &config)?;

    server.pull(&package.name, &package.src_package)?;
    println!(
        "Downloaded '{}' from {} to '{}'",
        package.name,
        server.hostname,
        package.src_package.display()
    );

    let mut details = json!({
        "server": server.hostname,
        "destination": package.src_package.display().to_string(),
        "expanded": args.expand,
    });

    if args.expand {
        let summary = expand_package(&package, verbose)?;
        details["actions"] = json!(summary.actions);
        details["categories"] = json!(summary.categories);
    }

    log_event(
        EVENTS_FILE,
        Event::new(EventAction::Pull)
            .with_package(&package.name)
            .with_details(details),
    );

    Ok(())
}
