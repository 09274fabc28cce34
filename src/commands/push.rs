//! Implementation of the `vrocli push` command.

use super::{build_package, load_config, require_confirmation};
use crate::cli::PushArgs;
use crate::error::Result;
use crate::events::{log_event, Event, EventAction, EVENTS_FILE};
use crate::package::Package;
use crate::server::VroServer;
use serde_json::json;

/// Execute the `vrocli push` command.
///
/// Uploads the built archive to the server, replacing the remote copy; with
/// `--build`, rebuilds the archive from the local module files first.
pub fn cmd_push(args: PushArgs, _verbose: bool) -> Result<()> {
    require_confirmation(args.yes, "This will replace your remote work.")?;

    let config = load_config()?;
    let package = Package::resolve(&args.package, &config)?;
    let server = VroServer::resolve(&args.server, &config)?;

    let mut details = json!({
        "server": server.hostname,
        "archive": package.build_target.display().to_string(),
        "built": args.build,
    });

    if args.build {
        let summary = build_package(&package)?;
        details["actions"] = json!(summary.actions);
    }

    server.push(&package.name, &package.build_target)?;
    println!("Pushed '{}' to {}", package.name, server.hostname);

    log_event(
        EVENTS_FILE,
        Event::new(EventAction::Push)
            .with_package(&package.name)
            .with_details(details),
    );

    Ok(())
}
