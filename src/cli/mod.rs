//! CLI argument parsing for vrocli.
//!
//! Uses clap derive macros for declarative argument definitions. This module
//! defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{Parser, Subcommand};

/// vrocli: vRealize Orchestrator coder/command line interface.
///
/// Round-trips vRO packages between their archive form and editable
/// JavaScript module files:
/// - `pull`/`push` move archives to and from a configured server
/// - `expand` turns an archive into per-category module files
/// - `build` turns module files back into an archive
#[derive(Parser, Debug)]
#[command(name = "vrocli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print per-item progress while working.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for vrocli.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured items (servers or packages).
    List(ListArgs),

    /// Get (and optionally expand) a package from a vRO server.
    ///
    /// Downloads the package archive to its configured location. With
    /// `--expand`, also unzips it and regenerates the module files,
    /// replacing any local work.
    Pull(PullArgs),

    /// (Optionally build and) push a package to a vRO server.
    ///
    /// Uploads the built package archive, replacing the remote copy. With
    /// `--build`, rebuilds the archive from the local module files first.
    Push(PushArgs),

    /// Expand a package file to a local files structure.
    ///
    /// Unzips the archive and renders each action element into its
    /// category's module file, replacing any local work.
    Expand(ExpandArgs),

    /// Build a package file from the local files structure.
    ///
    /// Extracts actions from the module files, regenerates their element
    /// data, and zips the result into the build target.
    Build(BuildArgs),
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// What to list: `servers` or `packages`.
    pub item_type: String,
}

/// Arguments for the `pull` command.
#[derive(Parser, Debug)]
pub struct PullArgs {
    /// Name of the vRO server (must be in the configuration file).
    #[arg(short, long)]
    pub server: String,

    /// Package name to use (must be in the configuration file).
    #[arg(short, long)]
    pub package: String,

    /// Expand the package to local files after downloading.
    #[arg(short, long)]
    pub expand: bool,

    /// Confirm replacing local work without prompting.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `push` command.
#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Name of the vRO server (must be in the configuration file).
    #[arg(short, long)]
    pub server: String,

    /// Package name to use (must be in the configuration file).
    #[arg(short, long)]
    pub package: String,

    /// Build the package from local files before pushing.
    #[arg(short, long)]
    pub build: bool,

    /// Confirm replacing remote work without prompting.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `expand` command.
#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// Package name to use (must be in the configuration file).
    #[arg(short, long)]
    pub package: String,

    /// Confirm replacing local work without prompting.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `build` command.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Package name to use (must be in the configuration file).
    #[arg(short, long)]
    pub package: String,

    /// Confirm rebuilding the archive from local work without prompting.
    #[arg(long)]
    pub yes: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_list() {
        let cli = Cli::try_parse_from(["vrocli", "list", "servers"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.item_type, "servers");
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn parse_pull_minimal() {
        let cli = Cli::try_parse_from([
            "vrocli",
            "pull",
            "-s",
            "vro.corp.example",
            "-p",
            "com.corp.tools",
        ])
        .unwrap();
        if let Command::Pull(args) = cli.command {
            assert_eq!(args.server, "vro.corp.example");
            assert_eq!(args.package, "com.corp.tools");
            assert!(!args.expand);
            assert!(!args.yes);
        } else {
            panic!("Expected Pull command");
        }
    }

    #[test]
    fn parse_pull_with_expand_and_yes() {
        let cli = Cli::try_parse_from([
            "vrocli",
            "pull",
            "--server",
            "vro.corp.example",
            "--package",
            "com.corp.tools",
            "--expand",
            "--yes",
        ])
        .unwrap();
        if let Command::Pull(args) = cli.command {
            assert!(args.expand);
            assert!(args.yes);
        } else {
            panic!("Expected Pull command");
        }
    }

    #[test]
    fn parse_pull_requires_server_and_package() {
        assert!(Cli::try_parse_from(["vrocli", "pull", "-p", "com.corp.tools"]).is_err());
        assert!(Cli::try_parse_from(["vrocli", "pull", "-s", "vro.corp.example"]).is_err());
    }

    #[test]
    fn parse_push_with_build() {
        let cli = Cli::try_parse_from([
            "vrocli",
            "push",
            "-s",
            "vro.corp.example",
            "-p",
            "com.corp.tools",
            "-b",
            "--yes",
        ])
        .unwrap();
        if let Command::Push(args) = cli.command {
            assert!(args.build);
            assert!(args.yes);
        } else {
            panic!("Expected Push command");
        }
    }

    #[test]
    fn parse_expand() {
        let cli =
            Cli::try_parse_from(["vrocli", "expand", "-p", "com.corp.tools", "--yes"]).unwrap();
        if let Command::Expand(args) = cli.command {
            assert_eq!(args.package, "com.corp.tools");
            assert!(args.yes);
        } else {
            panic!("Expected Expand command");
        }
    }

    #[test]
    fn parse_build() {
        let cli = Cli::try_parse_from(["vrocli", "build", "-p", "com.corp.tools"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.package, "com.corp.tools");
            assert!(!args.yes);
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from([
            "vrocli",
            "expand",
            "-p",
            "com.corp.tools",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from([
            "vrocli",
            "--verbose",
            "expand",
            "-p",
            "com.corp.tools",
        ])
        .unwrap();
        assert!(cli.verbose);
    }
}
