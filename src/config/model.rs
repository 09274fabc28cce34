//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for vrocli.
///
/// This struct represents the contents of `.vrocli.yml` under its top-level
/// `vrocli:` key. Unknown fields in the YAML are ignored for forward
/// compatibility. The `packages` and `vro_servers` maps are registries:
/// commands refuse to touch a package or server that is not listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directories used to derive package paths when a package entry
    /// does not override them.
    pub default_paths: DefaultPaths,

    /// Known packages, keyed by package name. An empty mapping value means
    /// "use the default paths".
    pub packages: BTreeMap<String, PackagePaths>,

    /// Known vRO servers, keyed by hostname.
    pub vro_servers: BTreeMap<String, ServerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_paths: DefaultPaths::default(),
            packages: BTreeMap::new(),
            vro_servers: BTreeMap::new(),
        }
    }
}

/// Base directories for derived package paths.
///
/// For a package `<name>` the derived layout is:
/// - source archive: `<packages>/<name>.package`
/// - expanded archive tree: `<expand_target>/<name>`
/// - editable module files: `<working_dir>/<name>`
/// - rebuilt archive: `<build_target>/<name>.package`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPaths {
    #[serde(default = "default_packages_dir")]
    pub packages: PathBuf,

    #[serde(default = "default_expand_target_dir")]
    pub expand_target: PathBuf,

    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_build_target_dir")]
    pub build_target: PathBuf,
}

impl Default for DefaultPaths {
    fn default() -> Self {
        Self {
            packages: default_packages_dir(),
            expand_target: default_expand_target_dir(),
            working_dir: default_working_dir(),
            build_target: default_build_target_dir(),
        }
    }
}

/// Per-package path overrides. Any field left out falls back to the derived
/// default-path layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagePaths {
    /// Full path of the source `.package` archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PathBuf>,

    /// Directory the archive is expanded into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_target: Option<PathBuf>,

    /// Directory holding the editable module files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Full path of the rebuilt `.package` archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_target: Option<PathBuf>,
}

/// Connection settings for one vRO server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// API user. When absent, the `VRO_USER` environment variable is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// API password. When absent, the `VRO_PASSWORD` environment variable is
    /// used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwd: Option<String>,

    /// Verify the server's TLS certificate. Disable only for lab servers
    /// with self-signed certificates.
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            user: None,
            pwd: None,
            verify_ssl: true,
        }
    }
}

fn default_packages_dir() -> PathBuf {
    PathBuf::from("packages")
}

fn default_expand_target_dir() -> PathBuf {
    PathBuf::from("raw")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_build_target_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_true() -> bool {
    true
}
