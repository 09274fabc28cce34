//! vRO server client.
//!
//! Packages move to and from a server through the vRO REST API: a GET of
//! `/vco/api/packages/<name>` returns the archive, a multipart POST with
//! `overwrite=true` replaces it. Both use basic auth. Lab servers commonly
//! run self-signed certificates, so `verify_ssl: false` in the server's
//! config entry disables certificate verification for that host only.

use crate::config::Config;
use crate::error::{Result, VrocliError};
use crate::fs::atomic_write;
use reqwest::blocking::multipart;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::path::Path;

/// Environment variable consulted when the config has no `user`.
pub const USER_ENV: &str = "VRO_USER";

/// Environment variable consulted when the config has no `pwd`.
pub const PASSWORD_ENV: &str = "VRO_PASSWORD";

/// A configured vRO server with resolved credentials.
#[derive(Debug)]
pub struct VroServer {
    pub hostname: String,
    username: String,
    password: String,
    verify_ssl: bool,
}

impl VroServer {
    /// Resolve a server from the configuration registry.
    ///
    /// Credentials fall back from the config entry to the `VRO_USER` /
    /// `VRO_PASSWORD` environment variables; a credential available in
    /// neither place is a user error naming the fix.
    pub fn resolve(hostname: &str, config: &Config) -> Result<Self> {
        let server = config.server(hostname)?;

        let username = server
            .user
            .clone()
            .or_else(|| std::env::var(USER_ENV).ok())
            .ok_or_else(|| {
                VrocliError::UserError(format!(
                    "no API user for '{}'. Set user in its config entry or export {}.",
                    hostname, USER_ENV,
                ))
            })?;
        let password = server
            .pwd
            .clone()
            .or_else(|| std::env::var(PASSWORD_ENV).ok())
            .ok_or_else(|| {
                VrocliError::UserError(format!(
                    "no API password for '{}'. Set pwd in its config entry or export {}.",
                    hostname, PASSWORD_ENV,
                ))
            })?;

        Ok(Self {
            hostname: hostname.to_string(),
            username,
            password,
            verify_ssl: server.verify_ssl,
        })
    }

    /// URL of a named package on this server.
    pub fn package_url(&self, package_name: &str) -> String {
        format!(
            "https://{}/vco/api/packages/{}",
            self.hostname, package_name
        )
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .danger_accept_invalid_certs(!self.verify_ssl)
            .build()
            .map_err(|e| VrocliError::ServerError(format!("failed to build HTTP client: {}", e)))
    }

    /// Download a package archive to `destination`.
    ///
    /// Nothing is written unless the server answers 200 with the archive
    /// body.
    pub fn pull(&self, package_name: &str, destination: &Path) -> Result<()> {
        let response = self
            .client()?
            .get(self.package_url(package_name))
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/zip")
            .send()
            .map_err(|e| {
                VrocliError::ServerError(format!(
                    "GET {} failed: {}",
                    self.package_url(package_name),
                    e
                ))
            })?;

        if response.status() != StatusCode::OK {
            return Err(VrocliError::ServerError(format!(
                "bad HTTP response code: {}",
                response.status().as_u16()
            )));
        }

        let body = response.bytes().map_err(|e| {
            VrocliError::ServerError(format!("failed to read package body: {}", e))
        })?;
        atomic_write(destination, &body)?;

        Ok(())
    }

    /// Upload a package archive from `file_location`, replacing the remote
    /// copy.
    pub fn push(&self, package_name: &str, file_location: &Path) -> Result<()> {
        let bytes = std::fs::read(file_location).map_err(|e| {
            VrocliError::PackageError(format!(
                "failed to read archive '{}': {}",
                file_location.display(),
                e
            ))
        })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(format!("{}.package", package_name))
            .mime_str("application/zip")
            .map_err(|e| VrocliError::ServerError(format!("failed to build upload: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let url = format!("https://{}/vco/api/packages/?overwrite=true", self.hostname);
        let response = self
            .client()?
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .multipart(form)
            .send()
            .map_err(|e| VrocliError::ServerError(format!("POST {} failed: {}", url, e)))?;

        if response.status() != StatusCode::ACCEPTED {
            return Err(VrocliError::ServerError(format!(
                "bad HTTP response code: {}",
                response.status().as_u16()
            )));
        }

        Ok(())
    }
}
