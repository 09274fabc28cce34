//! Exit code constants for the vrocli CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing configuration, refused confirmation)
//! - 2: Invalid action spec (required render field missing or empty)
//! - 3: Package failure (archive, file structure, or element data errors)
//! - 4: Server failure (HTTP errors or unexpected status codes)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unconfigured item, or refused confirmation.
pub const USER_ERROR: i32 = 1;

/// Invalid action spec: a required field is missing, so nothing was rendered.
pub const SPEC_FAILURE: i32 = 2;

/// Package failure: unzip/rebuild, module extraction, or element data errors.
pub const PACKAGE_FAILURE: i32 = 3;

/// Server failure: request errors or unexpected HTTP status codes.
pub const SERVER_FAILURE: i32 = 4;
