//! Error types for the vrocli CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for vrocli operations.
///
/// Each variant maps to a specific exit code so that scripted callers can
/// distinguish configuration mistakes from package-data or server problems.
#[derive(Error, Debug)]
pub enum VrocliError {
    /// User provided invalid arguments, referenced an unconfigured item,
    /// or declined a confirmation flag.
    #[error("{0}")]
    UserError(String),

    /// A required action field is missing or empty, so no stub or element
    /// can be rendered for it.
    #[error("invalid action spec: required field '{field}' is missing or empty")]
    InvalidSpec {
        /// Name of the missing field (`name` or `script`).
        field: &'static str,
    },

    /// Archive or file-structure operation failed.
    #[error("package operation failed: {0}")]
    PackageError(String),

    /// Element data could not be parsed or serialized.
    #[error("malformed element data: {0}")]
    XmlError(String),

    /// HTTP request failed or the server answered with an unexpected status.
    #[error("vRO server request failed: {0}")]
    ServerError(String),
}

impl VrocliError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            VrocliError::UserError(_) => exit_codes::USER_ERROR,
            VrocliError::InvalidSpec { .. } => exit_codes::SPEC_FAILURE,
            VrocliError::PackageError(_) => exit_codes::PACKAGE_FAILURE,
            VrocliError::XmlError(_) => exit_codes::PACKAGE_FAILURE,
            VrocliError::ServerError(_) => exit_codes::SERVER_FAILURE,
        }
    }
}

/// Result type alias for vrocli operations.
pub type Result<T> = std::result::Result<T, VrocliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = VrocliError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn invalid_spec_has_correct_exit_code() {
        let err = VrocliError::InvalidSpec { field: "name" };
        assert_eq!(err.exit_code(), exit_codes::SPEC_FAILURE);
    }

    #[test]
    fn package_error_has_correct_exit_code() {
        let err = VrocliError::PackageError("unzip failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::PACKAGE_FAILURE);
    }

    #[test]
    fn xml_error_has_correct_exit_code() {
        let err = VrocliError::XmlError("unexpected end of document".to_string());
        assert_eq!(err.exit_code(), exit_codes::PACKAGE_FAILURE);
    }

    #[test]
    fn server_error_has_correct_exit_code() {
        let err = VrocliError::ServerError("bad HTTP response code: 404".to_string());
        assert_eq!(err.exit_code(), exit_codes::SERVER_FAILURE);
    }

    #[test]
    fn invalid_spec_identifies_missing_field() {
        let err = VrocliError::InvalidSpec { field: "script" };
        assert_eq!(
            err.to_string(),
            "invalid action spec: required field 'script' is missing or empty"
        );
    }
}
