//! Error handling module
//!
//! Structured error types for directory searches, per-entry extraction and
//! module option parsing.

use ldap3::{LdapError, LdapResult};
use thiserror::Error;

/// Failure raised by a directory connection while executing a search.
///
/// The session is already bound when a search runs, so every variant
/// describes the search itself. Modules propagate these to the host.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The transport dropped while the search was in flight
    #[error("Directory connection lost: {0}")]
    Connection(String),

    /// The search did not finish in time
    #[error("Directory search timed out: {0}")]
    Timeout(String),

    /// The configured search base does not exist on this server
    #[error("Search base '{base_dn}' not found: {text}")]
    NoSuchBase { base_dn: String, text: String },

    /// The bound identity may not search under the base
    #[error("Search under '{base_dn}' refused (rc={rc}): {text}")]
    AccessDenied { base_dn: String, rc: u32, text: String },

    /// The server cannot serve the search right now
    #[error("Directory server unavailable (rc={rc}): {text}")]
    Unavailable { rc: u32, text: String },

    /// Any other non-success result code
    #[error("Search under '{base_dn}' failed (rc={rc}): {text}")]
    Search { base_dn: String, rc: u32, text: String },

    /// Malformed response or client-side protocol failure
    #[error("LDAP protocol error: {0}")]
    Protocol(String),
}

impl DirectoryError {
    /// Map a non-success search result code
    pub fn from_result(result: &LdapResult, base_dn: &str) -> Self {
        let text = result.text.clone();
        match result.rc {
            // timeLimitExceeded
            3 => DirectoryError::Timeout(format!("server time limit exceeded: {}", text)),
            // strongerAuthRequired, insufficientAccessRights, unwillingToPerform
            8 | 50 | 53 => DirectoryError::AccessDenied {
                base_dn: base_dn.to_string(),
                rc: result.rc,
                text,
            },
            // noSuchObject
            32 => DirectoryError::NoSuchBase {
                base_dn: base_dn.to_string(),
                text,
            },
            // busy, unavailable
            51 | 52 => DirectoryError::Unavailable { rc: result.rc, text },
            rc => DirectoryError::Search {
                base_dn: base_dn.to_string(),
                rc,
                text,
            },
        }
    }

    /// Map a client error raised while searching under `base_dn`
    pub fn from_ldap(err: LdapError, base_dn: &str) -> Self {
        match err {
            LdapError::LdapResult { result } => Self::from_result(&result, base_dn),
            LdapError::EndOfStream => {
                DirectoryError::Connection("server closed the connection".to_string())
            }
            LdapError::Io { source } => DirectoryError::Connection(source.to_string()),
            LdapError::Timeout { .. } => {
                DirectoryError::Timeout("no response within the search timeout".to_string())
            }
            other => DirectoryError::Protocol(other.to_string()),
        }
    }
}

/// Why a single directory entry could not produce an attribute value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEntry {
    /// The attribute is present but carries no values
    #[error("attribute '{attribute}' has no values")]
    EmptyValues { attribute: String },

    /// The first value is not valid UTF-8 text
    #[error("attribute '{attribute}' holds a {len}-byte binary value")]
    BinaryValue { attribute: String, len: usize },
}

/// Module option bundle parse failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Option pair is missing the `=` separator
    #[error("Configuration error: option '{0}' is not in KEY=value form")]
    MissingSeparator(String),

    /// Option pair has an empty key
    #[error("Configuration error: option '{0}' has an empty key")]
    EmptyKey(String),
}

/// Result type alias for directory operations
pub type Result<T> = std::result::Result<T, DirectoryError>;
