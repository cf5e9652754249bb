//! Error handling for svcctl.
use std::path::PathBuf;
use thiserror::Error;

/// Defines all possible errors that can occur in the supervision client.
#[derive(Debug, Error)]
pub enum SvcError {
    /// The service's control directory or its files are absent. This is the
    /// normal condition for a service that is defined but not currently
    /// supervised, and callers are expected to branch on it rather than
    /// treat it as a failure.
    #[error("service '{service}' is not under supervision")]
    ServiceUnavailable {
        /// The service directory that lacked a usable supervise directory.
        service: PathBuf,
    },

    /// The status record did not match the expected binary layout.
    #[error("malformed status record: {0}")]
    MalformedRecord(#[from] MalformedRecord),

    /// An action name outside the closed command set. Rejected before any
    /// I/O is attempted.
    #[error("unknown control action '{0}'")]
    UnknownAction(String),

    /// Generic OS-level failure distinct from the cases above.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading the client configuration file.
    #[error("failed to read config file: {0}")]
    ConfigRead(#[source] std::io::Error),

    /// Error parsing YAML configuration.
    #[error("invalid YAML format: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

/// Error type for status record decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRecord {
    /// The record length did not match the configured supervisor flavor.
    #[error("status record is {actual} bytes, expected {expected}")]
    Length {
        /// Record size the codec was configured for.
        expected: usize,
        /// Size actually read from the status file.
        actual: usize,
    },

    /// The want byte held a value outside the known table.
    #[error("unknown want byte 0x{0:02x} in status record")]
    UnknownWant(u8),

    /// The optional `supervise/pid` file held something other than a pid.
    #[error("pid file contents are not a valid pid: {0:?}")]
    PidFile(String),
}
