//! Constants for the supervise control-directory convention.
//!
//! This module centralizes the magic numbers and file names shared by the
//! status codec and the service handle, so the on-disk contract lives in
//! one place.

// ============================================================================
// Status Record Layout
// ============================================================================

/// TAI64 label offset relative to the Unix epoch, in seconds.
///
/// The supervisor stamps the status record with a big-endian TAI64 second
/// count; subtracting this constant converts it back to Unix time.
pub const TAI64_OFFSET: u64 = 4_611_686_018_427_387_914;

/// Size in bytes of the status record written by runit's `runsv`.
/// TAI64 seconds (8) + nanoseconds (4) + pid (4) + paused (1) + want (1)
/// + got-TERM (1) + run state (1).
pub const RUNIT_RECORD_LEN: usize = 20;

/// Size in bytes of the status record written by daemontools' `supervise`.
/// Same layout as runit without the trailing got-TERM and run-state bytes.
pub const DAEMONTOOLS_RECORD_LEN: usize = 18;

/// Byte offset of the little-endian pid field within the record.
pub const PID_OFFSET: usize = 12;

/// Byte offset of the paused flag within the record.
pub const PAUSED_OFFSET: usize = 16;

/// Byte offset of the want byte within the record.
pub const WANT_OFFSET: usize = 17;

/// Byte offset of the got-TERM flag (runit records only).
pub const TERM_OFFSET: usize = 18;

/// Byte offset of the run-state byte (runit records only).
pub const RUN_STATE_OFFSET: usize = 19;

/// Run-state byte value indicating the `./finish` script is executing.
pub const RUN_STATE_FINISH: u8 = 2;

// ============================================================================
// Control Directory Layout
// ============================================================================

/// Subdirectory of a service directory owned by the supervisor.
pub const SUPERVISE_DIR: &str = "supervise";

/// Status record file inside the supervise directory.
pub const STATUS_FILE: &str = "status";

/// Control channel (commonly a named pipe) inside the supervise directory.
pub const CONTROL_FILE: &str = "control";

/// Optional plain-text pid file inside the supervise directory.
pub const PID_FILE: &str = "pid";

/// Marker file in the service directory meaning "do not start automatically".
pub const DOWN_MARKER: &str = "down";

// ============================================================================
// Client Configuration
// ============================================================================

/// Default directory scanned for service definitions.
pub const DEFAULT_SERVICE_DIR: &str = "/var/service";

/// Environment variable overriding the service directory.
pub const SERVICE_DIR_ENV: &str = "SVCCTL_SERVICE_DIR";

/// Historical environment variable honored as a fallback.
pub const LEGACY_SERVICE_DIR_ENV: &str = "SERVICE_DIR";

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "svcctl.yaml";
