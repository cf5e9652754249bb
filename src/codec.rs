//! Binary codec for the supervisor's status record and control commands.
//!
//! The status record is a fixed-size big-endian TAI64 timestamp followed by
//! a little-endian pid and a handful of flag bytes; its exact length depends
//! on the supervisor flavor. Decoding is a pure function of the raw bytes
//! and the current time. Command encoding maps a closed set of symbolic
//! actions onto the single ASCII bytes the supervisor's control pipe
//! understands.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::constants::{
    DAEMONTOOLS_RECORD_LEN, PAUSED_OFFSET, PID_OFFSET, RUN_STATE_FINISH,
    RUN_STATE_OFFSET, RUNIT_RECORD_LEN, TAI64_OFFSET, TERM_OFFSET, WANT_OFFSET,
};
use crate::error::{MalformedRecord, SvcError};
use crate::status::{ServiceAction, ServiceState, ServiceStatus};

/// Supervisor implementations whose control directories this client speaks.
///
/// The flavor fixes the status record length; it is explicit codec state so
/// that handles for different supervisors can coexist in one process.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SupervisorFlavor {
    /// runit's `runsv`, which writes a 20-byte status record.
    #[default]
    Runit,
    /// daemontools' `supervise`, which writes an 18-byte status record.
    Daemontools,
}

impl SupervisorFlavor {
    /// Length in bytes of the status record this flavor writes.
    pub const fn record_len(&self) -> usize {
        match self {
            Self::Runit => RUNIT_RECORD_LEN,
            Self::Daemontools => DAEMONTOOLS_RECORD_LEN,
        }
    }
}

/// Symbolic control commands accepted by the supervisor's control pipe.
///
/// Each maps to exactly one ASCII byte. Restart is not a member: it composes
/// as [`Terminate`](Self::Terminate) followed by [`Up`](Self::Up) at the
/// handle level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ControlAction {
    /// Start the service and restart it whenever it stops.
    Up,
    /// Stop the service and do not restart it.
    Down,
    /// Start the service without restarting it when it stops.
    Once,
    /// Send the service a STOP signal.
    Pause,
    /// Send the service a CONT signal.
    #[strum(serialize = "continue", serialize = "cont")]
    Continue,
    /// Send the service a HUP signal.
    #[strum(serialize = "hangup", serialize = "hup")]
    Hangup,
    /// Send the service an ALRM signal.
    Alarm,
    /// Send the service an INT signal.
    Interrupt,
    /// Send the service a QUIT signal.
    Quit,
    /// Send the service a KILL signal.
    Kill,
    /// Send the service a TERM signal.
    #[strum(serialize = "terminate", serialize = "term")]
    Terminate,
    /// Send TERM then CONT and tell the supervisor itself to exit.
    Exit,
    /// Send the service a USR1 signal.
    Usr1,
    /// Send the service a USR2 signal.
    Usr2,
}

impl ControlAction {
    /// The single ASCII byte written to the control pipe for this action.
    pub const fn byte(&self) -> u8 {
        match self {
            Self::Up => b'u',
            Self::Down => b'd',
            Self::Once => b'o',
            Self::Pause => b'p',
            Self::Continue => b'c',
            Self::Hangup => b'h',
            Self::Alarm => b'a',
            Self::Interrupt => b'i',
            Self::Quit => b'q',
            Self::Kill => b'k',
            Self::Terminate => b't',
            Self::Exit => b'x',
            Self::Usr1 => b'1',
            Self::Usr2 => b'2',
        }
    }

    /// Parses a symbolic action name, rejecting anything outside the closed
    /// set before any I/O happens.
    pub fn parse(name: &str) -> Result<Self, SvcError> {
        name.trim()
            .parse()
            .map_err(|_| SvcError::UnknownAction(name.trim().to_string()))
    }
}

/// Wanted state recorded by the supervisor in the status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WantByte {
    Up,
    Down,
}

/// Decoder/encoder bound to one supervisor flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCodec {
    flavor: SupervisorFlavor,
}

impl StatusCodec {
    /// Creates a codec for the given supervisor flavor.
    pub const fn new(flavor: SupervisorFlavor) -> Self {
        Self { flavor }
    }

    /// The flavor this codec was configured for.
    pub const fn flavor(&self) -> SupervisorFlavor {
        self.flavor
    }

    /// Record length this codec accepts; any other length is malformed.
    pub const fn record_len(&self) -> usize {
        self.flavor.record_len()
    }

    /// Decodes a status record against the current wall clock.
    pub fn decode(&self, raw: &[u8]) -> Result<ServiceStatus, MalformedRecord> {
        self.decode_at(raw, SystemTime::now())
    }

    /// Decodes a status record against an explicit `now`.
    ///
    /// Deterministic and side-effect free: the same bytes and the same
    /// instant always yield the same structured status.
    pub fn decode_at(
        &self,
        raw: &[u8],
        now: SystemTime,
    ) -> Result<ServiceStatus, MalformedRecord> {
        let expected = self.record_len();
        if raw.len() != expected {
            return Err(MalformedRecord::Length {
                expected,
                actual: raw.len(),
            });
        }

        let mut stamp_bytes = [0u8; 8];
        stamp_bytes.copy_from_slice(&raw[..8]);
        let stamp = u64::from_be_bytes(stamp_bytes);

        // The pid field is the one little-endian island in an otherwise
        // big-endian record; the supervisor writes it raw from memory.
        let mut pid_bytes = [0u8; 4];
        pid_bytes.copy_from_slice(&raw[PID_OFFSET..PID_OFFSET + 4]);
        let raw_pid = u32::from_le_bytes(pid_bytes);

        let paused = raw[PAUSED_OFFSET] != 0;
        let want = match raw[WANT_OFFSET] {
            0 => None,
            b'u' => Some(WantByte::Up),
            b'd' => Some(WantByte::Down),
            other => return Err(MalformedRecord::UnknownWant(other)),
        };

        // Unknown run-state values are tolerated: the pid field alone decides
        // up versus down, so a future supervisor extending that byte still
        // decodes.
        let (got_term, finishing) = match self.flavor {
            SupervisorFlavor::Runit => (
                raw[TERM_OFFSET] != 0,
                raw[RUN_STATE_OFFSET] == RUN_STATE_FINISH,
            ),
            SupervisorFlavor::Daemontools => (false, false),
        };

        let now_tai = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .saturating_add(TAI64_OFFSET);
        let uptime_secs = now_tai.saturating_sub(stamp);

        let running = raw_pid > 0;
        let state = if running {
            if finishing {
                ServiceState::Finishing
            } else {
                ServiceState::Up
            }
        } else {
            ServiceState::Down
        };

        // Strongest transition signal wins, mirroring how runsv reports a
        // transition in progress.
        let action = if running && got_term {
            Some(ServiceAction::GotTerm)
        } else if running && want == Some(WantByte::Down) {
            Some(ServiceAction::WantDown)
        } else if !running && want == Some(WantByte::Up) {
            Some(ServiceAction::WantUp)
        } else if running && paused {
            Some(ServiceAction::Paused)
        } else {
            None
        };

        Ok(ServiceStatus {
            state,
            pid: running.then_some(raw_pid),
            uptime_secs,
            action,
        })
    }

    /// Maps a symbolic action to its control byte.
    pub const fn encode_command(&self, action: ControlAction) -> u8 {
        action.byte()
    }
}
