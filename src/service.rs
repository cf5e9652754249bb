//! Handle for one supervised service's control directory.
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::codec::{ControlAction, StatusCodec};
use crate::constants::{
    CONTROL_FILE, DOWN_MARKER, PID_FILE, STATUS_FILE, SUPERVISE_DIR,
};
use crate::error::{MalformedRecord, SvcError};
use crate::status::{ServiceAction, ServiceState, ServiceStatus};

/// Stateless client for a single service directory.
///
/// Holds only the path and a codec; every operation opens, acts on, and
/// closes its files within the call. The supervisor daemon owns all durable
/// state, so handles are cheap to construct and discard.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    path: PathBuf,
    codec: StatusCodec,
}

impl ServiceHandle {
    /// Binds a handle to a service directory.
    pub fn new(path: impl Into<PathBuf>, codec: StatusCodec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    /// The service directory this handle is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Service name, i.e. the final path component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether a supervisor has set up the control directory.
    pub fn is_supervised(&self) -> bool {
        self.path.join(SUPERVISE_DIR).is_dir()
    }

    fn supervise_file(&self, file: &str) -> PathBuf {
        self.path.join(SUPERVISE_DIR).join(file)
    }

    fn unavailable_on_enoent(&self, err: io::Error) -> SvcError {
        if err.kind() == io::ErrorKind::NotFound {
            SvcError::ServiceUnavailable {
                service: self.path.clone(),
            }
        } else {
            SvcError::Io(err)
        }
    }

    /// Reads and decodes the current status record.
    ///
    /// When the codec reports no pending transition, the `down` marker file
    /// supplies the default-state hint: a service running despite the marker
    /// is normally down, and a service down without it is normally up.
    pub fn status(&self) -> Result<ServiceStatus, SvcError> {
        let raw = fs::read(self.supervise_file(STATUS_FILE))
            .map_err(|err| self.unavailable_on_enoent(err))?;
        let mut status = self.codec.decode(&raw)?;

        if status.action.is_none() {
            let marked_down = self.path.join(DOWN_MARKER).exists();
            status.action = match (status.state, marked_down) {
                (ServiceState::Down, false) => Some(ServiceAction::NormallyUp),
                (ServiceState::Up | ServiceState::Finishing, true) => {
                    Some(ServiceAction::NormallyDown)
                }
                _ => None,
            };
        }

        debug!(service = %self.name(), state = status.state.as_ref(), "decoded status");
        Ok(status)
    }

    /// Writes one command byte to the control pipe.
    ///
    /// Fire-and-forget: success means the byte was written, not that the
    /// supervisor has acted on it. Callers needing confirmation poll
    /// [`status`](Self::status) afterward.
    pub fn send(&self, action: ControlAction) -> Result<(), SvcError> {
        let byte = self.codec.encode_command(action);

        // Append, never truncate: the control file is normally a named pipe,
        // and truncation would be wrong on anything else.
        let mut control = OpenOptions::new()
            .append(true)
            .open(self.supervise_file(CONTROL_FILE))
            .map_err(|err| self.unavailable_on_enoent(err))?;
        control.write_all(&[byte])?;

        debug!(service = %self.name(), action = action.as_ref(), "sent control byte");
        Ok(())
    }

    /// Parses an action name and sends it, rejecting unknown names before
    /// any I/O.
    pub fn send_named(&self, action: &str) -> Result<(), SvcError> {
        self.send(ControlAction::parse(action)?)
    }

    /// Brings the service up and keeps it up.
    pub fn start(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Up)
    }

    /// Takes the service down.
    pub fn stop(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Down)
    }

    /// Starts the service without restarting it when it stops.
    pub fn once(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Once)
    }

    /// Sends TERM then up: two single-byte writes, in that order.
    ///
    /// The supervisor consumes control bytes in write order; nothing here
    /// waits for the stop to complete before requesting the start.
    pub fn restart(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Terminate)?;
        self.send(ControlAction::Up)
    }

    /// Sends the service a STOP signal.
    pub fn pause(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Pause)
    }

    /// Sends the service a CONT signal.
    pub fn cont(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Continue)
    }

    /// Sends the service a HUP signal.
    pub fn hangup(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Hangup)
    }

    /// Sends the service an ALRM signal.
    pub fn alarm(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Alarm)
    }

    /// Sends the service an INT signal.
    pub fn interrupt(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Interrupt)
    }

    /// Sends the service a QUIT signal.
    pub fn quit(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Quit)
    }

    /// Sends the service a TERM signal.
    pub fn terminate(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Terminate)
    }

    /// Sends the service a KILL signal.
    pub fn kill(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Kill)
    }

    /// Tells the supervisor itself to exit after stopping the service.
    pub fn exit(&self) -> Result<(), SvcError> {
        self.send(ControlAction::Exit)
    }

    /// Reads the optional plain-text `supervise/pid` file.
    ///
    /// Some supervisor flavors maintain it alongside the binary record;
    /// callers may use it as a fallback when the record carries no pid.
    pub fn pid_from_file(&self) -> Result<Option<u32>, SvcError> {
        let contents = match fs::read_to_string(self.supervise_file(PID_FILE)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SvcError::Io(err)),
        };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        trimmed
            .parse::<u32>()
            .map(Some)
            .map_err(|_| MalformedRecord::PidFile(trimmed.to_string()).into())
    }
}
