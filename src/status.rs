//! Status model and reporting for supervised services.
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use nix::{errno::Errno, sys::signal, unistd::Pid};
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::SvcError;
use crate::service::ServiceHandle;

const GREEN_BOLD: &str = "\x1b[1;32m"; // Bright Green
const RED_BOLD: &str = "\x1b[1;31m"; // Bright Red
const YELLOW_BOLD: &str = "\x1b[1;33m"; // Yellow/Gold
const RESET: &str = "\x1b[0m"; // Reset color

/// Version identifier for the machine-readable status snapshot payload.
pub const STATUS_SCHEMA_VERSION: &str = "svc-status.v1";

/// State the supervisor reports for the managed process.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceState {
    /// No process is running.
    Down,
    /// The `./run` process is active.
    Up,
    /// The `./finish` cleanup script is running (runit only).
    Finishing,
}

/// Last transition requested of the supervisor, independent of whether it
/// has taken effect yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceAction {
    /// The service would start automatically; it is down right now.
    NormallyUp,
    /// A `down` marker suppresses auto-start; it is running right now.
    NormallyDown,
    /// The process was sent STOP and is paused.
    Paused,
    /// An up command is pending while the process is down.
    WantUp,
    /// A down command is pending while the process is running.
    WantDown,
    /// The process has been sent TERM.
    GotTerm,
}

/// Structured status decoded from the supervisor's binary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Current process state.
    pub state: ServiceState,
    /// Pid of the supervised process; present exactly when it is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Seconds since the current state began.
    pub uptime_secs: u64,
    /// Pending or default transition, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ServiceAction>,
}

impl ServiceStatus {
    /// Wall-clock instant the current state began, derived from uptime.
    ///
    /// A zeroed or garbage timestamp field decodes to an absurdly large
    /// uptime; saturate to the epoch floor instead of overflowing.
    pub fn since(&self) -> DateTime<Utc> {
        let secs = i64::try_from(self.uptime_secs).unwrap_or(i64::MAX);
        ChronoDuration::try_seconds(secs)
            .and_then(|elapsed| Utc::now().checked_sub_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// One entry in a machine-readable status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReport {
    /// Service name (the directory name).
    pub name: String,
    /// Decoded status, absent when the service could not be queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    /// Why the status is absent (e.g. not under supervision).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the record's pid no longer maps to a live process.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

/// Machine-readable snapshot of every queried service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Payload schema identifier.
    pub schema_version: String,
    /// Instant the snapshot was assembled.
    pub captured_at: DateTime<Utc>,
    /// Per-service entries, sorted by name.
    pub services: Vec<ServiceReport>,
}

impl StatusSnapshot {
    fn new(services: Vec<ServiceReport>) -> Self {
        Self {
            schema_version: STATUS_SCHEMA_VERSION.to_string(),
            captured_at: Utc::now(),
            services,
        }
    }
}

/// Renders service status for terminal or JSON consumption.
pub struct StatusReporter {
    color: bool,
}

impl StatusReporter {
    /// Creates a reporter; `color` toggles ANSI escapes in human output.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Builds a report entry for one service, probing pid liveness.
    pub fn report(&self, handle: &ServiceHandle) -> ServiceReport {
        let name = handle.name();
        debug!("querying status for service: {name}");

        match handle.status() {
            Ok(status) => {
                let stale = status.pid.map(process_missing).unwrap_or(false);
                ServiceReport {
                    name,
                    status: Some(status),
                    error: None,
                    stale,
                }
            }
            Err(err) => ServiceReport {
                name,
                status: None,
                error: Some(err.to_string()),
                stale: false,
            },
        }
    }

    /// Builds a snapshot covering every supervised service in the directory.
    pub fn snapshot(&self, config: &ClientConfig) -> Result<StatusSnapshot, SvcError> {
        let handles = config.discover()?;
        let services = handles.iter().map(|handle| self.report(handle)).collect();
        Ok(StatusSnapshot::new(services))
    }

    /// Prints a human-readable status block for one report.
    pub fn print(&self, report: &ServiceReport) {
        let Some(status) = &report.status else {
            let detail = report.error.as_deref().unwrap_or("status unavailable");
            println!("● {} - {}", report.name, detail);
            return;
        };

        match status.state {
            ServiceState::Up | ServiceState::Finishing => {
                let label = if status.state == ServiceState::Finishing {
                    "Finishing"
                } else {
                    "Running"
                };
                println!("● {} {}", report.name, self.paint(GREEN_BOLD, label));
                println!(
                    "   Active: {} since {}; {}",
                    self.paint(GREEN_BOLD, "up"),
                    status.since().format("%Y-%m-%d %H:%M:%S UTC"),
                    format_elapsed(status.uptime_secs),
                );
                if let Some(pid) = status.pid {
                    if report.stale {
                        println!(
                            " Main PID: {pid} {}",
                            self.paint(RED_BOLD, "(process not found; stale record)")
                        );
                    } else {
                        println!(" Main PID: {pid}");
                    }
                }
            }
            ServiceState::Down => {
                println!("● {} {}", report.name, self.paint(RED_BOLD, "Down"));
                println!(
                    "   Active: {} since {}; {}",
                    self.paint(RED_BOLD, "down"),
                    status.since().format("%Y-%m-%d %H:%M:%S UTC"),
                    format_elapsed(status.uptime_secs),
                );
            }
        }

        if let Some(action) = status.action {
            println!(
                "   Wanted: {}",
                self.paint(YELLOW_BOLD, action.as_ref())
            );
        }
    }

    /// Prints every supervised service in the directory.
    pub fn print_all(&self, config: &ClientConfig) -> Result<(), SvcError> {
        let handles = config.discover()?;
        if handles.is_empty() {
            println!("No supervised services in {}.", config.service_dir.display());
            return Ok(());
        }

        println!("Service statuses:");
        for handle in &handles {
            self.print(&self.report(handle));
        }
        Ok(())
    }
}

/// Checks whether the recorded pid still maps to a live process.
///
/// A dead pid with an up-state record means the status file is stale, e.g.
/// the supervisor was killed without cleaning up its control directory.
fn process_missing(pid: u32) -> bool {
    // A pid beyond i32 range would wrap into a process-group probe; no such
    // pid can be probed, so never call it stale.
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    match signal::kill(Pid::from_raw(pid), None) {
        Ok(_) => false,
        Err(Errno::ESRCH) => true,
        // EPERM and friends still prove the process exists.
        Err(_) => false,
    }
}

/// Formats an elapsed-seconds count the way a human reads it.
pub fn format_elapsed(total_seconds: u64) -> String {
    match total_seconds {
        0..=59 => format!("{total_seconds} secs"),
        60..=3_599 => format!("{} mins", total_seconds / 60),
        3_600..=86_399 => format!("{} hours", total_seconds / 3_600),
        86_400..=604_799 => format!("{} days", total_seconds / 86_400),
        _ => format!("{} weeks", total_seconds / 604_800),
    }
}
