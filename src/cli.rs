//! Command-line interface for svcctl.
use std::{path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::codec::SupervisorFlavor;

/// Wrapper around `LevelFilter` so clap can parse log level names.
#[derive(Clone, Copy, Debug)]
pub struct LogLevelArg(LevelFilter);

impl LogLevelArg {
    /// String representation suitable for `RUST_LOG`.
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            LevelFilter::OFF => "off",
            LevelFilter::ERROR => "error",
            LevelFilter::WARN => "warn",
            LevelFilter::INFO => "info",
            LevelFilter::DEBUG => "debug",
            LevelFilter::TRACE => "trace",
        }
    }
}

impl FromStr for LogLevelArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let level = match value.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::OFF,
            "error" | "err" => LevelFilter::ERROR,
            "warn" | "warning" => LevelFilter::WARN,
            "info" => LevelFilter::INFO,
            "debug" => LevelFilter::DEBUG,
            "trace" => LevelFilter::TRACE,
            other => return Err(format!("invalid log level '{other}'")),
        };
        Ok(LogLevelArg(level))
    }
}

/// Command-line interface for svcctl.
#[derive(Parser)]
#[command(name = "svcctl", version, author)]
#[command(about = "Query and control runit/daemontools supervised services", long_about = None)]
pub struct Cli {
    /// Override the logging verbosity for this invocation only.
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Directory holding service definitions (defaults to `/var/service`).
    #[arg(long, value_name = "DIR", global = true)]
    pub service_dir: Option<PathBuf>,

    /// Supervisor flavor: runit or daemontools.
    #[arg(long, value_name = "FLAVOR", global = true)]
    pub flavor: Option<SupervisorFlavor>,

    /// Path to the configuration file (defaults to `svcctl.yaml` if present).
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for svcctl.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the status of a service, or of every supervised service.
    Status {
        /// Service name or directory path; omit to list all services.
        service: Option<String>,

        /// Emit machine-readable JSON output instead of a report.
        #[arg(long)]
        json: bool,

        /// Disable ANSI colors in output.
        #[arg(long = "no-color")]
        no_color: bool,
    },

    /// Bring the service up and keep it up.
    Up {
        /// Service name or directory path.
        service: String,
    },

    /// Take the service down.
    Down {
        /// Service name or directory path.
        service: String,
    },

    /// Start the service once, without restarting it when it stops.
    Once {
        /// Service name or directory path.
        service: String,
    },

    /// Send terminate followed by up, both fire-and-forget.
    Restart {
        /// Service name or directory path.
        service: String,
    },

    /// Send a named control command to the service.
    Signal {
        /// One of: up, down, once, pause, cont, hup, alarm, interrupt,
        /// quit, kill, term, exit, usr1, usr2.
        action: String,

        /// Service name or directory path.
        service: String,
    },
}

/// Parses command-line arguments and returns a `Cli` struct.
pub fn parse_args() -> Cli {
    Cli::parse()
}
