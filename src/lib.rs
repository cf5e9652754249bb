//! Svcctl is a stateless client for services managed by a runit or
//! daemontools style process supervisor. It decodes the fixed-size binary
//! status record the supervisor maintains for each service and sends
//! single-byte commands through the service's control pipe; the supervisor
//! itself (spawning, monitoring, restarting) is an external collaborator.

/// CLI interface.
pub mod cli;

/// Status record and control command codec.
pub mod codec;

/// Client configuration.
pub mod config;

/// Control-directory convention constants.
pub mod constants;

/// Error handling.
pub mod error;

/// Service handle: per-service query and control operations.
pub mod service;

/// Status model and reporting.
pub mod status;
