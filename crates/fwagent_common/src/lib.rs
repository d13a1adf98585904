//! Shared library for the fwagent firmware maintenance daemon.
//!
//! Holds everything the daemon's subsystems agree on: the error taxonomy,
//! firmware version comparison, content hashing, the agent configuration
//! and the HTTP request/response types.

pub mod config;
pub mod error;
pub mod hashing;
pub mod types;
pub mod version;

pub use config::AgentConfig;
pub use error::{Result, UpdateError};
pub use version::FirmwareVersion;
