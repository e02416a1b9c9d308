//! Macpass Core Library
//!
//! Configuration, error type and request types shared by the macpass
//! client and the directory authenticator.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DaemonConfig, KerberosConfig, MacpassConfig};
pub use error::{with_timeout, Error, Result};
pub use types::{AccessRequest, Credentials, MacAddress, Secret};

/// Macpass version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client configuration file name, looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Granted duration when the requested hours are not positive
pub const DEFAULT_DURATION_HOURS: u64 = 1;

/// Longest duration a single request may ask for
pub const MAX_DURATION_HOURS: u64 = 4;

/// Timeout applied to each directory and socket operation (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
