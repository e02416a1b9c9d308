//! Configuration for macpass
//!
//! The client reads a TOML file named `config.toml` that lives next to the
//! executable:
//!
//! ```toml
//! ldapUri = "ldap://ldap.example.com:389"
//! baseDN = "ou=people,dc=example,dc=com"
//! bindAdmin = "cn=readonly,dc=example,dc=com"
//! bindPassword = "secret"
//! userDNType = "uid"
//! socketPath = "/tmp/macpass.sock"
//! ```
//!
//! The daemon has its own YAML schema, see [`DaemonConfig`].

use crate::types::Secret;
use crate::{Error, Result, CONFIG_FILE_NAME, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Client configuration, loaded once at startup and never mutated after
/// validation.
#[derive(Debug, Clone, Deserialize)]
pub struct MacpassConfig {
    /// Directory server URL (ldap://, ldaps:// or ldapi://)
    #[serde(rename = "ldapUri", default)]
    pub ldap_uri: String,

    /// Base DN under which user entries live
    /// Example: "ou=people,dc=example,dc=com"
    #[serde(rename = "baseDN", default)]
    pub base_dn: String,

    /// Service account DN used for the first bind
    #[serde(rename = "bindAdmin", default)]
    pub bind_admin: String,

    /// Service account password
    #[serde(rename = "bindPassword", default)]
    pub bind_password: Secret,

    /// Attribute naming the user in its DN, e.g. "uid" or "cn"
    #[serde(rename = "userDNType", default = "default_user_dn_type")]
    pub user_dn_type: String,

    /// Unix socket the daemon listens on
    #[serde(rename = "socketPath", default = "default_socket_path")]
    pub socket_path: PathBuf,

    /// Timeout for each directory and socket operation, in seconds
    #[serde(rename = "timeoutSeconds", default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Upgrade plain ldap:// connections with STARTTLS
    #[serde(rename = "startTls", default)]
    pub start_tls: bool,

    /// Skip TLS certificate verification (not recommended for production)
    #[serde(rename = "skipTlsVerify", default)]
    pub skip_tls_verify: bool,

    /// Refuse to send addresses that do not parse as a hardware address
    #[serde(rename = "strictMac", default)]
    pub strict_mac: bool,
}

fn default_user_dn_type() -> String {
    "uid".to_string()
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/macpass.sock")
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for MacpassConfig {
    fn default() -> Self {
        Self {
            ldap_uri: String::new(),
            base_dn: String::new(),
            bind_admin: String::new(),
            bind_password: Secret::default(),
            user_dn_type: default_user_dn_type(),
            socket_path: default_socket_path(),
            timeout_seconds: default_timeout(),
            start_tls: false,
            skip_tls_verify: false,
            strict_mac: false,
        }
    }
}

impl MacpassConfig {
    /// Path of the configuration file next to the running executable
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| Error::Config("Executable has no parent directory".into()))?;
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        debug!("Parsing configuration from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Override file values with `MACPASS_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override file values from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MACPASS_LDAP_URI") {
            self.ldap_uri = uri;
        }
        if let Some(base_dn) = lookup("MACPASS_BASE_DN") {
            self.base_dn = base_dn;
        }
        if let Some(admin) = lookup("MACPASS_BIND_ADMIN") {
            self.bind_admin = admin;
        }
        if let Some(password) = lookup("MACPASS_BIND_PASSWORD") {
            self.bind_password = Secret::new(password);
        }
        if let Some(dn_type) = lookup("MACPASS_USER_DN_TYPE") {
            self.user_dn_type = dn_type;
        }
        if let Some(path) = lookup("MACPASS_SOCKET_PATH") {
            self.socket_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ldap_uri.is_empty() {
            return Err(Error::Config("ldapUri is required".into()));
        }

        if !["ldap://", "ldaps://", "ldapi://"]
            .iter()
            .any(|scheme| self.ldap_uri.starts_with(scheme))
        {
            return Err(Error::Config(
                "ldapUri must start with ldap://, ldaps:// or ldapi://".into(),
            ));
        }

        if self.base_dn.is_empty() {
            return Err(Error::Config("baseDN is required".into()));
        }

        if self.bind_admin.is_empty() {
            return Err(Error::Config("bindAdmin is required".into()));
        }

        if self.bind_password.is_empty() {
            return Err(Error::Config("bindPassword is required".into()));
        }

        if self.user_dn_type.is_empty() {
            return Err(Error::Config("userDNType is required".into()));
        }

        if self.socket_path.as_os_str().is_empty() {
            return Err(Error::Config("socketPath is required".into()));
        }

        if self.timeout_seconds == 0 {
            return Err(Error::Config("timeoutSeconds must be positive".into()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Kerberos settings of the daemon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KerberosConfig {
    #[serde(default)]
    pub realm: String,

    #[serde(rename = "disablePAFXFAST", default)]
    pub disable_pa_fx_fast: bool,
}

/// Daemon configuration (YAML). Only parsed here; the daemon owns the
/// semantics of every field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub kerberos: KerberosConfig,

    #[serde(rename = "socketPath", default = "default_socket_path")]
    pub socket_path: PathBuf,

    #[serde(rename = "maxConnectionTime", default)]
    pub max_connection_time: u64,
}

impl DaemonConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse daemon config: {}", e)))
    }
}
