//! LDAP connection settings and result codes

use macpass_core::MacpassConfig;
use std::time::Duration;

/// Connection settings derived from the client configuration
#[derive(Debug, Clone)]
pub struct LdapSettings {
    /// LDAP server URL (ldap://, ldaps:// or ldapi://)
    pub server_url: String,

    /// Use STARTTLS for connection upgrade
    pub start_tls: bool,

    /// Skip TLS certificate verification
    pub skip_tls_verify: bool,

    /// Applied to the connect and to each bind/unbind
    pub timeout: Duration,
}

impl From<&MacpassConfig> for LdapSettings {
    fn from(config: &MacpassConfig) -> Self {
        Self {
            server_url: config.ldap_uri.clone(),
            start_tls: config.start_tls,
            skip_tls_verify: config.skip_tls_verify,
            timeout: config.timeout(),
        }
    }
}

// RFC 4511 result codes a bind can come back with
pub const RC_SUCCESS: u32 = 0;
pub const RC_INVALID_DN_SYNTAX: u32 = 34;
pub const RC_INAPPROPRIATE_AUTHENTICATION: u32 = 48;
pub const RC_INVALID_CREDENTIALS: u32 = 49;
pub const RC_INSUFFICIENT_ACCESS: u32 = 50;
pub const RC_UNWILLING_TO_PERFORM: u32 = 53;

/// Human-readable reason for a failed bind
pub fn describe_result_code(rc: u32) -> &'static str {
    match rc {
        RC_SUCCESS => "success",
        RC_INVALID_DN_SYNTAX => "invalid DN syntax",
        RC_INAPPROPRIATE_AUTHENTICATION => "inappropriate authentication",
        RC_INVALID_CREDENTIALS => "invalid credentials",
        RC_INSUFFICIENT_ACCESS => "insufficient access rights",
        // AD also answers 53 for disabled or locked accounts
        RC_UNWILLING_TO_PERFORM => "unwilling to perform (account disabled or locked?)",
        _ => "bind rejected",
    }
}
