//! LDAP client implementation
//!
//! Opens one connection per run and performs simple binds on it.

use crate::directory::{Directory, DirectoryConnector};
use crate::ldap::types::*;
use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use macpass_core::{with_timeout, Error, MacpassConfig, Result, Secret};
use std::time::Duration;
use tracing::debug;

/// Opens LDAP connections with the configured TLS and timeout settings
pub struct LdapConnector {
    settings: LdapSettings,
}

impl LdapConnector {
    pub fn new(config: &MacpassConfig) -> Self {
        Self {
            settings: LdapSettings::from(config),
        }
    }

    pub fn settings(&self) -> &LdapSettings {
        &self.settings
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    type Connection = LdapConnection;

    async fn connect(&self) -> Result<LdapConnection> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.settings.timeout)
            .set_starttls(self.settings.start_tls)
            .set_no_tls_verify(self.settings.skip_tls_verify);

        debug!("Connecting to LDAP server: {}", self.settings.server_url);

        let (conn, ldap) = with_timeout(
            self.settings.timeout,
            "LDAP connect",
            LdapConnAsync::with_settings(settings, &self.settings.server_url),
        )
        .await?
        .map_err(|e| {
            Error::Connection(format!(
                "Failed to connect to LDAP server {}: {}",
                self.settings.server_url, e
            ))
        })?;

        ldap3::drive!(conn);

        Ok(LdapConnection {
            ldap,
            timeout: self.settings.timeout,
        })
    }
}

/// An open LDAP connection
pub struct LdapConnection {
    ldap: Ldap,
    timeout: Duration,
}

#[async_trait]
impl Directory for LdapConnection {
    async fn bind(&mut self, dn: &str, secret: &Secret) -> Result<()> {
        let result = with_timeout(
            self.timeout,
            "LDAP bind",
            self.ldap.simple_bind(dn, secret.expose()),
        )
        .await?
        .map_err(|e| Error::Connection(format!("Bind as {} failed: {}", dn, e)))?;

        if result.rc != RC_SUCCESS {
            return Err(Error::Auth(format!(
                "Bind as {} rejected: {} (rc={})",
                dn,
                describe_result_code(result.rc),
                result.rc
            )));
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        with_timeout(self.timeout, "LDAP unbind", self.ldap.unbind())
            .await?
            .map_err(|e| Error::Connection(format!("Unbind failed: {}", e)))
    }
}
