//! Two-phase bind
//!
//! 1. Connect to the directory
//! 2. Bind as the service account from the configuration
//! 3. Collect the user's credentials
//! 4. Bind as `<userDNType>=<username>,<baseDN>` with the user's password
//! 5. Unbind, whatever happened above
//!
//! Every failure is final; there is no retry with other credentials.

use crate::directory::{Directory, DirectoryConnector};
use macpass_core::{Credentials, Error, MacpassConfig, Result};
use tracing::{debug, info, warn};

/// Supplies the user's credentials once the service bind has succeeded.
pub trait CredentialSource {
    /// Fails with `Error::Io` when the input is closed or unreadable.
    fn collect(&mut self) -> Result<Credentials>;
}

/// Proof that a user bind succeeded. Only [`authenticate`] creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    username: String,
}

impl AuthenticatedIdentity {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Build the user's DN. The username is escaped so that DN metacharacters
/// cannot add or change RDNs.
pub fn user_dn(attribute: &str, username: &str, base_dn: &str) -> String {
    format!("{}={},{}", attribute, ldap3::dn_escape(username), base_dn)
}

/// Run the two-phase bind against a connection from `connector`.
///
/// The connection is closed exactly once on every path after it has been
/// opened.
pub async fn authenticate<C>(
    connector: &C,
    config: &MacpassConfig,
    source: &mut dyn CredentialSource,
) -> Result<AuthenticatedIdentity>
where
    C: DirectoryConnector + ?Sized,
{
    let mut conn = connector.connect().await?;

    let outcome = bind_user(&mut conn, config, source).await;

    if let Err(e) = conn.close().await {
        warn!("Failed to release directory connection: {}", e);
    }

    outcome
}

async fn bind_user<D: Directory>(
    conn: &mut D,
    config: &MacpassConfig,
    source: &mut dyn CredentialSource,
) -> Result<AuthenticatedIdentity> {
    debug!("Binding as service account {}", config.bind_admin);

    if config.bind_password.is_empty() {
        return Err(Error::Auth("Service account bind failed: empty bindPassword".into()));
    }

    conn.bind(&config.bind_admin, &config.bind_password)
        .await
        .map_err(|e| match e {
            Error::Auth(msg) => Error::Auth(format!("Service account bind failed: {}", msg)),
            other => other,
        })?;

    let credentials = source.collect()?;

    // An empty password would be an unauthenticated bind, which many
    // servers accept without checking anything.
    if credentials.secret.is_empty() {
        return Err(Error::Auth("Empty password not allowed".into()));
    }

    let dn = user_dn(&config.user_dn_type, &credentials.username, &config.base_dn);
    debug!("Binding as {}", dn);

    conn.bind(&dn, &credentials.secret).await?;

    info!("Authenticated {}", credentials.username);

    Ok(AuthenticatedIdentity {
        username: credentials.username,
    })
}
