//! Directory abstraction used by the authenticator

use async_trait::async_trait;
use macpass_core::{Result, Secret};

/// One open directory connection.
#[async_trait]
pub trait Directory: Send {
    /// Simple bind. A rejected identity or secret is `Error::Auth`; a
    /// transport failure is `Error::Connection` or `Error::Timeout`.
    async fn bind(&mut self, dn: &str, secret: &Secret) -> Result<()>;

    /// Unbind and release the connection.
    async fn close(&mut self) -> Result<()>;
}

/// Opens [`Directory`] connections.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    type Connection: Directory;

    async fn connect(&self) -> Result<Self::Connection>;
}
