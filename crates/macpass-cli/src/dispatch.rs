//! Request dispatch to the daemon
//!
//! Delivery is fire-and-forget: one connection, one write, close. The daemon
//! never answers, so a successful dispatch only means the bytes left this
//! process.

use async_trait::async_trait;
use macpass_auth::AuthenticatedIdentity;
use macpass_core::{with_timeout, AccessRequest, Error, MacAddress, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tracing::{debug, info, warn};

/// Best-effort, one-way delivery of a serialized request.
///
/// `Ok(())` means the payload was written in full and the connection
/// closed. It says nothing about whether the daemon accepted or applied
/// the request; there is no acknowledgement.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &[u8]) -> Result<()>;
}

/// Writes to the daemon's Unix socket
pub struct UnixSocketNotifier {
    path: PathBuf,
    timeout: Duration,
}

impl UnixSocketNotifier {
    pub fn new(path: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for UnixSocketNotifier {
    async fn notify(&self, payload: &[u8]) -> Result<()> {
        debug!("Connecting to daemon socket {}", self.path.display());

        let connect = UnixStream::connect(&self.path);
        let mut stream = with_timeout(self.timeout, "socket connect", connect)
            .await?
            .map_err(|e| {
                Error::Connection(format!(
                    "Daemon socket {} unavailable: {}",
                    self.path.display(),
                    e
                ))
            })?;

        with_timeout(self.timeout, "socket write", stream.write_all(payload)).await??;
        with_timeout(self.timeout, "socket close", stream.shutdown()).await??;

        debug!("Wrote {} bytes to {}", payload.len(), self.path.display());
        Ok(())
    }
}

/// Check the MAC and build the request for `identity`.
///
/// An unparsable MAC is only logged unless `strict_mac` is set; the value is
/// always sent as typed.
pub fn prepare_request(
    identity: &AuthenticatedIdentity,
    mac: &str,
    hours: i64,
    strict_mac: bool,
) -> Result<AccessRequest> {
    match MacAddress::parse(mac) {
        Ok(parsed) => debug!("Hardware address {} parsed as {}", mac, parsed),
        Err(e) if strict_mac => return Err(e),
        Err(e) => warn!("{}", e),
    }

    Ok(AccessRequest::new(identity.username(), mac, hours))
}

/// Serialize and hand the request to `notifier`. Serialization happens
/// before any connection is opened.
pub async fn dispatch<N>(request: &AccessRequest, notifier: &N) -> Result<()>
where
    N: Notifier + ?Sized,
{
    let payload = request.encode()?;
    notifier.notify(&payload).await?;

    info!(
        "Requested {:?} of access for {} on behalf of {}",
        request.duration(),
        request.mac(),
        request.user()
    );
    Ok(())
}
