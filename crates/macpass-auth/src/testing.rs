//! Test doubles for the authenticator.
//!
//! [`FakeDirectory`] records every connect, bind and close so tests can
//! assert on ordering and on exactly what reached the directory.
//! [`StaticCredentials`] hands out fixed credentials and counts how often it
//! was asked.
//!
//! ```
//! use macpass_auth::testing::{FakeDirectory, StaticCredentials};
//!
//! let directory = FakeDirectory::new()
//!     .with_account("cn=admin,dc=example,dc=com", "admin")
//!     .with_account("uid=alice,dc=example,dc=com", "secret");
//! let source = StaticCredentials::new("alice", "secret");
//! assert_eq!(source.calls(), 0);
//! assert!(directory.events().is_empty());
//! ```

use crate::authenticator::CredentialSource;
use crate::directory::{Directory, DirectoryConnector};
use async_trait::async_trait;
use macpass_core::{Credentials, Error, Result, Secret};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// What the fake directory saw, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    Connect,
    Bind { dn: String, secret: String },
    Close,
}

#[derive(Default)]
struct FakeState {
    accounts: HashMap<String, String>,
    events: Vec<DirectoryEvent>,
    unreachable: bool,
}

/// In-memory directory keyed by DN
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory whose connect always fails
    pub fn unreachable() -> Self {
        let directory = Self::default();
        directory.state.lock().unreachable = true;
        directory
    }

    pub fn with_account(self, dn: &str, secret: &str) -> Self {
        self.state
            .lock()
            .accounts
            .insert(dn.to_string(), secret.to_string());
        self
    }

    pub fn events(&self) -> Vec<DirectoryEvent> {
        self.state.lock().events.clone()
    }

    /// DNs of every bind attempt, in order
    pub fn bind_dns(&self) -> Vec<String> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|event| match event {
                DirectoryEvent::Bind { dn, .. } => Some(dn.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn secret_was_sent(&self, secret: &str) -> bool {
        self.state.lock().events.iter().any(|event| {
            matches!(event, DirectoryEvent::Bind { secret: sent, .. } if sent == secret)
        })
    }

    pub fn close_count(&self) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|event| **event == DirectoryEvent::Close)
            .count()
    }
}

#[async_trait]
impl DirectoryConnector for FakeDirectory {
    type Connection = FakeConnection;

    async fn connect(&self) -> Result<FakeConnection> {
        let mut state = self.state.lock();
        if state.unreachable {
            return Err(Error::Connection("fake directory is unreachable".into()));
        }
        state.events.push(DirectoryEvent::Connect);

        Ok(FakeConnection {
            state: self.state.clone(),
        })
    }
}

/// Connection handed out by [`FakeDirectory`]
pub struct FakeConnection {
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl Directory for FakeConnection {
    async fn bind(&mut self, dn: &str, secret: &Secret) -> Result<()> {
        let mut state = self.state.lock();
        state.events.push(DirectoryEvent::Bind {
            dn: dn.to_string(),
            secret: secret.expose().to_string(),
        });

        match state.accounts.get(dn) {
            Some(expected) if expected == secret.expose() => Ok(()),
            _ => Err(Error::Auth(format!("Invalid credentials for {} (rc=49)", dn))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.state.lock().events.push(DirectoryEvent::Close);
        Ok(())
    }
}

/// Credential source returning fixed values
pub struct StaticCredentials {
    credentials: Option<Credentials>,
    calls: usize,
}

impl StaticCredentials {
    pub fn new(username: &str, secret: &str) -> Self {
        Self {
            credentials: Some(Credentials::from_input(username, secret)),
            calls: 0,
        }
    }

    /// Source whose input stream is already closed
    pub fn closed() -> Self {
        Self {
            credentials: None,
            calls: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl CredentialSource for StaticCredentials {
    fn collect(&mut self) -> Result<Credentials> {
        self.calls += 1;
        self.credentials.clone().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed",
            ))
        })
    }
}
