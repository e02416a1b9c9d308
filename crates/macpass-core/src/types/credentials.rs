//! Credentials typed at the terminal

use serde::Deserialize;
use std::fmt;

/// A password that never shows up in `Debug` output or logs
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Username and password pair, consumed by the user bind and then dropped
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: Secret,
}

impl Credentials {
    /// Build from raw terminal input, trimming surrounding whitespace.
    /// Empty values are kept; the directory decides what they mean.
    pub fn from_input(username: &str, secret: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            secret: Secret::new(secret.trim()),
        }
    }
}
