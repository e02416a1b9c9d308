//! Hardware address parsing
//!
//! Accepts IEEE 802 MAC-48, EUI-48, EUI-64 and 20-octet IP over
//! InfiniBand link-layer addresses in any of these notations:
//!
//! ```text
//! 00:00:5e:00:53:01
//! 00-00-5e-00-53-01
//! 0000.5e00.5301
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Octet counts of the supported address families
const VALID_LENGTHS: [usize; 3] = [6, 8, 20];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(Vec<u8>);

impl MacAddress {
    pub fn octets(&self) -> &[u8] {
        &self.0
    }

    /// Parse `s`, returning a validation error naming the rejected input
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("address {}: invalid MAC address", s));

        let parsed = match s.chars().find(|c| matches!(c, '.' | ':' | '-')) {
            Some('.') => parse_dotted(s),
            Some(sep) => parse_separated(s, sep),
            None => None,
        };
        let octets = parsed.ok_or_else(invalid)?;

        if !VALID_LENGTHS.contains(&octets.len()) {
            return Err(invalid());
        }

        Ok(Self(octets))
    }
}

/// `xx:xx:xx...`, every octet exactly two hex digits
fn parse_separated(s: &str, sep: char) -> Option<Vec<u8>> {
    s.split(sep)
        .map(|part| {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            u8::from_str_radix(part, 16).ok()
        })
        .collect()
}

/// `xxxx.xxxx.xxxx`, every group exactly four hex digits
fn parse_dotted(s: &str) -> Option<Vec<u8>> {
    let mut octets = Vec::new();
    for group in s.split('.') {
        if group.len() != 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        octets.push(u8::from_str_radix(&group[..2], 16).ok()?);
        octets.push(u8::from_str_radix(&group[2..], 16).ok()?);
    }
    Some(octets)
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", octet)?;
        }
        Ok(())
    }
}
