//! LDAP directory backend
//!
//! Plain LDAP, LDAPS and STARTTLS connections via `ldap3`. Every network
//! operation runs under the configured timeout.

mod client;
mod types;

pub use client::{LdapConnection, LdapConnector};
pub use types::*;
