//! Directory authentication for macpass
//!
//! Verifies a human's password with two binds on one connection: first as
//! the configured service account, then as the user. Nothing the user types
//! reaches the directory before the service bind has succeeded.

pub mod authenticator;
pub mod directory;
pub mod ldap;
pub mod testing;

pub use authenticator::{authenticate, user_dn, AuthenticatedIdentity, CredentialSource};
pub use directory::{Directory, DirectoryConnector};
pub use ldap::{LdapConnection, LdapConnector, LdapSettings};
