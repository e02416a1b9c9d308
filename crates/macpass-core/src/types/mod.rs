//! Domain types shared across macpass crates

mod credentials;
mod mac;
mod request;

pub use credentials::{Credentials, Secret};
pub use mac::MacAddress;
pub use request::{clamp_hours, AccessRequest};
