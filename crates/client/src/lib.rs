//! Cookie validation engine for crumb.
//!
//! This crate replays stored cookies against their website over HTTP and
//! decides, per cookie, whether the site still accepts it.

pub mod service;
pub mod transport;
pub mod validate;

pub use transport::{HttpTransport, ReplayConfig, ReplayResponse, Transport, TransportError};
pub use validate::{CookieValidator, ValidationPolicy, normalize_website};
