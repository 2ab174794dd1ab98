//! # pingdom
//!
//! Minimal blocking client for the parts of the Pingdom API needed to manage
//! HTTP checks: listing checks by tag, reading, creating, updating and
//! deleting a check, and looking up account users.
//!
//! ## Example
//!
//! ```no_run
//! use pingdom::backend::Backend;
//! use pingdom::backend::http::HttpBackend;
//! use pingdom::Credentials;
//!
//! let backend = HttpBackend::new(Credentials::new("bob@example.com", "secret", "app-key"));
//! for check in backend.list_checks("managed-by-heimdallr", true).unwrap() {
//!     println!("{} {} ({})", check.id, check.name, check.check_type);
//! }
//! ```
//!
//! Code that drives a [`Backend`] can be tested against
//! [`backend::MockBackend`] without network access.

pub mod backend;
pub mod error;
pub mod types;

pub use backend::http::{DEFAULT_API_BASE, HttpBackend};
pub use backend::{Backend, Call, MockBackend, Operation};
pub use error::{Error, Result};
pub use types::{
    CheckDetail, CheckPayload, CheckSummary, CheckType, CreatedCheck, Credentials,
    HTTP_CHECK_TYPE, HttpSettings, Tag, User, UserEmail,
};
