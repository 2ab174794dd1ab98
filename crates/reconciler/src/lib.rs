//! # Reconciler
//!
//! Keeps Pingdom HTTP checks in line with declared `HTTPCheck` resources.
//!
//! ## Core Concepts
//!
//! - **Identity**: `<namespace>/<name>` of a resource, also used as the remote check's name
//! - **Ownership tag**: marker on every remote check we create; untagged checks are never touched
//! - **ReconciliationStore**: identity -> remote id and last applied spec
//! - **Reconciler**: turns a [`CheckEvent`] into the one remote call needed to converge
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pingdom::{Credentials, HttpBackend};
//! use reconciler::{CheckEvent, HttpCheck, HttpCheckSpec, Reconciler, Settings};
//!
//! let backend = HttpBackend::new(Credentials::new("bob@example.com", "secret", "app-key"));
//! // Fails unless the account view could be rebuilt
//! let reconciler = Reconciler::new(Box::new(backend), Settings::new("bob@example.com"))?;
//!
//! let spec = HttpCheckSpec {
//!     hostname: "example.com".into(),
//!     interval_minutes: 5,
//!     ..HttpCheckSpec::default()
//! };
//! let mut event = CheckEvent::Added(Arc::new(HttpCheck::new("example", None, spec)));
//! reconciler.handle(&mut event);
//! println!("{}", event.object().status.state);
//! # Ok::<(), reconciler::Error>(())
//! ```

pub mod error;
pub mod event;
pub mod reconciler;
pub mod report;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use event::CheckEvent;
pub use reconciler::{DEFAULT_TAG, Reconciler, Settings};
pub use report::{
    Action, LogReporter, NoReporter, Outcome, RecordingReporter, StatusReporter, status_message,
};
pub use store::ReconciliationStore;
pub use types::{
    DEFAULT_NAMESPACE, GROUP, HttpCheck, HttpCheckSpec, HttpCheckStatus, KIND, ObjectMeta,
    OwnedCheck, PLURAL, VERSION, api_version, identity,
};
