//! Watch-stream input
//!
//! Reads `HTTPCheck` watch events in the Kubernetes watch encoding
//! (`{"type": "ADDED", "object": {...}}`), concatenated or one per line,
//! and hands them to the reconciler one at a time.

use anyhow::{Context, Result};
use reconciler::{CheckEvent, HttpCheck, Reconciler};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// A decoded watch event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Added(HttpCheck),
    Modified(HttpCheck),
    Deleted(HttpCheck),
}

impl WatchEvent {
    /// Decode one stream entry.
    ///
    /// Entries that are not usable are logged with the payload and its JSON
    /// type, then dropped by returning `None`.
    pub fn decode(value: Value) -> Option<Self> {
        let raw: RawEvent = match serde_json::from_value(value.clone()) {
            Ok(raw) => raw,
            Err(err) => {
                log::error!(
                    "decode: unexpected watch event {value} of type {}: {err}",
                    json_type(&value)
                );
                return None;
            }
        };

        let (handler, build): (&str, fn(HttpCheck) -> Self) = match raw.kind.as_str() {
            "ADDED" => ("on_add", Self::Added),
            "MODIFIED" => ("on_update", Self::Modified),
            "DELETED" => ("on_delete", Self::Deleted),
            "BOOKMARK" => {
                log::debug!("ignoring bookmark event");
                return None;
            }
            "ERROR" => {
                log::warn!("watch reported an error: {}", raw.object);
                return None;
            }
            other => {
                log::error!(
                    "decode: unexpected watch event type {other:?} in {value} of type {}",
                    json_type(&value)
                );
                return None;
            }
        };

        match decode_check(&raw.object) {
            Ok(check) => Some(build(check)),
            Err(reason) => {
                log::error!(
                    "{handler}: unexpected object {} of type {}: {reason}",
                    raw.object,
                    json_type(&raw.object)
                );
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    object: Value,
}

fn decode_check(object: &Value) -> std::result::Result<HttpCheck, String> {
    if !object.is_object() {
        return Err("expected an HTTPCheck object".to_string());
    }
    let check: HttpCheck = serde_json::from_value(object.clone()).map_err(|e| e.to_string())?;
    if !check.is_expected_kind() {
        return Err(format!(
            "expected kind {}, got {}",
            reconciler::KIND,
            check.kind.as_deref().unwrap_or_default()
        ));
    }
    if check.metadata.name.is_empty() {
        return Err("object has no name".to_string());
    }
    Ok(check)
}

/// Name of a JSON value's type
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What happened to the events of one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Entries read from the stream
    pub received: usize,
    /// Entries that were not usable events
    pub dropped: usize,
    /// Redelivered objects that needed no work
    pub unchanged: usize,
    /// Remote checks created, updated or deleted
    pub changed: usize,
    /// Deletes with nothing owned to delete
    pub absent: usize,
    /// Remote calls that failed
    pub failed: usize,
}

/// Feeds watch events to a [`Reconciler`], one at a time.
///
/// Keeps the last object seen per identity, so a `MODIFIED` event has an old
/// object to compare against. An object redelivered with the same
/// `resourceVersion` is passed on as the very same instance, which the
/// reconciler skips.
pub struct Dispatcher<'a> {
    reconciler: &'a Reconciler,
    seen: HashMap<String, Arc<HttpCheck>>,
    summary: DispatchSummary,
}

impl<'a> Dispatcher<'a> {
    pub fn new(reconciler: &'a Reconciler) -> Self {
        Self {
            reconciler,
            seen: HashMap::new(),
            summary: DispatchSummary::default(),
        }
    }

    pub fn summary(&self) -> DispatchSummary {
        self.summary
    }

    /// Last object seen under `identity`, with the status written to it.
    pub fn last_seen(&self, identity: &str) -> Option<&Arc<HttpCheck>> {
        self.seen.get(identity)
    }

    /// Dispatch every event in `reader` until it is exhausted.
    ///
    /// Bad events are dropped; a stream that is not valid JSON ends the run.
    pub fn run(&mut self, reader: impl Read) -> Result<DispatchSummary> {
        let stream =
            serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter::<Value>();
        for value in stream {
            let value = value.context("invalid watch stream")?;
            self.dispatch_value(value);
        }
        Ok(self.summary)
    }

    /// Decode and dispatch one stream entry.
    pub fn dispatch_value(&mut self, value: Value) {
        self.summary.received += 1;
        match WatchEvent::decode(value) {
            Some(event) => self.dispatch(event),
            None => self.summary.dropped += 1,
        }
    }

    pub fn dispatch(&mut self, event: WatchEvent) {
        let mut event = match event {
            WatchEvent::Added(check) => CheckEvent::Added(Arc::new(check)),
            WatchEvent::Modified(check) => self.update_event(check),
            WatchEvent::Deleted(check) => CheckEvent::Deleted(Arc::new(check)),
        };
        log::debug!("dispatching {} of {}", event.kind(), event.object().identity());

        match self.reconciler.handle(&mut event) {
            None => self.summary.unchanged += 1,
            Some(Ok(outcome)) if outcome.is_change() => self.summary.changed += 1,
            Some(Ok(_)) => self.summary.absent += 1,
            Some(Err(_)) => self.summary.failed += 1,
        }

        match event {
            CheckEvent::Deleted(check) => {
                self.seen.remove(&check.identity());
            }
            other => {
                let check = other.into_object();
                self.seen.insert(check.identity(), check);
            }
        }
    }

    fn update_event(&self, check: HttpCheck) -> CheckEvent {
        let Some(old) = self.seen.get(&check.identity()) else {
            let old = Arc::new(check.clone());
            return CheckEvent::Updated {
                old,
                new: Arc::new(check),
            };
        };

        let redelivered = check.metadata.resource_version.is_some()
            && check.metadata.resource_version == old.metadata.resource_version;
        let new = if redelivered {
            Arc::clone(old)
        } else {
            Arc::new(check)
        };
        CheckEvent::Updated {
            old: Arc::clone(old),
            new,
        }
    }
}
