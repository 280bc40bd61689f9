//! Uniform response envelope.
//!
//! Every business endpoint answers `{ status, <key>, message? }`. The mapping
//! from an [`Outcome`] onto that shape lives here and nowhere else:
//!
//! | outcome    | `status` | payload      | message            |
//! |------------|----------|--------------|--------------------|
//! | `Done`     | `true`   | the value    | `done` id, if any  |
//! | `NotFound` | `true`   | `null`       | `not_found` id     |
//! | `Empty`    | `true`   | `null`       | `empty` id         |
//! | `Fault`    | `false`  | `{}`         | the fault text     |

use bookwell_core::application::{LifecycleResult, Outcome};
use bookwell_core::i18n::MessageCatalog;
use serde::Serialize;
use serde_json::{Map, Value};

/// Payload key and message ids for one endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shape {
    pub key: Option<&'static str>,
    pub done: Option<&'static str>,
    pub not_found: Option<&'static str>,
    pub empty: Option<&'static str>,
}

impl Shape {
    pub const fn keyed(key: &'static str) -> Self {
        Self {
            key: Some(key),
            done: None,
            not_found: None,
            empty: None,
        }
    }

    pub const fn bare() -> Self {
        Self {
            key: None,
            done: None,
            not_found: None,
            empty: None,
        }
    }

    pub const fn on_done(mut self, id: &'static str) -> Self {
        self.done = Some(id);
        self
    }

    pub const fn on_not_found(mut self, id: &'static str) -> Self {
        self.not_found = Some(id);
        self
    }

    pub const fn on_empty(mut self, id: &'static str) -> Self {
        self.empty = Some(id);
        self
    }
}

pub fn render<T: Serialize>(outcome: Outcome<T>, shape: &Shape, catalog: &MessageCatalog) -> Value {
    let translate = |id: Option<&'static str>| id.map(|id| catalog.text(id).into_owned());

    match outcome {
        Outcome::Done(value) => match serde_json::to_value(value) {
            Ok(payload) => build(shape.key, true, payload, translate(shape.done)),
            Err(err) => fault(shape.key, err.to_string()),
        },
        Outcome::NotFound => build(shape.key, true, Value::Null, translate(shape.not_found)),
        Outcome::Empty => build(shape.key, true, Value::Null, translate(shape.empty)),
        Outcome::Fault(message) => fault(shape.key, message),
    }
}

/// Lifecycle writes: `Saved` renders as done, `Failed` as an empty payload
/// with the failure message. Both keep `status: true`.
pub fn render_lifecycle(
    outcome: Outcome<LifecycleResult>,
    shape: &Shape,
    catalog: &MessageCatalog,
) -> Value {
    let outcome = match outcome {
        Outcome::Done(LifecycleResult::Saved(job)) => Outcome::Done(job),
        Outcome::Done(LifecycleResult::Failed { .. }) => Outcome::Empty,
        Outcome::NotFound => Outcome::NotFound,
        Outcome::Empty => Outcome::Empty,
        Outcome::Fault(message) => Outcome::Fault(message),
    };
    render(outcome, shape, catalog)
}

fn fault(key: Option<&'static str>, message: String) -> Value {
    build(key, false, Value::Object(Map::new()), Some(message))
}

fn build(key: Option<&'static str>, status: bool, payload: Value, message: Option<String>) -> Value {
    let mut body = Map::new();
    body.insert("status".into(), Value::Bool(status));
    if let Some(key) = key {
        body.insert(key.into(), payload);
    }
    if let Some(message) = message {
        body.insert("message".into(), Value::String(message));
    }
    Value::Object(body)
}
