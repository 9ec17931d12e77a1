//! Compact JSON rendering of finished spans.
//!
//! Each span becomes one flat JSON object:
//!
//! ```json
//! {"service":"sortable","trace_id":"…","span_id":"…","parent_span_id":"…",
//!  "name":"apply_gesture","start_unix_nanos":1760500000000000000,
//!  "duration_micros":42,"attributes":{"generation":3},"events":[…]}
//! ```

use opentelemetry::trace::{SpanId, Status};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::time::{Duration, SystemTime};

#[derive(Serialize)]
struct SpanLine<'a> {
    service: &'a str,
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_span_id: Option<String>,
    name: &'a str,
    start_unix_nanos: u128,
    duration_micros: u128,
    attributes: Map<String, JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<EventLine<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct EventLine<'a> {
    name: &'a str,
    offset_micros: u128,
    attributes: Map<String, JsonValue>,
}

/// Renders spans as single-line JSON documents.
pub struct SpanFormatter {
    service: String,
}

impl SpanFormatter {
    /// Takes the service name from the resource's `service.name`.
    pub fn new(resource: &Resource) -> Self {
        let service = resource
            .get(opentelemetry::Key::from_static_str("service.name"))
            .map_or_else(|| String::from("sortable"), |value| value.to_string());
        Self { service }
    }

    /// Formats one span.
    ///
    /// # Errors
    ///
    /// Returns an error if the span cannot be serialized.
    pub fn format_span(&self, span: &SpanData) -> serde_json::Result<String> {
        let start = unix_nanos(span.start_time);
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or(Duration::ZERO)
            .as_micros();

        let events = span
            .events
            .iter()
            .map(|event| EventLine {
                name: &event.name,
                offset_micros: event
                    .timestamp
                    .duration_since(span.start_time)
                    .unwrap_or(Duration::ZERO)
                    .as_micros(),
                attributes: attributes(&event.attributes),
            })
            .collect();

        let line = SpanLine {
            service: &self.service,
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: (span.parent_span_id != SpanId::INVALID)
                .then(|| format!("{:016x}", span.parent_span_id)),
            name: &span.name,
            start_unix_nanos: start,
            duration_micros: duration,
            attributes: attributes(&span.attributes),
            events,
            error: match &span.status {
                Status::Error { description } => Some(description.to_string()),
                Status::Ok | Status::Unset => None,
            },
        };

        serde_json::to_string(&line)
    }
}

fn unix_nanos(time: SystemTime) -> u128 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
}

fn attributes(pairs: &[opentelemetry::KeyValue]) -> Map<String, JsonValue> {
    pairs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

fn attribute_value(value: &opentelemetry::Value) -> JsonValue {
    use opentelemetry::Value;

    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => JsonValue::from(*f),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Array(_) => JsonValue::String(value.to_string()),
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter").field("service", &self.service).finish()
    }
}
