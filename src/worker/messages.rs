//! Store worker message types.
//!
//! This module defines the request and response protocol between the engine
//! and the store worker that performs persistence. Requests carry the trace
//! context of the gesture that caused them so the store side of a save shows
//! up under the same trace.

use crate::domain::{Generation, ItemId};
use crate::storage::OrderRecord;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when a message crosses into the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortable::worker::TraceContext;
    ///
    /// // Without a subscriber there is no span to capture.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(%trace_id, %parent_span_id, "capturing trace context");

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates constructors for `WorkerMessage` variants that attach the
/// current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_order(LoadOrder {}),
    save_order(SaveOrder { ids: Vec<ItemId>, generation: Generation }),
}

/// Requests sent to the store worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the last persisted order.
    LoadOrder {
        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist `ids` as the order for `generation`.
    SaveOrder {
        /// Item ids in display order.
        ids: Vec<ItemId>,

        /// Generation of the commit that produced this order.
        generation: Generation,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached to the message, if any.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadOrder { trace_context } | Self::SaveOrder { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses sent from the store worker back to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The persisted order was read; `None` if nothing was saved yet.
    OrderLoaded {
        record: Option<OrderRecord>,
    },

    /// The order for `generation` is held by the store.
    ///
    /// Also sent when the store already held a newer generation: the save is
    /// then obsolete rather than failed.
    OrderSaved {
        generation: Generation,
    },

    /// The save for `generation` failed; nothing was stored.
    SaveFailed {
        generation: Generation,

        /// Human-readable reason.
        message: String,
    },

    /// A request failed outside any save (load errors, setup failures).
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_round_trips_without_trace_context() {
        let message = WorkerMessage::save_order(vec![ItemId::from("b"), ItemId::from("a")], Generation::new(3));
        assert!(message.trace_context().is_none());

        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("trace_context"));
        let parsed: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, message);
    }
}
