//! Store worker implementation.
//!
//! The worker owns the storage backend and answers [`WorkerMessage`]s with
//! [`WorkerResponse`]s. It never sees the collection or the gesture state; a
//! host may run it on its own thread and ship messages to it as JSON.

use crate::domain::error::Result;
use crate::domain::{Generation, ItemId};
use crate::storage::{JsonStorage, MemoryStorage, SaveReceipt, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::Config;

/// Executes store requests against a storage backend.
pub struct StoreWorker {
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for StoreWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreWorker").finish_non_exhaustive()
    }
}

impl StoreWorker {
    /// Creates a worker over an existing backend.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Creates a worker backed by the JSON store file named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = JsonStorage::new(config.store_path())?;
        tracing::debug!(path = ?storage.path(), "store worker using JSON storage");
        Ok(Self::new(Box::new(storage)))
    }

    /// Creates a worker over a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Helper for handling storage operation results with consistent logging.
    fn handle_db_result<T, F, E>(operation: &str, result: Result<T>, on_success: F, on_error: E) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
        E: FnOnce(String) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "storage operation failed");
                on_error(format!("{operation}: {e}"))
            }
        }
    }

    fn handle_load_order(&mut self) -> WorkerResponse {
        Self::handle_db_result(
            "load order",
            self.storage.load_order(),
            |record| {
                tracing::debug!(
                    generation = ?record.as_ref().map(|record| record.generation),
                    "order loaded from storage"
                );
                WorkerResponse::OrderLoaded { record }
            },
            |message| WorkerResponse::Error { message },
        )
    }

    fn handle_save_order(&mut self, ids: &[ItemId], generation: Generation) -> WorkerResponse {
        Self::handle_db_result(
            "save order",
            self.storage.save_order(ids, generation),
            |receipt| match receipt {
                SaveReceipt::Stale { held } => {
                    tracing::debug!(%generation, %held, "store already holds a newer order, save refused");
                    WorkerResponse::SaveFailed {
                        generation,
                        message: format!("store already holds a newer order (generation {held})"),
                    }
                }
                SaveReceipt::Stored | SaveReceipt::AlreadyCurrent => WorkerResponse::OrderSaved { generation },
            },
            |message| WorkerResponse::SaveFailed { generation, message },
        )
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the
    /// operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the appropriate response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadOrder { .. } => self.handle_load_order(),
            WorkerMessage::SaveOrder { ids, generation, .. } => self.handle_save_order(&ids, generation),
        }
    }

    /// JSON entry point for hosts that run the worker out of process.
    ///
    /// Undecodable payloads are answered with [`WorkerResponse::Error`].
    pub fn handle_payload(&mut self, payload: &str) -> String {
        let response = match serde_json::from_str::<WorkerMessage>(payload) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    message: format!("invalid worker message: {e}"),
                }
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "failed to serialize worker response");
            String::from(r#"{"Error":{"message":"failed to serialize worker response"}}"#)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_save_reports_its_generation() {
        let mut storage = MemoryStorage::new();
        storage.fail_next("disk full");
        let mut worker = StoreWorker::new(Box::new(storage));

        let response = worker.handle_message(WorkerMessage::save_order(vec![ItemId::from("a")], Generation::new(4)));
        match response {
            WorkerResponse::SaveFailed { generation, message } => {
                assert_eq!(generation, Generation::new(4));
                assert!(message.contains("disk full"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn save_older_than_stored_order_is_refused() {
        let storage = MemoryStorage::with_order(vec![ItemId::from("a")], Generation::new(9));
        let mut worker = StoreWorker::new(Box::new(storage));

        let response = worker.handle_message(WorkerMessage::save_order(vec![ItemId::from("a")], Generation::new(2)));
        match response {
            WorkerResponse::SaveFailed { generation, message } => {
                assert_eq!(generation, Generation::new(2));
                assert!(message.contains("generation 9"));
            }
            other => panic!("unexpected response: {other:?}"),
        }

        let retry = worker.handle_message(WorkerMessage::save_order(vec![ItemId::from("a")], Generation::new(9)));
        assert_eq!(retry, WorkerResponse::OrderSaved { generation: Generation::new(9) });

        let loaded = worker.handle_message(WorkerMessage::load_order());
        match loaded {
            WorkerResponse::OrderLoaded { record: Some(record) } => assert_eq!(record.generation, Generation::new(9)),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn garbage_payload_yields_error_response() {
        let mut worker = StoreWorker::in_memory();
        let reply = worker.handle_payload("not json");
        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }
}
