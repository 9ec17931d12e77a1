//! OpenTelemetry-based tracing with file export.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → trace file
//! ```
//!
//! Spans are written to `<data_dir>/sortable-trace.json`, one JSON object per
//! line, and the file is rotated by size.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with the file exporter
//! - [`span_formatter`]: Span to JSON line conversion
//! - [`file_writer`]: Size-rotated file writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
