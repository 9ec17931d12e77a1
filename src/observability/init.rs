//! Tracing initialization and subscriber setup.

use super::tracer::{self, TraceFile};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: an `EnvFilter` in front of an
/// OpenTelemetry layer that writes finished spans to the trace file.
///
/// The filter comes from `RUST_LOG` when it is set, otherwise from
/// `config.trace_level`.
///
/// Returns `false` if tracing could not be set up (data directory not
/// creatable, or a global subscriber already installed). The engine works the
/// same either way.
///
/// # Example
///
/// ```rust
/// use sortable::observability::init_tracing;
/// use sortable::Config;
///
/// let dir = std::env::temp_dir().join("sortable-doc-trace");
/// let config = Config {
///     data_dir: Some(dir),
///     trace_level: "debug".to_string(),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let data_dir = crate::infrastructure::paths::data_dir(config);
    if std::fs::create_dir_all(&data_dir).is_err() {
        return false;
    }

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", "sortable"),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let provider = tracer::create_tracer_provider(
        TraceFile {
            path: config.trace_path(),
            max_bytes: config.trace_max_bytes,
            backups: config.trace_backups,
        },
        resource,
    );

    let tracer = provider.tracer("sortable");
    let otel_layer = OpenTelemetryLayer::new(tracer);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.trace_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
