//! Log output for the `quill` binary
//!
//! `RUST_LOG` overrides the default filter (`info`, or `debug` with
//! `--debug`), e.g. `RUST_LOG=quill_core=debug,sqlx=warn`. With `--otel`
//! and the `telemetry` feature, spans also go to
//! `OTEL_EXPORTER_OTLP_ENDPOINT` (default `http://localhost:4317`) under
//! `OTEL_SERVICE_NAME` (default `quill`).

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Debug logging unless RUST_LOG says otherwise
    pub debug: bool,
    /// Export spans over OTLP
    pub otel: bool,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let default = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    }
}

/// Console output only
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// OTLP destination, read from the standard `OTEL_*` variables.
#[cfg(feature = "telemetry")]
struct OtlpTarget {
    endpoint: String,
    service_name: String,
}

#[cfg(feature = "telemetry")]
impl OtlpTarget {
    fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_owned());
        Self {
            endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            service_name: var("OTEL_SERVICE_NAME", "quill"),
        }
    }

    fn provider(&self) -> Result<opentelemetry_sdk::trace::TracerProvider> {
        use opentelemetry::KeyValue;
        use opentelemetry_otlp::WithExportConfig;

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&self.endpoint)
            .build()
            .map_err(|e| anyhow!("Failed to create OTLP exporter for {}: {}", self.endpoint, e))?;

        Ok(opentelemetry_sdk::trace::TracerProvider::builder()
            .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
            .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
                "service.name",
                self.service_name.clone(),
            )]))
            .build())
    }
}

/// Console output plus span export over OTLP
#[cfg(feature = "telemetry")]
pub fn init_tracing_with_otel(config: &TracingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let target = OtlpTarget::from_env();
    let provider = target.provider()?;
    let otel_layer = tracing_opentelemetry::layer().with_tracer(provider.tracer("quill"));
    // Held globally until shutdown_otel
    let _ = opentelemetry::global::set_tracer_provider(provider);

    tracing_subscriber::registry()
        .with(config.filter())
        .with(tracing_subscriber::fmt::layer().with_target(config.debug).compact())
        .with(otel_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(
        endpoint = %target.endpoint,
        service = %target.service_name,
        "exporting spans over OTLP"
    );
    Ok(())
}

/// Flush pending spans
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Initialize tracing, with OTLP export when requested and compiled in.
pub fn init(config: &TracingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if config.otel {
        return init_tracing_with_otel(config);
    }

    init_tracing(config)?;

    #[cfg(not(feature = "telemetry"))]
    if config.otel {
        tracing::warn!("--otel ignored: built without the `telemetry` feature");
    }

    Ok(())
}
