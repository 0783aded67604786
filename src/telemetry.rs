//! Tracing subscriber setup with optional OTLP export

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::VERSION;
use crate::config::{LoggingConfig, TelemetryConfig};

/// Flushes and shuts down the exporters when dropped
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shut down tracer provider: {e}");
        }
        if let Some(provider) = self.logger_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shut down logger provider: {e}");
        }
    }
}

/// `RUST_LOG` wins over the configured level; `verbose` forces debug.
fn env_filter(logging: &LoggingConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

fn resource(telemetry: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_service_name(telemetry.service_name.clone())
        .with_attribute(KeyValue::new(SERVICE_VERSION, VERSION))
        .build()
}

fn providers(
    telemetry: &TelemetryConfig,
    endpoint: &str,
) -> Result<(SdkTracerProvider, SdkLoggerProvider)> {
    let resource = resource(telemetry);

    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(format!("{endpoint}/v1/traces"))
        .with_headers(telemetry.headers.clone())
        .build()
        .context("Failed to build OTLP span exporter")?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = LogExporter::builder()
        .with_http()
        .with_endpoint(format!("{endpoint}/v1/logs"))
        .with_headers(telemetry.headers.clone())
        .build()
        .context("Failed to build OTLP log exporter")?;
    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok((tracer_provider, logger_provider))
}

/// Install the global subscriber. Keep the returned guard alive until exit.
pub fn init(
    logging: &LoggingConfig,
    telemetry: &TelemetryConfig,
    verbose: bool,
) -> Result<TelemetryGuard> {
    let fmt_layer = if logging.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let mut guard = TelemetryGuard::default();
    let (otel_layer, log_layer) = match (telemetry.enabled, telemetry.otlp_endpoint.as_deref()) {
        (true, Some(endpoint)) => {
            let (tracer_provider, logger_provider) = providers(telemetry, endpoint)?;
            let tracer = tracer_provider.tracer(telemetry.service_name.clone());
            let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
            // The exporters log through tracing too; keep them out of the bridge.
            let log_layer = OpenTelemetryTracingBridge::new(&logger_provider).with_filter(
                filter_fn(|meta| {
                    let target = meta.target();
                    !(target.starts_with("opentelemetry")
                        || target.starts_with("hyper")
                        || target.starts_with("reqwest"))
                }),
            );
            guard.tracer_provider = Some(tracer_provider);
            guard.logger_provider = Some(logger_provider);
            (Some(otel_layer), Some(log_layer))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(log_layer)
        .with(env_filter(logging, verbose))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = telemetry.otlp_endpoint.as_deref().filter(|_| telemetry.enabled) {
        tracing::info!(%endpoint, "OpenTelemetry export enabled");
    }
    Ok(guard)
}
