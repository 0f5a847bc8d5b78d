//! Tracing subscriber initialization with optional OpenTelemetry export.
//!
//! Log lines go to stderr so the `dispatch` command can print results on
//! stdout. When `[telemetry] enabled = true`, spans are additionally exported
//! over OTLP and outbound requests carry W3C trace context.

use std::time::Duration;

use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{BatchSpanProcessor, Sampler, SdkTracerProvider};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::TelemetryConfig;

/// Handle returned by [`init`]. Call [`TelemetryGuard::shutdown`] to flush
/// pending spans before exit.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn shutdown(mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            tracing::warn!(error = %e, "OpenTelemetry tracer provider shutdown failed");
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` controls the filter (default `info`). A broken OTLP exporter
/// configuration falls back to plain logging instead of failing startup.
pub fn init(config: &TelemetryConfig) -> TelemetryGuard {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !config.enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
        return TelemetryGuard { provider: None };
    }

    // Needed for both inbound extraction and outbound injection.
    global::set_text_map_propagator(opentelemetry_sdk::propagation::TraceContextPropagator::new());

    let exporter = match build_exporter(config) {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
            tracing::error!(
                error = %e,
                endpoint = %config.endpoint,
                protocol = %config.protocol,
                "failed to build OTLP exporter, falling back to fmt-only tracing"
            );
            return TelemetryGuard { provider: None };
        }
    };

    let mut resource_kvs = vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("process.pid", std::process::id().to_string()),
    ];
    for (k, v) in &config.resource_attributes {
        resource_kvs.push(KeyValue::new(k.clone(), v.clone()));
    }
    let resource = Resource::builder().with_attributes(resource_kvs).build();

    let provider = SdkTracerProvider::builder()
        .with_span_processor(BatchSpanProcessor::builder(exporter).build())
        .with_sampler(sampler_for(config.sample_ratio))
        .with_resource(resource)
        .build();
    global::set_tracer_provider(provider.clone());

    let tracer = provider.tracer("session-bridge");
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    info!(
        endpoint = %config.endpoint,
        protocol = %config.protocol,
        sample_ratio = config.sample_ratio,
        "OpenTelemetry tracing enabled"
    );

    TelemetryGuard {
        provider: Some(provider),
    }
}

fn sampler_for(ratio: f64) -> Sampler {
    if (ratio - 1.0).abs() < f64::EPSILON {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

fn build_exporter(
    config: &TelemetryConfig,
) -> Result<opentelemetry_otlp::SpanExporter, opentelemetry::trace::TraceError> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    if config.protocol == "http" {
        return opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(&config.endpoint)
            .with_timeout(timeout)
            .build();
    }

    if config.protocol != "grpc" {
        tracing::warn!(protocol = %config.protocol, "unknown telemetry protocol, defaulting to gRPC");
    }
    opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_timeout(timeout)
        .build()
}
