use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt};

use opentelemetry_sdk::Resource;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{MakeWriter};
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracerProvider};
use opentelemetry::{
    global,
    trace::{TracerProvider},
    KeyValue,
};
use opentelemetry_sdk::trace::Tracer as SdkTracer;
use opentelemetry_otlp::{WithExportConfig};
use crate::configuration::TelemetrySettings;

/// Compose the tracing subscriber: env filter, bunyan JSON output and,
/// when an OTLP endpoint is configured, span export.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
    settings: &TelemetrySettings,
) -> Result<impl Subscriber + Send + Sync, anyhow::Error>
    where
        Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatter_layer = BunyanFormattingLayer::new(name.clone(), sink);

    let telemetry_layer = match &settings.otlp_endpoint {
        Some(endpoint) => {
            let tracer = construct_open_telemetry_tracer(&name, endpoint)?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    Ok(tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatter_layer)
        .with(telemetry_layer))
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync + 'static) -> Result<(), anyhow::Error> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

pub fn construct_open_telemetry_tracer(service_name: &str, endpoint: &str) -> Result<SdkTracer, anyhow::Error> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(Duration::from_secs(3))
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_max_events_per_span(64)
        .with_max_attributes_per_span(16)
        .with_resource(Resource::builder_empty().with_attributes([KeyValue::new("service.name", service_name.to_string())]).build())
        .build();

    global::set_tracer_provider(tracer_provider.clone());
    Ok(tracer_provider.tracer("signup_relay"))
}
