//! Request logging and tracing-subscriber setup.
//!
//! Logs go to the console, to a daily-rolling error file and to a
//! daily-rolling JSON file. When `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans
//! are also exported over OTLP.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{self as sdktrace, RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Environment-driven logging switches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    dir: String,
    json: bool,
    otlp_endpoint: Option<String>,
}

impl LogSettings {
    fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            dir: var("LOG_DIR")
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()),
            json: var("LOG_JSON")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
                .unwrap_or(true),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()),
        }
    }
}

/// Logs one event per request inside a `request` span carrying a fresh
/// `request_id`. The level follows the status class.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let span = info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %req.method(),
        path = %route,
    );

    async move {
        let start = Instant::now();
        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;

        if response.status().is_server_error() {
            error!(status, latency_ms, "Server error");
        } else if response.status().is_client_error() {
            warn!(status, latency_ms, "Client error");
        } else {
            info!(status, latency_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}

fn init_tracer(endpoint: &str) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new([
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "deployment.environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            sdktrace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Installs the global subscriber. File layers are skipped when the log
/// directory cannot be created; the OTLP layer is skipped when its exporter
/// fails to start.
pub fn init_tracing() {
    let settings = LogSettings::from_env();

    let files_ok = std::fs::create_dir_all(&settings.dir)
        .map_err(|e| {
            eprintln!(
                "⚠️  Cannot create log directory {}: {}. File logging disabled.",
                settings.dir, e
            )
        })
        .is_ok();

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,tower_http=warn,sqlx=warn,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let error_file_layer = files_ok.then(|| {
        fmt::layer()
            .with_writer(RollingFileAppender::new(
                Rotation::DAILY,
                &settings.dir,
                "edumarket.log",
            ))
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new("error"))
    });

    let json_file_layer = (files_ok && settings.json).then(|| {
        fmt::layer()
            .json()
            .with_writer(RollingFileAppender::new(
                Rotation::DAILY,
                &settings.dir,
                "edumarket.json",
            ))
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(EnvFilter::new("info"))
    });

    let otel_layer = settings
        .otlp_endpoint
        .as_deref()
        .and_then(|endpoint| {
            init_tracer(endpoint)
                .map_err(|e| {
                    eprintln!("⚠️  OpenTelemetry disabled: {}", e);
                })
                .ok()
        })
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));
    let otel_enabled = otel_layer.is_some();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(error_file_layer)
        .with(json_file_layer)
        .with(otel_layer)
        .init();

    info!(
        log_dir = %settings.dir,
        json = settings.json,
        otel = otel_enabled,
        "Tracing initialized"
    );
}

pub async fn shutdown_tracer() {
    global::shutdown_tracer_provider();
    info!("Tracer provider shut down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogSettings::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.dir, DEFAULT_LOG_DIR);
        assert!(s.json);
        assert!(s.otlp_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("LOG_DIR", "/var/log/edumarket"),
            ("LOG_JSON", "FALSE"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ]);
        assert_eq!(s.dir, "/var/log/edumarket");
        assert!(!s.json);
        assert_eq!(s.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let s = settings(&[("LOG_DIR", " "), ("OTEL_EXPORTER_OTLP_ENDPOINT", "")]);
        assert_eq!(s.dir, DEFAULT_LOG_DIR);
        assert!(s.otlp_endpoint.is_none());
    }
}
