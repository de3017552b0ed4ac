//! Prometheus metrics.
//!
//! HTTP traffic is measured by [`metrics_middleware`]; marketplace events
//! (registrations, logins, transitions, payments) by the `track_*` helpers.
//! When no recorder is installed every macro call is a no-op, so handlers
//! call the helpers unconditionally.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::warn;

const REQUEST_DURATION: &str = "edumarket_http_request_duration_seconds";
const REQUEST_DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static ENABLED: OnceLock<bool> = OnceLock::new();

/// `OBSERVABILITY_ENABLED`, read once. Anything but `false`/`0` enables.
pub fn is_observability_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Returns `None` when observability is disabled or a recorder is already
/// installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            REQUEST_DURATION_BUCKETS,
        )
        .and_then(|builder| builder.install_recorder())
        .map_err(|e| warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    Some(handle)
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Counts requests and records latency per method and matched route.
/// Requests that match no route share the `unmatched` label.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("edumarket_http_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("edumarket_http_requests_in_flight").decrement(1.0);

    let status = response.status().as_u16();
    counter!(
        "edumarket_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "class" => status_class(status)
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Router served on the metrics port.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_user_registered(role: &str) {
    counter!("edumarket_registrations_total", "role" => role.to_string()).increment(1);
}

pub fn track_user_login_success(role: &str) {
    counter!("edumarket_logins_total", "outcome" => "success", "role" => role.to_string())
        .increment(1);
}

/// `reason` is one of `unknown_email`, `wrong_password`, `inactive`.
pub fn track_user_login_failure(reason: &'static str) {
    counter!("edumarket_logins_total", "outcome" => "failure", "reason" => reason).increment(1);
}

pub fn track_jwt_issued() {
    counter!("edumarket_tokens_issued_total").increment(1);
}

pub fn track_mission_created() {
    counter!("edumarket_missions_created_total").increment(1);
}

pub fn track_transition(entity: &'static str, to_status: &'static str) {
    counter!("edumarket_status_transitions_total", "entity" => entity, "to" => to_status)
        .increment(1);
}

pub fn track_payment_processed(amount: f64) {
    counter!("edumarket_payments_processed_total").increment(1);
    histogram!("edumarket_payment_amount").record(amount);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(304), "3xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(501), "5xx");
        assert_eq!(status_class(42), "other");
    }

    #[test]
    fn test_helpers_without_recorder_do_not_panic() {
        track_transition("option", "expired");
        track_payment_processed(12.5);
        track_user_login_failure("wrong_password");
    }
}
