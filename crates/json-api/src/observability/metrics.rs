//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_created_total: IntCounter,
    change_resolutions_total: IntCounterVec,
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a committed checkout.
pub(crate) fn record_order_created() {
    if let Some(metrics) = metrics() {
        metrics.orders_created_total.inc();
    }
}

/// Count an admin decision on a change request.
pub(crate) fn record_change_resolution(decision: &str, order_canceled: bool) {
    if let Some(metrics) = metrics() {
        metrics
            .change_resolutions_total
            .with_label_values(&[decision, if order_canceled { "true" } else { "false" }])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("failed to build metrics registry: {source}"))
                .ok()
        })
        .as_ref()
}

fn register<C>(registry: &Registry, collector: C) -> prometheus::Result<C>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> prometheus::Result<StorefrontMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "storefront_http_requests_total",
                "HTTP requests by method, route and status code.",
            ),
            &["method", "route", "status_code"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "storefront_http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "storefront_http_requests_in_flight",
            "HTTP requests currently being served.",
        ))?,
    )?;

    let orders_created_total = register(
        &registry,
        IntCounter::with_opts(Opts::new(
            "storefront_orders_created_total",
            "Orders committed by checkout.",
        ))?,
    )?;

    let change_resolutions_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "storefront_change_resolutions_total",
                "Change request decisions by outcome and whether the order was cancelled.",
            ),
            &["decision", "order_canceled"],
        )?,
    )?;

    Ok(StorefrontMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_created_total,
        change_resolutions_total,
    })
}
