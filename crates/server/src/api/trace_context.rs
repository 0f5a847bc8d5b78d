//! Links inbound webhook requests to the caller's trace.
//!
//! A valid `traceparent` header on the incoming request becomes the parent
//! of the request span. Without a registered propagator this is a no-op.

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::propagation::Extractor;
use opentelemetry::{global, trace::TraceContextExt};
use tracing_opentelemetry::OpenTelemetrySpanExt;

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(axum::http::HeaderName::as_str).collect()
    }
}

pub async fn propagate_trace_context(request: Request, next: Next) -> Response {
    let parent_cx = global::get_text_map_propagator(|p| p.extract(&HeaderExtractor(request.headers())));

    if parent_cx.span().span_context().is_remote() {
        tracing::Span::current().set_parent(parent_cx);
    }

    next.run(request).await
}
