//! Outbound W3C Trace Context propagation for requests to the Session
//! Webhook Server.
//!
//! When no global propagator is registered (telemetry disabled) nothing is
//! added to the request.

use opentelemetry::propagation::Injector;
use opentelemetry::{Context, global};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes())
            && let Ok(val) = HeaderValue::from_str(&value)
        {
            self.0.insert(name, val);
        }
    }
}

/// Headers carrying the current span's trace context.
pub fn trace_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cx = Context::current();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderInjector(&mut headers));
    });
    headers
}

/// Add `traceparent` / `tracestate` to an outgoing request.
pub fn inject_trace_context(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    builder.headers(trace_headers())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_propagator_adds_nothing() {
        assert!(trace_headers().is_empty());
    }

    #[test]
    fn injector_skips_invalid_header_values() {
        let mut headers = HeaderMap::new();
        let mut injector = HeaderInjector(&mut headers);
        injector.set("traceparent", "00-abc-def-01".into());
        injector.set("tracestate", "bad\nvalue".into());
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("traceparent"));
    }
}
