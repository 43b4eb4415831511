//! Request middleware / 请求中间件
//!
//! - `cors_headers` + `preflight`: permissive CORS on every response, bare 200 for OPTIONS
//! - `access_log`: one log line per request, including response size
//! - `panic_response`: JSON 500 for handler panics

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{header, HeaderValue, Method, StatusCode, Version},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http_body::{Frame, SizeHint};
use std::any::Any;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;

use super::response::error_response;

pub const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Layers that stamp the CORS headers onto every response, whatever produced it
pub fn cors_headers() -> [SetResponseHeaderLayer<HeaderValue>; 3] {
    [
        SetResponseHeaderLayer::overriding(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        SetResponseHeaderLayer::overriding(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
        SetResponseHeaderLayer::overriding(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
    ]
}

/// Answer OPTIONS before routing
pub async fn preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

/// Access log / 访问日志
///
/// Status is known once the handler returns; the byte count only once the body
/// has been sent, so the line is written when the wrapped body is dropped.
pub async fn access_log(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let version = req.version();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let response = next.run(req).await;

    let (parts, body) = response.into_parts();
    let record = AccessRecord {
        method,
        uri,
        version,
        remote,
        status: parts.status,
        started,
    };
    Response::from_parts(parts, Body::new(CountingBody::new(body, record)))
}

/// Convert a caught panic into the JSON error envelope
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

struct AccessRecord {
    method: Method,
    uri: String,
    version: Version,
    remote: Option<SocketAddr>,
    status: StatusCode,
    started: Instant,
}

/// Response body decorator that counts bytes and forwards frames untouched
struct CountingBody<B> {
    inner: B,
    bytes: u64,
    record: Option<AccessRecord>,
}

impl<B> CountingBody<B> {
    fn new(inner: B, record: AccessRecord) -> Self {
        Self { inner, bytes: 0, record: Some(record) }
    }
}

impl<B> http_body::Body for CountingBody<B>
where
    B: http_body::Body<Data = Bytes> + Unpin,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        if let Poll::Ready(Some(Ok(frame))) = &polled {
            if let Some(data) = frame.data_ref() {
                this.bytes += data.len() as u64;
            }
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for CountingBody<B> {
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            let remote = record
                .remote
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "-".to_string());
            tracing::info!(
                "{} {} {:?} from {} -> {} ({} bytes) in {:?}",
                record.method,
                record.uri,
                record.version,
                remote,
                record.status.as_u16(),
                self.bytes,
                record.started.elapsed()
            );
        }
    }
}
