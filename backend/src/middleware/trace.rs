//! Per-request correlation.
//!
//! [`Trace`] opens a [`TraceId`] scope around the downstream service, echoes
//! the id in the `trace-id` response header and writes one access log line.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Request correlation middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use account_service::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { inner: service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    inner: S,
}

/// What the access log needs once the response is ready.
struct RequestLine {
    trace_id: TraceId,
    method: Method,
    path: String,
    started: Instant,
}

impl RequestLine {
    fn finish<B>(self, res: &mut ServiceResponse<B>) {
        let Self {
            trace_id,
            method,
            path,
            started,
        } = self;
        if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        } else {
            warn!(%trace_id, "trace id is not a valid header value");
        }
        info!(
            %trace_id,
            %method,
            %path,
            status = res.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "request completed"
        );
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = RequestLine {
            trace_id: TraceId::generate(),
            method: req.method().clone(),
            path: req.path().to_owned(),
            started: Instant::now(),
        };
        let trace_id = line.trace_id;
        let pending = self.inner.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = pending.await?;
            line.finish(&mut res);
            Ok(res)
        }))
    }
}
