use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{HeaderValue, Request, Response};
use tower::{Layer, Service};
use tracing::{info, warn};

use crate::metrics::generate_request_id;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A Tower layer that logs HTTP requests and tags both request and response
/// with an `x-request-id` header.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpLoggingLayer;

impl<S> Layer<S> for HttpLoggingLayer {
    type Service = HttpLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpLoggingService { inner }
    }
}

#[derive(Clone, Debug)]
pub struct HttpLoggingService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HttpLoggingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map_or_else(generate_request_id, ToString::to_string);

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            req.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        info!(
            http.method = %method,
            http.path = %path,
            request_id = %request_id,
            "HTTP request started"
        );

        // Take the service that was polled ready, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            let result = inner.call(req).await;
            let duration_ms = start.elapsed().as_millis();

            match result {
                Ok(mut response) => {
                    let status = response.status();
                    if let Ok(value) = HeaderValue::from_str(&request_id) {
                        response.headers_mut().insert(REQUEST_ID_HEADER, value);
                    }
                    if status.is_server_error() {
                        warn!(
                            http.method = %method,
                            http.path = %path,
                            http.status = status.as_u16(),
                            request_id = %request_id,
                            duration_ms = %duration_ms,
                            "HTTP request failed"
                        );
                    } else {
                        info!(
                            http.method = %method,
                            http.path = %path,
                            http.status = status.as_u16(),
                            request_id = %request_id,
                            duration_ms = %duration_ms,
                            "HTTP request completed"
                        );
                    }
                    Ok(response)
                }
                Err(e) => {
                    warn!(
                        http.method = %method,
                        http.path = %path,
                        request_id = %request_id,
                        duration_ms = %duration_ms,
                        "HTTP request errored"
                    );
                    Err(e)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    async fn echo_request_id(req: Request<()>) -> Result<Response<String>, Infallible> {
        let seen = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(Response::new(seen))
    }

    #[tokio::test]
    async fn test_generates_request_id_for_both_sides() {
        let svc = HttpLoggingLayer.layer(service_fn(echo_request_id));
        let response = svc.oneshot(Request::new(())).await.unwrap();

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert_eq!(header.len(), 8);
        assert_eq!(response.body(), &header);
    }

    #[tokio::test]
    async fn test_keeps_incoming_request_id() {
        let svc = HttpLoggingLayer.layer(service_fn(echo_request_id));
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc123")
            .body(())
            .unwrap();
        let response = svc.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc123");
        assert_eq!(response.body(), "abc123");
    }
}
