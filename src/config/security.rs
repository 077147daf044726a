//! Response-hardening middleware. The engine serves JSON to a browser
//! frontend through a gateway, so every response carries the standard
//! anti-sniffing and framing headers; HSTS is added only when the
//! deployment says it terminates TLS.

use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Request, Response};
use std::env;
use std::task::{Context, Poll};
use tower::{Layer, Service};

const HSTS: (&str, &str) = (
    "strict-transport-security",
    "max-age=31536000; includeSubDomains",
);

fn baseline_headers() -> Vec<(HeaderName, HeaderValue)> {
    [
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "DENY"),
        ("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
        ("referrer-policy", "strict-origin-when-cross-origin"),
    ]
    .into_iter()
    .map(|(name, value)| {
        (
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        )
    })
    .collect()
}

#[derive(Clone)]
pub struct SecurityHeadersLayer {
    with_hsts: bool,
}

impl SecurityHeadersLayer {
    pub fn new(with_hsts: bool) -> Self {
        Self { with_hsts }
    }

    /// HSTS is opt-in via `APP_ENV=production`; sending it over plain
    /// HTTP in development would pin browsers to a scheme the local
    /// server does not speak.
    pub fn from_env() -> Self {
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        Self::new(production)
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersService {
            inner,
            with_hsts: self.with_hsts,
        }
    }
}

#[derive(Clone)]
pub struct SecurityHeadersService<S> {
    inner: S,
    with_hsts: bool,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for SecurityHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = SecurityHeadersFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        SecurityHeadersFuture {
            future: self.inner.call(request),
            with_hsts: self.with_hsts,
        }
    }
}

#[pin_project::pin_project]
pub struct SecurityHeadersFuture<F> {
    #[pin]
    future: F,
    with_hsts: bool,
}

impl<F, ResBody, E> std::future::Future for SecurityHeadersFuture<F>
where
    F: std::future::Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.future.poll(cx) {
            Poll::Ready(Ok(mut response)) => {
                let headers = response.headers_mut();
                for (name, value) in baseline_headers() {
                    headers.insert(name, value);
                }
                if *this.with_hsts {
                    headers.insert(
                        HeaderName::from_static(HSTS.0),
                        HeaderValue::from_static(HSTS.1),
                    );
                }
                Poll::Ready(Ok(response))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}

pub fn create_security_headers_layer() -> SecurityHeadersLayer {
    SecurityHeadersLayer::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_headers_are_static() {
        let headers = baseline_headers();
        assert_eq!(headers.len(), 4);
        assert!(headers
            .iter()
            .any(|(name, _)| name == "x-content-type-options"));
    }

    #[test]
    fn test_hsts_opt_in() {
        assert!(SecurityHeadersLayer::new(true).with_hsts);
        assert!(!SecurityHeadersLayer::new(false).with_hsts);
    }
}
