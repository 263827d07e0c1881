//! Network executor backed by the hyper-util legacy client.
//!
//! # Design Decisions
//! - `http` and `https` share one client
//! - TLS is rustls with webpki roots unless a client config is supplied
//! - Connect timeout lives on the inner `HttpConnector`, beneath the TLS handshake
//! - Response bodies are erased to `axum::body::Body` so synthetic redirects share the type

use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client, Error as ClientError},
    rt::TokioExecutor,
};
use tower::Service;

use crate::config::UpstreamConfig;

/// Opaque request executor performing real HTTP I/O.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl UpstreamClient {
    /// Client trusting the bundled webpki root certificates.
    pub fn new(config: &UpstreamConfig) -> Self {
        let https = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(http_connector(config));
        Self::build(config, https)
    }

    /// Client using a caller-supplied rustls configuration (private roots, client certs).
    pub fn with_tls_config(config: &UpstreamConfig, tls: rustls::ClientConfig) -> Self {
        let https = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(http_connector(config));
        Self::build(config, https)
    }

    fn build(config: &UpstreamConfig, https: HttpsConnector<HttpConnector>) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build(https);

        Self { client }
    }
}

fn http_connector(config: &UpstreamConfig) -> HttpConnector {
    let mut connector = HttpConnector::new();
    // the TLS wrapper hands `https` URIs down to this connector
    connector.enforce_http(false);
    connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
    connector
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new(&UpstreamConfig::default())
    }
}

impl Service<Request<Body>> for UpstreamClient {
    type Response = Response<Body>;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let future = self.client.request(req);
        Box::pin(async move {
            let response: Response<Incoming> = future.await?;
            let (parts, body) = response.into_parts();
            Ok(Response::from_parts(parts, Body::new(body)))
        })
    }
}
