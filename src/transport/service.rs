//! HSTS enforcement middleware.
//!
//! # Responsibilities
//! - Short-circuit plain requests to covered hosts with a synthetic redirect
//! - Forward everything else to the wrapped executor untouched
//! - Learn policy from `Strict-Transport-Security` on secure responses
//!
//! # Design Decisions
//! - Wrap-and-delegate over any `tower::Service`; no concrete client assumed
//! - The store lock is never held across the executor call
//! - Plain-HTTP responses never update policy, header or not

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::uri::Scheme;
use axum::http::{header, Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service, ServiceExt};

use crate::observability::metrics;
use crate::policy::{parse_header, Clock, PolicyRecord, SystemClock, DEFAULT_FALLBACK_MAX_AGE};
use crate::store::PolicyStore;
use crate::transport::error::TransportError;
use crate::transport::redirect::{build_redirect, request_host};

/// Layer that wraps an executor in [`HstsService`].
#[derive(Debug)]
pub struct HstsLayer<P> {
    store: Arc<P>,
    clock: Arc<dyn Clock>,
    fallback_max_age: i64,
}

impl<P> Clone for HstsLayer<P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            fallback_max_age: self.fallback_max_age,
        }
    }
}

impl<P: PolicyStore> HstsLayer<P> {
    /// Enforce and learn against `store`, stamping records with the system clock.
    pub fn new(store: Arc<P>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            fallback_max_age: DEFAULT_FALLBACK_MAX_AGE,
        }
    }

    /// Use `clock` for the `created` time of learned records.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Max-age used when a header carries no parseable `max-age`.
    pub fn with_fallback_max_age(mut self, secs: i64) -> Self {
        self.fallback_max_age = secs;
        self
    }
}

impl<S, P> Layer<S> for HstsLayer<P> {
    type Service = HstsService<S, P>;

    fn layer(&self, inner: S) -> Self::Service {
        HstsService {
            inner,
            store: self.store.clone(),
            clock: self.clock.clone(),
            fallback_max_age: self.fallback_max_age,
        }
    }
}

/// Executor wrapper enforcing HSTS policy.
///
/// Always ready. Each forwarded request drives a clone of the executor through
/// `ServiceExt::oneshot`, so synthetic redirects never reserve executor capacity.
#[derive(Debug)]
pub struct HstsService<S, P> {
    inner: S,
    store: Arc<P>,
    clock: Arc<dyn Clock>,
    fallback_max_age: i64,
}

impl<S: Clone, P> Clone for HstsService<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            store: self.store.clone(),
            clock: self.clock.clone(),
            fallback_max_age: self.fallback_max_age,
        }
    }
}

impl<S, P> HstsService<S, P> {
    pub fn store(&self) -> &Arc<P> {
        &self.store
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, P, ReqBody, ResBody> Service<Request<ReqBody>> for HstsService<S, P>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    P: PolicyStore + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = TransportError<S::Error>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // executor readiness is awaited per forwarded request, see `call`
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let scheme = req.uri().scheme().cloned();
        let host = request_host(&req);

        if scheme.as_ref() == Some(&Scheme::HTTP) {
            if let Some(host) = host.as_deref().filter(|h| self.store.contains(h)) {
                tracing::debug!(
                    host = %host,
                    uri = %req.uri(),
                    "Upgrading request to HTTPS per HSTS policy"
                );
                metrics::record_upgrade();
                let redirect = build_redirect(&req).map_err(TransportError::from);
                return Box::pin(async move { redirect });
            }
        }

        let learn = match (scheme, host) {
            (Some(scheme), Some(host)) if scheme == Scheme::HTTPS => Some(host),
            _ => None,
        };
        let store = self.store.clone();
        let clock = self.clock.clone();
        let fallback_max_age = self.fallback_max_age;
        let inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.oneshot(req).await.map_err(TransportError::Upstream)?;

            if let Some(host) = learn {
                if let Some(value) = response.headers().get(header::STRICT_TRANSPORT_SECURITY) {
                    match value.to_str() {
                        Ok(value) => {
                            learn_policy(&*store, host, value, clock.now(), fallback_max_age)
                        }
                        Err(_) => tracing::warn!(
                            host = %host,
                            "Ignoring non-ASCII Strict-Transport-Security header"
                        ),
                    }
                }
            }

            Ok(response)
        })
    }
}

fn learn_policy<P: PolicyStore>(
    store: &P,
    host: String,
    value: &str,
    now: i64,
    fallback_max_age: i64,
) {
    let directives = parse_header(value, fallback_max_age);
    let record =
        PolicyRecord::learned(host, directives.include_subdomains, directives.max_age, now);

    if !record.is_eviction() {
        tracing::info!(
            host = %record.host,
            max_age = record.max_age,
            include_subdomains = record.include_subdomains,
            "Learned HSTS policy"
        );
        metrics::record_policy_learned(record.include_subdomains);
    }
    store.add(record);
}
