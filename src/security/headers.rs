//! Strict-Transport-Security response header middleware (RFC 6797).
//!
//! # Responsibilities
//! - Wrap any `http` service and set `Strict-Transport-Security` on every
//!   response it produces
//! - Count down to a fixed expiry, or send a constant max-age
//!
//! # Design Decisions
//! - The strategy (expiry countdown or constant max-age) is chosen once,
//!   when the service is wrapped; only the countdown itself is recomputed
//!   per request
//! - The header value is computed when the request arrives and inserted on
//!   the inner response, replacing any value the inner service set
//! - Never short-circuits and never fails; inner errors pass through

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::http::{header::STRICT_TRANSPORT_SECURITY, HeaderValue, Request, Response};
use chrono::{DateTime, Utc};
use pin_project::pin_project;
use tower::{Layer, Service};

use crate::security::clock::{Clock, SystemClock};
use crate::security::policy::HstsPolicy;

/// Wrap `inner` so every response carries the HSTS header described by
/// `policy`, using the wall clock.
pub fn wrap<S>(policy: &HstsPolicy, inner: S) -> HstsService<S> {
    HstsService::new(inner, policy.clone(), SystemClock)
}

/// Layer that applies [`HstsService`].
#[derive(Debug, Clone)]
pub struct HstsLayer<C = SystemClock> {
    policy: HstsPolicy,
    clock: C,
}

impl HstsLayer {
    pub fn new(policy: HstsPolicy) -> Self {
        Self {
            policy,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> HstsLayer<C> {
    /// Use a different time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> HstsLayer<C2> {
        HstsLayer {
            policy: self.policy,
            clock,
        }
    }

    pub fn policy(&self) -> &HstsPolicy {
        &self.policy
    }
}

impl<S, C: Clock> Layer<S> for HstsLayer<C> {
    type Service = HstsService<S, C>;

    fn layer(&self, inner: S) -> Self::Service {
        HstsService::new(inner, self.policy.clone(), self.clock.clone())
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    /// Count down to `expires`, then fall back to the configured max-age.
    Expiry {
        expires: DateTime<Utc>,
        policy: HstsPolicy,
    },
    /// Constant value, rendered once.
    MaxAge(Option<HeaderValue>),
}

impl Strategy {
    fn select(policy: HstsPolicy, now: DateTime<Utc>) -> Self {
        match policy.expires {
            Some(expires) if policy.has_future_expiry(now) => {
                tracing::debug!(%expires, "HSTS expiry strategy selected");
                Strategy::Expiry { expires, policy }
            }
            _ => {
                tracing::debug!(max_age = policy.max_age, "HSTS max-age strategy selected");
                Strategy::MaxAge(header_value(policy.render(policy.max_age)))
            }
        }
    }

    fn header_value(&self, now: DateTime<Utc>) -> Option<HeaderValue> {
        match self {
            Strategy::MaxAge(value) => value.clone(),
            Strategy::Expiry { expires, policy } => {
                if policy.has_future_expiry(now) {
                    let remaining = (*expires - now).num_seconds();
                    header_value(policy.render(remaining))
                } else if policy.max_age >= 0 {
                    tracing::debug!(%expires, max_age = policy.max_age, "HSTS expiry passed, using max-age");
                    header_value(policy.render(policy.max_age))
                } else {
                    tracing::warn!(
                        %expires,
                        max_age = policy.max_age,
                        "HSTS expiry passed and max-age is negative, header omitted"
                    );
                    None
                }
            }
        }
    }

    fn is_expiry(&self) -> bool {
        matches!(self, Strategy::Expiry { .. })
    }
}

fn header_value(value: String) -> Option<HeaderValue> {
    match HeaderValue::try_from(value) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Invalid Strict-Transport-Security value");
            None
        }
    }
}

/// Service that sets `Strict-Transport-Security` on every response.
#[derive(Debug, Clone)]
pub struct HstsService<S, C = SystemClock> {
    inner: S,
    strategy: Strategy,
    clock: C,
}

impl<S, C: Clock> HstsService<S, C> {
    /// Wrap `inner`. The strategy is fixed here, using `clock`'s current time.
    pub fn new(inner: S, policy: HstsPolicy, clock: C) -> Self {
        let strategy = Strategy::select(policy, clock.now());
        Self {
            inner,
            strategy,
            clock,
        }
    }

    /// Whether this service counts down to a fixed expiry.
    pub fn uses_expiry(&self) -> bool {
        self.strategy.is_expiry()
    }

    /// The header value a request arriving now would get.
    pub fn current_value(&self) -> Option<HeaderValue> {
        self.strategy.header_value(self.clock.now())
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, C, ReqBody, ResBody> Service<Request<ReqBody>> for HstsService<S, C>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    C: Clock,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let value = self.current_value();
        ResponseFuture {
            inner: self.inner.call(req),
            value,
        }
    }
}

/// Response future of [`HstsService`].
#[pin_project]
#[derive(Debug)]
pub struct ResponseFuture<F> {
    #[pin]
    inner: F,
    value: Option<HeaderValue>,
}

impl<F, B, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<B>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let mut response = ready!(this.inner.poll(cx))?;
        if let Some(value) = this.value.take() {
            response.headers_mut().insert(STRICT_TRANSPORT_SECURITY, value);
        }
        Poll::Ready(Ok(response))
    }
}
