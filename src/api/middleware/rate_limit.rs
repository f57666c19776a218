//! Per-client rate limiting using a token bucket.
//!
//! Behind a trusted reverse proxy the client address comes from
//! `X-Forwarded-For`, `X-Real-IP` or `Forwarded`; otherwise from the socket
//! peer, which requires serving with connect info.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Quota of a rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub per_second: u64,
    pub burst: u32,
}

/// For public endpoints: 2 requests per second, bursts of 100.
pub const PUBLIC: Quota = Quota {
    per_second: 2,
    burst: 100,
};

/// For authenticated endpoints: 1 request per second, bursts of 10.
pub const SECURE: Quota = Quota {
    per_second: 1,
    burst: 10,
};

/// Creates a limiter keyed by `extractor`.
///
/// Requests exceeding the quota receive `429 Too Many Requests`.
pub fn layer<K>(
    extractor: K,
    quota: Quota,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(quota.per_second)
            .burst_size(quota.burst)
            .key_extractor(extractor)
            .finish()
            .expect("rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Wraps `router` in a per-client limiter.
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::limit(api_routes(), rate_limit::SECURE, config.behind_proxy);
/// ```
pub fn limit<S>(router: Router<S>, quota: Quota, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(layer(SmartIpKeyExtractor, quota))
    } else {
        router.layer(layer(PeerIpKeyExtractor, quota))
    }
}
