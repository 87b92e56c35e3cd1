//! Per-client rate limiting using a token bucket.
//!
//! Limits are keyed by the socket peer address, so the router must be served
//! with `into_make_service_with_connect_info::<SocketAddr>()`. Requests over
//! the limit receive `429 Too Many Requests`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Storefront limiter: catalog browsing and cart changes.
///
/// - **Rate**: 5 requests per second
/// - **Burst**: 60 requests
pub fn layer() -> RateLimitLayer {
    token_bucket(5, 60)
}

/// Stricter limiter for the admin routes.
///
/// - **Rate**: 1 request per second
/// - **Burst**: 20 requests
pub fn admin_layer() -> RateLimitLayer {
    token_bucket(1, 20)
}

fn token_bucket(per_second: u64, burst_size: u32) -> RateLimitLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
