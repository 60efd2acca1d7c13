//! Per-IP rate limiting for the auth endpoints using governor and
//! `tower_governor`.
//!
//! This caps token-verification attempts per client; the per-user daily
//! chat quota is a separate concern handled by the usage ledger.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor that prefers proxy headers and falls back to the peer
/// address.
///
/// Direct (non-proxied) clients carry no forwarding headers, so the
/// connection's `ConnectInfo` handles them. The server must therefore be
/// served with `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // Try X-Forwarded-For (first IP in the chain)
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // Try X-Real-IP
        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // Fall back to the peer address of the connection
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(addr.ip());
        }

        Err(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_governor::key_extractor::KeyExtractor;

    fn request() -> Request<()> {
        Request::builder()
            .uri("/api/auth/login")
            .body(())
            .expect("build request")
    }

    #[test]
    fn test_forwarded_header_wins() {
        let mut req = request();
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().expect("header"));
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:9999".parse().expect("addr")));

        let key = ClientIpKeyExtractor.extract(&req).expect("extract");
        assert_eq!(key, "203.0.113.7".parse::<IpAddr>().expect("ip"));
    }

    #[test]
    fn test_direct_connection_uses_peer_address() {
        let mut req = request();
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("192.0.2.4:51234".parse().expect("addr")));

        let key = ClientIpKeyExtractor.extract(&req).expect("extract");
        assert_eq!(key, "192.0.2.4".parse::<IpAddr>().expect("ip"));
    }

    #[test]
    fn test_no_source_at_all_is_rejected() {
        let req = request();
        assert!(ClientIpKeyExtractor.extract(&req).is_err());
    }
}
