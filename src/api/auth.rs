// =============================================================================
// API-key caller classification
// =============================================================================
//
// The `x-api-key` header is optional. A request presenting one of the
// configured keys is `Authenticated`; anything else (no header, unknown key,
// non-UTF-8 value) is `Anonymous` and subject to the rate limit. Invalid keys
// are never rejected outright.
//
// Key comparison is constant time so response timing does not reveal how much
// of a presented key matched.
// =============================================================================

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Who is calling, as far as rate limiting is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Authenticated,
    /// Keyed by client address for per-client limiting.
    Anonymous { client: String },
}

// =============================================================================
// Constant-time comparison
// =============================================================================

/// Compare two byte slices in constant time. Returns `true` if they are
/// identical. The comparison always examines every byte of both slices even
/// when a mismatch is found early.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        // The attacker does not control the expected key length, so leaking a
        // length mismatch is acceptable.
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// `true` if `presented` matches any configured key. Every key is compared.
pub fn key_is_valid(presented: &str, keys: &[String]) -> bool {
    keys.iter()
        .fold(false, |found, key| found | constant_time_eq(presented.as_bytes(), key.as_bytes()))
}

// =============================================================================
// Classification
// =============================================================================

/// Classify a request from its headers and (when known) peer address.
///
/// `x-forwarded-for` is ignored unless `trust_forwarded_for` is set; a caller
/// could otherwise pick a fresh identity per request.
pub fn classify(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    keys: &[String],
    trust_forwarded_for: bool,
) -> Caller {
    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if let Some(key) = presented {
        if !key.is_empty() && key_is_valid(key, keys) {
            return Caller::Authenticated;
        }
    }
    Caller::Anonymous {
        client: client_id(headers, peer, trust_forwarded_for),
    }
}

/// First trusted `x-forwarded-for` hop, else the socket peer, else `unknown`.
fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    headers
        .get("x-forwarded-for")
        .filter(|_| trust_forwarded_for)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

// =============================================================================
// Tests
// =============================================================================
