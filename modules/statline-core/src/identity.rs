//! Rotating browser identities.
//!
//! Target sites apply anti-bot heuristics; presenting a coherent desktop
//! browser identity per request is a best-effort mitigation, not a guarantee.
//! Selection is uniformly random over an immutable table, so the pool is safe
//! to share across concurrent platform tasks without any locking.

use rand::Rng;

/// A user-agent string plus the header set a real browser would send with it.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_agent: &'static str,
    pub headers: &'static [(&'static str, &'static str)],
}

const CHROME_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Upgrade-Insecure-Requests", "1"),
];

const FIREFOX_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Upgrade-Insecure-Requests", "1"),
];

const SAFARI_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
];

static IDENTITIES: &[Identity] = &[
    Identity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        headers: CHROME_HEADERS,
    },
    Identity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        headers: CHROME_HEADERS,
    },
    Identity {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        headers: CHROME_HEADERS,
    },
    Identity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) \
                     Gecko/20100101 Firefox/125.0",
        headers: FIREFOX_HEADERS,
    },
    Identity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
                     (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        headers: SAFARI_HEADERS,
    },
    Identity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
        headers: CHROME_HEADERS,
    },
];

/// Stateless accessor over the static identity table.
pub struct IdentityPool;

impl IdentityPool {
    /// Pick an identity uniformly at random. No affinity is kept across
    /// calls; every strategy attempt gets a fresh pick.
    pub fn pick() -> &'static Identity {
        let idx = rand::rng().random_range(0..IDENTITIES.len());
        &IDENTITIES[idx]
    }

    pub fn all() -> &'static [Identity] {
        IDENTITIES
    }
}
