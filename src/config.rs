//! Process-wide read-only defaults and per-call option structs (§6
//! "Configuration enumerated"). No mutation API is part of the core;
//! callers override per-call via these structs, the same way
//! `rustreexo`'s tree-shape helpers are plain constants/functions rather
//! than a config object.

use std::time::Duration;

/// Compiled-in calendar URL list used when a caller doesn't supply one.
pub const DEFAULT_CALENDAR_URLS: &[&str] = &[
    "https://alice.btc.calendar.opentimestamps.org",
    "https://bob.btc.calendar.opentimestamps.org",
    "https://finney.calendar.eternitywall.com",
    "https://btc.calendar.catallaxy.com",
];

/// Default per-request timeout for calendar HTTP calls.
pub const DEFAULT_CALENDAR_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-request timeout for verifier lookups.
pub const DEFAULT_VERIFIER_TIMEOUT: Duration = Duration::from_secs(10);

/// Default fudge length in bytes.
pub const DEFAULT_FUDGE_LEN: usize = 16;

/// Per-call overrides for [`crate::submit::submit`].
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Calendar URLs to submit to.
    pub calendar_urls: Vec<String>,
    /// Random bytes mixed with the digest before sending. `None` generates
    /// [`DEFAULT_FUDGE_LEN`] random bytes.
    pub fudge: Option<Vec<u8>>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        SubmitOptions {
            calendar_urls: DEFAULT_CALENDAR_URLS.iter().map(|s| s.to_string()).collect(),
            fudge: None,
            timeout: DEFAULT_CALENDAR_TIMEOUT,
        }
    }
}

/// Per-call overrides for [`crate::upgrade::upgrade`].
#[derive(Debug, Clone)]
pub struct UpgradeOptions {
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        UpgradeOptions {
            timeout: DEFAULT_CALENDAR_TIMEOUT,
        }
    }
}

/// Per-call overrides for [`crate::verify::verify`].
#[derive(Clone)]
pub struct VerifyOptions {
    /// Per-verifier-call timeout. Individual [`crate::verify::BoxVerifier`]
    /// implementations are responsible for honouring it.
    pub timeout: Duration,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        VerifyOptions {
            timeout: DEFAULT_VERIFIER_TIMEOUT,
        }
    }
}
