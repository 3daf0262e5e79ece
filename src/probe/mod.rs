// Probe outcomes, status classification and per-target health state

mod checker;

pub use checker::TargetHealthChecker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport-level failure kinds a probe can produce
///
/// The variants are the failure classes the HTTP client can raise;
/// `Unknown` is the catch-all for anything unclassified, kept for
/// forward compatibility with new client error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportFailure {
    ConnectionFailed,
    Timeout,
    TooManyRedirects,
    HttpProtocol,
    Unknown,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailure::ConnectionFailed => write!(f, "Failed to connect"),
            TransportFailure::Timeout => write!(f, "Timeout"),
            TransportFailure::TooManyRedirects => write!(f, "Too many redirects occurred"),
            TransportFailure::HttpProtocol => write!(f, "HTTP protocol error"),
            TransportFailure::Unknown => write!(f, "Unknown error"),
        }
    }
}

/// Result of one network attempt against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with an HTTP status code
    Code(u16),
    /// The request failed before a response was received
    Transport(TransportFailure),
}

/// Classified result of one probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: Option<u16>,
    pub message: String,
    pub ok: bool,
}

/// Map a probe outcome to a status and a retry recommendation.
///
/// The retry policy is deliberately asymmetric: timeouts and
/// unhealthy-but-received responses are worth another attempt, while
/// connection failures, redirect loops, protocol errors and
/// unclassified failures are not.
pub fn classify(outcome: &ProbeOutcome) -> (Status, bool) {
    match *outcome {
        ProbeOutcome::Code(code) => {
            let ok = (200..400).contains(&code);
            let status = Status {
                code: Some(code),
                message: code.to_string(),
                ok,
            };
            (status, !ok)
        }
        ProbeOutcome::Transport(failure) => {
            let status = Status {
                code: None,
                message: failure.to_string(),
                ok: false,
            };
            (status, failure == TransportFailure::Timeout)
        }
    }
}

/// Aggregate outcome of all probes against one target
///
/// Owned exclusively by the task running that target's retry loop and
/// returned by value; nothing here is shared or retained across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub target: String,
    /// Chronological, append-only; never empty after the checker runs
    pub statuses: Vec<Status>,
    /// True only when the target is https, healthy, and certificate
    /// inspection succeeded
    pub is_ssl: bool,
    /// Leaf certificate expiry, set together with `is_ssl`
    pub not_after: Option<DateTime<Utc>>,
}

impl HealthCheck {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            statuses: Vec::new(),
            is_ssl: false,
            not_after: None,
        }
    }

    /// A target is good if any attempt produced a healthy response
    pub fn is_good(&self) -> bool {
        self.statuses.iter().any(|s| s.ok)
    }
}
