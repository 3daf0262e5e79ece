// Error types for pulsecheck
//
// Transport failures are never surfaced as errors (they are recorded
// as report statuses), so the error surface here is small: fatal
// configuration problems, webhook delivery failures, and the
// per-target certificate inspection errors.

use std::io;
use thiserror::Error;

/// Fatal errors surfaced to the operator
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A required configuration key is absent
    #[error("{key} is not set")]
    MissingConfig { key: &'static str },

    /// A configuration value could not be parsed
    #[error("{key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    /// The webhook endpoint rejected the report
    #[error("webhook returned status {status}: {body}")]
    WebhookDelivery { status: u16, body: String },
}

/// Errors raised while fetching a target's leaf certificate
///
/// These are localized to one target: the checker logs them and leaves
/// `not_after` unset rather than aborting the run.
#[derive(Debug, Error)]
pub enum CertificateFetchError {
    /// TCP connection to host:443 could not be established
    #[error("connection to {host}:443 failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Connection or handshake exceeded the inspector's timeout
    #[error("timed out fetching certificate from {host}:443")]
    Timeout { host: String },

    /// The hostname is not a valid TLS server name (SNI)
    #[error("invalid TLS server name: {host}")]
    InvalidServerName { host: String },

    /// The TLS handshake failed
    #[error("TLS handshake with {host} failed: {source}")]
    Handshake {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The server presented no certificate
    #[error("{host} returned no certificate")]
    NoCertificate { host: String },

    /// The leaf certificate could not be parsed
    #[error("could not parse certificate from {host}: {message}")]
    Parse { host: String, message: String },
}
