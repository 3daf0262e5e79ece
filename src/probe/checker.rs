// Target health checker - drives the per-target retry loop

use crate::certificates::CertificateInspector;
use crate::probe::{classify, HealthCheck, ProbeOutcome, TransportFailure};
use crate::Result;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("pulsecheck/", env!("CARGO_PKG_VERSION"));

/// Runs the probe loop for one target and settles it into a `HealthCheck`
pub struct TargetHealthChecker {
    client: reqwest::Client,
    inspector: CertificateInspector,
    number_of_attempts: u32,
    attempt_interval: Duration,
}

impl TargetHealthChecker {
    /// Create a checker with a bounded per-request timeout.
    ///
    /// Redirects follow reqwest's default policy so that a redirect
    /// loop surfaces as a classified error rather than hanging.
    pub fn new(
        number_of_attempts: u32,
        attempt_interval: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            inspector: CertificateInspector::default(),
            number_of_attempts: number_of_attempts.max(1),
            attempt_interval,
        })
    }

    /// Check one target. Never fails: every error is captured as a
    /// `Status` entry on the returned `HealthCheck`.
    pub async fn check(&self, target: &str) -> HealthCheck {
        let mut check = HealthCheck::new(target);

        for attempt in 1..=self.number_of_attempts {
            let outcome = self.probe(target).await;
            let (status, hint) = classify(&outcome);

            // A healthy response ends the loop immediately, whatever
            // the classifier would otherwise recommend.
            let retry = if status.ok { false } else { hint };

            debug!(
                "{} attempt {}/{}: {}",
                target, attempt, self.number_of_attempts, status.message
            );
            check.statuses.push(status);

            if retry && attempt < self.number_of_attempts {
                tokio::time::sleep(self.attempt_interval).await;
            } else {
                break;
            }
        }

        if check.is_good() {
            if let Some(host) = https_host(target) {
                match self.inspector.inspect(&host).await {
                    Ok(not_after) => {
                        check.not_after = Some(not_after);
                        check.is_ssl = true;
                    }
                    Err(e) => {
                        // A certificate hiccup must not suppress the
                        // rest of the report; the expiry stays unknown.
                        warn!("certificate inspection for {} failed: {}", target, e);
                    }
                }
            }
        }

        check
    }

    /// Issue one GET against the target
    async fn probe(&self, target: &str) -> ProbeOutcome {
        match self.client.get(target).send().await {
            Ok(response) => ProbeOutcome::Code(response.status().as_u16()),
            Err(e) => ProbeOutcome::Transport(classify_transport(&e)),
        }
    }
}

/// Map a reqwest error to a transport failure kind.
///
/// `is_connect` is checked before `is_timeout`: connection-phase
/// timeouts carry both flags and are treated as connection failures,
/// matching the established classification order.
fn classify_transport(error: &reqwest::Error) -> TransportFailure {
    if error.is_connect() {
        TransportFailure::ConnectionFailed
    } else if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_redirect() {
        TransportFailure::TooManyRedirects
    } else if error.is_builder() || error.is_request() || error.is_body() || error.is_decode() {
        TransportFailure::HttpProtocol
    } else {
        TransportFailure::Unknown
    }
}

/// Extract the hostname when the target URL uses the https scheme
fn https_host(target: &str) -> Option<String> {
    let url = url::Url::parse(target).ok()?;
    if url.scheme() == "https" {
        url.host_str().map(|h| h.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_host_extraction() {
        assert_eq!(
            https_host("https://example.com/healthz"),
            Some("example.com".to_string())
        );
        assert_eq!(
            https_host("https://example.com:8443"),
            Some("example.com".to_string())
        );
        assert_eq!(https_host("http://example.com"), None);
        assert_eq!(https_host("not a url"), None);
    }

    #[tokio::test]
    async fn test_attempts_coerced_to_minimum_one() {
        let checker = TargetHealthChecker::new(
            0,
            Duration::from_secs(1),
            Duration::from_millis(200),
        )
        .unwrap();
        assert_eq!(checker.number_of_attempts, 1);
    }
}
