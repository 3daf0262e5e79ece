// Alert decision engine - decides whether humans get pinged

use crate::probe::HealthCheck;
use chrono::{DateTime, Duration, Utc};

/// Decides whether a batch of health checks warrants pinging the
/// responsible users.
pub struct AlertDecisionEngine {
    alert_ssl_expires_in_days: i64,
}

impl AlertDecisionEngine {
    pub fn new(alert_ssl_expires_in_days: i64) -> Self {
        Self {
            alert_ssl_expires_in_days,
        }
    }

    /// True when any check in the batch triggers an alert
    pub fn should_ping(&self, checks: &[HealthCheck], now: DateTime<Utc>) -> bool {
        checks.iter().any(|check| self.check_triggers(check, now))
    }

    /// A single check triggers when it is unhealthy or its certificate
    /// falls inside the expiry warning window.
    pub fn check_triggers(&self, check: &HealthCheck, now: DateTime<Utc>) -> bool {
        !check.is_good() || self.ssl_expiry_alert(check, now)
    }

    /// Padded expiry comparison.
    ///
    /// The +1 day +1 second padding makes a certificate expiring
    /// exactly N days from now flag at a threshold of N rather than
    /// N-1, so the alert cannot stay silent on the last eligible day.
    pub fn ssl_expiry_alert(&self, check: &HealthCheck, now: DateTime<Utc>) -> bool {
        match check.not_after {
            Some(not_after) if check.is_ssl => {
                now + Duration::days(self.alert_ssl_expires_in_days + 1) + Duration::seconds(1)
                    > not_after
            }
            _ => false,
        }
    }

    /// Whole days until expiry, for display only. The alert decision
    /// uses the padded comparison above; the two may differ by one.
    pub fn remaining_days(check: &HealthCheck, now: DateTime<Utc>) -> Option<i64> {
        check.not_after.map(|not_after| (not_after - now).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{classify, ProbeOutcome, TransportFailure};

    fn good_check(not_after: Option<DateTime<Utc>>) -> HealthCheck {
        let mut check = HealthCheck::new("https://ok.example");
        let (status, _) = classify(&ProbeOutcome::Code(200));
        check.statuses.push(status);
        check.is_ssl = not_after.is_some();
        check.not_after = not_after;
        check
    }

    fn bad_check() -> HealthCheck {
        let mut check = HealthCheck::new("https://down.example");
        let (status, _) = classify(&ProbeOutcome::Transport(TransportFailure::Timeout));
        check.statuses.push(status);
        check
    }

    #[test]
    fn test_unhealthy_check_pings_regardless_of_ssl() {
        let engine = AlertDecisionEngine::new(7);
        let now = Utc::now();

        assert!(engine.should_ping(&[bad_check()], now));
        assert!(engine.should_ping(&[good_check(None), bad_check()], now));
        assert!(!engine.should_ping(&[good_check(None)], now));
        assert!(!engine.should_ping(&[], now));
    }

    #[test]
    fn test_expiry_threshold_padding() {
        let engine = AlertDecisionEngine::new(7);
        let now = Utc::now();

        // Expiring in 8 days: the padding pushes the boundary to 8
        // days inclusive, so this still alerts.
        let in_8_days = good_check(Some(now + Duration::days(8)));
        assert!(engine.should_ping(&[in_8_days], now));

        let in_6_days = good_check(Some(now + Duration::days(6)));
        assert!(engine.should_ping(&[in_6_days], now));

        let in_9_days = good_check(Some(now + Duration::days(9)));
        assert!(!engine.should_ping(&[in_9_days], now));
    }

    #[test]
    fn test_expiry_ignored_without_certificate() {
        let engine = AlertDecisionEngine::new(7);
        let now = Utc::now();

        // not_after set but is_ssl false (should not happen in
        // practice, but the guard is explicit)
        let mut check = good_check(None);
        check.not_after = Some(now + Duration::days(1));
        assert!(!engine.should_ping(&[check], now));
    }

    #[test]
    fn test_remaining_days_is_display_only() {
        let now = Utc::now();
        let check = good_check(Some(now + Duration::days(8) + Duration::hours(3)));
        assert_eq!(AlertDecisionEngine::remaining_days(&check, now), Some(8));

        let no_cert = good_check(None);
        assert_eq!(AlertDecisionEngine::remaining_days(&no_cert, now), None);
    }
}
