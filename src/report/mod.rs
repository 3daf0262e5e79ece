// Report composer - renders the final multi-line status report

pub mod system;

pub use system::SystemSnapshot;

use crate::alert::AlertDecisionEngine;
use crate::probe::HealthCheck;
use chrono::{DateTime, Utc};

/// Renders health check results into the webhook message.
///
/// Every logical section emits a line even when empty, so the line
/// structure of the report is stable across runs.
pub struct ReportComposer {
    pinged_user_ids: Vec<String>,
    attempt_interval_secs: u64,
    system: Option<SystemSnapshot>,
}

impl ReportComposer {
    pub fn new(pinged_user_ids: Vec<String>, attempt_interval_secs: u64) -> Self {
        Self {
            pinged_user_ids,
            attempt_interval_secs,
            system: None,
        }
    }

    /// Include host load and memory lines from a pre-captured snapshot
    pub fn with_system_stats(mut self, snapshot: SystemSnapshot) -> Self {
        self.system = Some(snapshot);
        self
    }

    /// Compose the report: ping line, timestamp line, optional system
    /// context, then one line per health check in input order.
    pub fn compose(
        &self,
        checks: &[HealthCheck],
        should_ping: bool,
        engine: &AlertDecisionEngine,
        now: DateTime<Utc>,
    ) -> String {
        let mut lines = Vec::with_capacity(checks.len() + 2);

        lines.push(if should_ping {
            self.ping_line()
        } else {
            String::new()
        });
        lines.push(format!("> {}", now.format("%Y-%m-%d %H:%M:%S")));

        if let Some(snapshot) = &self.system {
            lines.extend(snapshot.render());
        }

        for check in checks {
            lines.push(format!("{} {}", check.target, self.body(check, engine, now)));
        }

        lines.join("\n")
    }

    fn ping_line(&self) -> String {
        self.pinged_user_ids
            .iter()
            .map(|id| format!("<@{}>", id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn body(&self, check: &HealthCheck, engine: &AlertDecisionEngine, now: DateTime<Utc>) -> String {
        let messages = check
            .statuses
            .iter()
            .map(|s| s.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if check.is_good() {
            let mut body = messages;
            if let Some(not_after) = check.not_after.filter(|_| check.is_ssl) {
                body.push_str(&format!(" (Expires: {})", not_after.format("%Y-%m-%d")));
            }
            if engine.ssl_expiry_alert(check, now) {
                if let Some(days) = AlertDecisionEngine::remaining_days(check, now) {
                    body.push_str(&format!(" *SSL Certificate expires in {} days!*", days));
                }
            }
            body
        } else {
            let mut body = format!("__{}__", messages);
            if check.statuses.len() > 1 {
                let secs = self.attempt_interval_secs;
                body.push_str(&format!(
                    " (interval between each attempt was {} second{})",
                    secs,
                    if secs == 1 { "" } else { "s" }
                ));
            }
            body
        }
    }
}
