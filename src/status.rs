use crate::model::{DashboardStats, ServerRecord, HEALTH_ONLINE, LICENSE_ACTIVE};
use log::debug;
use std::collections::HashMap;

/// One data-derived alert, in the order it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAlert {
    Degraded { server: String, status: String },
    Recovered { server: String },
    LicenseInactive { status: String },
}

/// Owns the last-known health status per server name, the only state kept
/// across polls. The scheduler task is the single writer.
#[derive(Debug, Default)]
pub struct StatusTracker {
    statuses: HashMap<String, String>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares the freshly fetched server list against the previous poll
    /// and replaces the tracked statuses wholesale.
    ///
    /// A server seen for the first time produces no alert, it only becomes
    /// the baseline for the next poll. A server missing from `servers` is
    /// dropped from the tracker without an alert.
    pub fn diff(&mut self, servers: &[ServerRecord]) -> Vec<StatusAlert> {
        let mut current = HashMap::with_capacity(servers.len());
        let mut alerts = Vec::new();
        for server in servers {
            current.insert(server.name.clone(), server.health_status.clone());
            match self.statuses.get(&server.name) {
                Some(previous) if *previous != server.health_status => {
                    if server.health_status == HEALTH_ONLINE {
                        alerts.push(StatusAlert::Recovered { server: server.name.clone() });
                    } else {
                        alerts.push(StatusAlert::Degraded {
                            server: server.name.clone(),
                            status: server.health_status.clone(),
                        });
                    }
                }
                Some(_) => {}
                None => debug!("First sighting of server {}", server.name),
            }
        }
        for name in self.statuses.keys() {
            if !current.contains_key(name) {
                debug!("Server {name} disappeared from the panel listing");
            }
        }
        self.statuses = current;
        alerts
    }

    pub fn status_of(&self, name: &str) -> Option<&str> {
        self.statuses.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Fires on every poll while the license is not active, never deduplicated.
pub fn check_license(dashboard: &DashboardStats) -> Option<StatusAlert> {
    if dashboard.license.status == LICENSE_ACTIVE {
        None
    } else {
        Some(StatusAlert::LicenseInactive { status: dashboard.license.status.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{test_server, LicenseInfo};

    fn dashboard_with_license(status: &str) -> DashboardStats {
        DashboardStats {
            license: LicenseInfo {
                status: status.to_string(),
                product_name: "StreamPanel Pro".to_string(),
            },
            ..DashboardStats::default()
        }
    }

    #[test]
    fn test_first_poll_produces_no_alerts_and_sets_baseline() {
        let mut tracker = StatusTracker::new();
        let servers = vec![test_server("a", "online"), test_server("b", "offline")];
        let alerts = tracker.diff(&servers);
        assert!(alerts.is_empty());
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.status_of("a"), Some("online"));
        assert_eq!(tracker.status_of("b"), Some("offline"));
    }

    #[test]
    fn test_diff_is_idempotent_for_unchanged_input() {
        let mut tracker = StatusTracker::new();
        let servers = vec![test_server("a", "online"), test_server("b", "offline")];
        tracker.diff(&servers);
        let alerts = tracker.diff(&servers);
        assert!(alerts.is_empty());
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_degraded_transition() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[test_server("a", "online")]);
        let alerts = tracker.diff(&[test_server("a", "offline")]);
        assert_eq!(alerts, vec![StatusAlert::Degraded {
            server: "a".to_string(),
            status: "offline".to_string(),
        }]);
        assert_eq!(tracker.status_of("a"), Some("offline"));
    }

    #[test]
    fn test_recovered_transition() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[test_server("a", "offline")]);
        let alerts = tracker.diff(&[test_server("a", "online")]);
        assert_eq!(alerts, vec![StatusAlert::Recovered { server: "a".to_string() }]);
        assert_eq!(tracker.status_of("a"), Some("online"));
    }

    #[test]
    fn test_no_alert_without_change() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[test_server("a", "online")]);
        let alerts = tracker.diff(&[test_server("a", "online")]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_transition_between_degraded_states() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[test_server("a", "offline")]);
        let alerts = tracker.diff(&[test_server("a", "maintenance")]);
        assert_eq!(alerts, vec![StatusAlert::Degraded {
            server: "a".to_string(),
            status: "maintenance".to_string(),
        }]);
    }

    #[test]
    fn test_alerts_follow_server_list_order() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[
            test_server("a", "online"),
            test_server("b", "online"),
            test_server("c", "offline"),
        ]);
        let alerts = tracker.diff(&[
            test_server("a", "offline"),
            test_server("b", "offline"),
            test_server("c", "online"),
        ]);
        assert_eq!(alerts, vec![
            StatusAlert::Degraded { server: "a".to_string(), status: "offline".to_string() },
            StatusAlert::Degraded { server: "b".to_string(), status: "offline".to_string() },
            StatusAlert::Recovered { server: "c".to_string() },
        ]);
    }

    #[test]
    fn test_disappeared_server_dropped_without_alert() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[test_server("a", "online"), test_server("b", "online")]);
        let alerts = tracker.diff(&[test_server("a", "online")]);
        assert!(alerts.is_empty());
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.status_of("b"), None);
    }

    #[test]
    fn test_reappearing_server_counts_as_first_sighting() {
        let mut tracker = StatusTracker::new();
        tracker.diff(&[test_server("a", "online")]);
        tracker.diff(&[]);
        let alerts = tracker.diff(&[test_server("a", "offline")]);
        assert!(alerts.is_empty());
        assert_eq!(tracker.status_of("a"), Some("offline"));
    }

    #[test]
    fn test_license_active_produces_no_alert() {
        assert_eq!(check_license(&dashboard_with_license("Active")), None);
    }

    #[test]
    fn test_license_alert_repeats_every_poll() {
        let dashboard = dashboard_with_license("Suspended");
        for _ in 0..3 {
            assert_eq!(check_license(&dashboard), Some(StatusAlert::LicenseInactive {
                status: "Suspended".to_string(),
            }));
        }
    }
}
