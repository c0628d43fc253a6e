use crate::model::{DashboardStats, PanelData, ServerRecord};
use crate::status::StatusAlert;
use std::fmt::Write;

/// Telegram HTML parse mode only recognizes entity tags, so escaping the
/// three metacharacters is sufficient.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn format_dashboard_stats(stats: &DashboardStats) -> String {
    format!(
        "<b>Dashboard Stats</b>\n\
         - Total Connections: {}\n\
         - Total Streams: {}\n\
         - Total Users: {}\n\
         - License Status: {}\n\
         - License Product Name: {}\n",
        stats.connections.total,
        stats.streams.total,
        stats.users.total,
        escape_html(&stats.license.status),
        escape_html(&stats.license.product_name),
    )
}

pub fn format_servers_info(servers: &[ServerRecord]) -> String {
    let mut formatted = String::from("\n<b>Servers Info</b>\n");
    for server in servers {
        let _ = write!(
            formatted,
            "\n<b>{}</b>\n\
             - IP: {}\n\
             - Domain: {}\n\
             - Status: {}\n\
             - Live Streams: {}\n\
             - Online Streams: {}\n\
             - Load (1/5/15): {}/{}/{}\n\
             - Connected Clients: {}\n\
             - Version: {}\n",
            escape_html(&server.name),
            escape_html(&server.ip),
            escape_html(&server.domain),
            escape_html(&server.health_status),
            server.live_streams,
            server.online_streams,
            server.load_avg_1,
            server.load_avg_5,
            server.load_avg_15,
            server.connected_clients,
            escape_html(&server.version),
        );
    }
    formatted
}

/// The full snapshot sent as answer to `/status`.
pub fn format_report(data: &PanelData) -> String {
    let mut report = format_dashboard_stats(&data.dashboard);
    report.push_str(&format_servers_info(&data.servers));
    report
}

pub fn format_alert(alert: &StatusAlert) -> String {
    match alert {
        StatusAlert::Degraded { server, status } => {
            format!("⚠️ Server <b>{}</b> is currently <b>{}</b>.", escape_html(server), escape_html(status))
        }
        StatusAlert::Recovered { server } => {
            format!("✅ Server <b>{}</b> is back <b>online</b>.", escape_html(server))
        }
        StatusAlert::LicenseInactive { .. } => {
            "⚠️ License status is not active! Please check immediately.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{test_server, CounterStats, LicenseInfo};

    fn sample_dashboard() -> DashboardStats {
        DashboardStats {
            connections: CounterStats { total: 512 },
            streams: CounterStats { total: 48 },
            users: CounterStats { total: 1024 },
            license: LicenseInfo {
                status: "Active".to_string(),
                product_name: "StreamPanel Pro".to_string(),
            },
        }
    }

    #[test]
    fn test_format_dashboard_stats() {
        let text = format_dashboard_stats(&sample_dashboard());
        assert!(text.starts_with("<b>Dashboard Stats</b>"));
        assert!(text.contains("- Total Connections: 512"));
        assert!(text.contains("- Total Streams: 48"));
        assert!(text.contains("- Total Users: 1024"));
        assert!(text.contains("- License Status: Active"));
        assert!(text.contains("- License Product Name: StreamPanel Pro"));
    }

    #[test]
    fn test_format_servers_info() {
        let mut server = test_server("edge-01", "online");
        server.live_streams = 12;
        server.load_avg_1 = 0.5;
        let text = format_servers_info(&[server]);
        assert!(text.contains("<b>edge-01</b>"));
        assert!(text.contains("- Status: online"));
        assert!(text.contains("- Live Streams: 12"));
        assert!(text.contains("- Load (1/5/15): 0.5/0/0"));
    }

    #[test]
    fn test_server_fields_are_escaped() {
        let server = test_server("<edge&co>", "online");
        let text = format_servers_info(&[server]);
        assert!(text.contains("&lt;edge&amp;co&gt;"));
        assert!(!text.contains("<edge"));
    }

    #[test]
    fn test_format_report_concatenates_sections() {
        let data = PanelData {
            dashboard: sample_dashboard(),
            servers: vec![test_server("edge-01", "online")],
        };
        let text = format_report(&data);
        let dashboard_pos = text.find("<b>Dashboard Stats</b>").expect("dashboard section");
        let servers_pos = text.find("<b>Servers Info</b>").expect("servers section");
        assert!(dashboard_pos < servers_pos);
    }

    #[test]
    fn test_format_alerts() {
        let degraded = StatusAlert::Degraded {
            server: "edge-01".to_string(),
            status: "offline".to_string(),
        };
        assert_eq!(
            format_alert(&degraded),
            "⚠️ Server <b>edge-01</b> is currently <b>offline</b>."
        );
        let recovered = StatusAlert::Recovered { server: "edge-01".to_string() };
        assert_eq!(
            format_alert(&recovered),
            "✅ Server <b>edge-01</b> is back <b>online</b>."
        );
        let license = StatusAlert::LicenseInactive { status: "Suspended".to_string() };
        assert!(format_alert(&license).contains("License status is not active"));
    }
}
