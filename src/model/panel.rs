use serde::Deserialize;

pub const HEALTH_ONLINE: &str = "online";
pub const LICENSE_ACTIVE: &str = "Active";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterStats {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseInfo {
    pub status: String,
    pub product_name: String,
}

/// Aggregate panel counters, replaced wholesale on every poll.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub connections: CounterStats,
    #[serde(default)]
    pub streams: CounterStats,
    #[serde(default)]
    pub users: CounterStats,
    pub license: LicenseInfo,
}

/// One panel server as listed by the servers endpoint. `name` is the only
/// identity carried across polls.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    pub ip: String,
    pub domain: String,
    pub health_status: String,
    #[serde(default)]
    pub live_streams: u64,
    #[serde(default)]
    pub online_streams: u64,
    #[serde(default)]
    pub load_avg_1: f64,
    #[serde(default)]
    pub load_avg_5: f64,
    #[serde(default)]
    pub load_avg_15: f64,
    #[serde(default)]
    pub connected_clients: u64,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct PanelData {
    pub dashboard: DashboardStats,
    pub servers: Vec<ServerRecord>,
}

#[cfg(test)]
pub fn test_server(name: &str, health_status: &str) -> ServerRecord {
    ServerRecord {
        name: name.to_string(),
        ip: "10.0.0.1".to_string(),
        domain: format!("{name}.example.com"),
        health_status: health_status.to_string(),
        live_streams: 0,
        online_streams: 0,
        load_avg_1: 0.0,
        load_avg_5: 0.0,
        load_avg_15: 0.0,
        connected_clients: 0,
        version: "1.0.0".to_string(),
    }
}
