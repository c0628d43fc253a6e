use log::warn;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Error, ErrorKind};
use std::path::Path;
use url::Url;

const fn default_poll_interval_secs() -> u64 { 600 }
const fn default_initial_delay_secs() -> u64 { 10 }

/// Panel connection settings. All request URLs are derived from `url`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    pub url: String,
    /// Login form fields posted as-is; the CSRF token is added per session.
    pub credentials: HashMap<String, String>,
}

impl PanelConfig {
    pub fn login_url(&self) -> String {
        format!("{}/login", self.url)
    }

    pub fn dashboard_url(&self) -> String {
        format!("{}/api/dashboard-stats", self.url)
    }

    pub fn servers_url(&self) -> String {
        format!("{}/api/servers/index?with_external_servers=1&with_gpu_processes=0", self.url)
    }

    fn prepare(&mut self) -> Result<(), String> {
        while self.url.ends_with('/') {
            self.url.pop();
        }
        if let Err(err) = Url::parse(&self.url) {
            return Err(format!("Invalid panel url {}: {err}", self.url));
        }
        if self.credentials.is_empty() {
            return Err("Panel credentials can't be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Telegram chat id, optionally `chat-id:thread-id`.
    pub chat_id: String,
}

impl TelegramConfig {
    fn prepare(&self) -> Result<(), String> {
        if self.bot_token.trim().is_empty() {
            return Err("Telegram bot token can't be empty".to_string());
        }
        if self.chat_id.trim().is_empty() {
            return Err("Telegram chat id can't be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            initial_delay_secs: default_initial_delay_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Partial view of the config file, read before the full parse so the logger
/// can be initialized first. Unknown fields are deliberately tolerated here.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct LogLevelConfig {
    #[serde(default)]
    pub log: Option<LogConfig>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub panel: PanelConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

impl Config {
    pub fn prepare(&mut self) -> Result<(), String> {
        self.panel.prepare()?;
        self.telegram.prepare()?;
        if self.schedule.interval_secs == 0 {
            return Err("Schedule interval can't be 0".to_string());
        }
        if self.schedule.interval_secs < 60 {
            warn!("Poll interval of {}s is unusually short", self.schedule.interval_secs);
        }
        Ok(())
    }
}

pub fn read_config<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
    let file = File::open(&path)?;
    let mut config: Config = serde_yaml::from_reader(file)
        .map_err(|err| Error::new(ErrorKind::InvalidData, format!("Can't read config file: {err}")))?;
    config.prepare().map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_YML: &str = r#"
panel:
  url: https://panel.example.com/
  credentials:
    username: admin
    password: secret
telegram:
  bot_token: "123456:ABC"
  chat_id: "-1000123456789"
"#;

    #[test]
    fn test_parse_config_with_defaults() {
        let mut config: Config = serde_yaml::from_str(CONFIG_YML).expect("config should parse");
        config.prepare().expect("config should validate");
        assert_eq!(config.schedule.interval_secs, 600);
        assert_eq!(config.schedule.initial_delay_secs, 10);
        assert_eq!(config.panel.login_url(), "https://panel.example.com/login");
        assert_eq!(config.panel.dashboard_url(), "https://panel.example.com/api/dashboard-stats");
        assert!(config.panel.servers_url().contains("with_external_servers=1"));
        assert!(config.panel.servers_url().contains("with_gpu_processes=0"));
    }

    #[test]
    fn test_invalid_panel_url_rejected() {
        let yml = CONFIG_YML.replace("https://panel.example.com/", "not a url");
        let mut config: Config = serde_yaml::from_str(&yml).expect("config should parse");
        assert!(config.prepare().is_err());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let yml = r#"
panel:
  url: https://panel.example.com
  credentials: {}
telegram:
  bot_token: "123456:ABC"
  chat_id: "42"
"#;
        let mut config: Config = serde_yaml::from_str(yml).expect("config should parse");
        assert!(config.prepare().is_err());
    }
}
