use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Фоновый поиск алертов
#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    pub scan_interval_secs: u64,
    pub retention_days: i64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 3600,
            retention_days: 30,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "db/petromonitor.db"

[server]
port = 3000

[alerts]
scan_interval_secs = 3600
retention_days = 30
"#;

/// Load configuration from config.toml next to the executable,
/// falling back to the embedded default.
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            }
            tracing::warn!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.alerts.scan_interval_secs == 0 {
        anyhow::bail!("alerts.scan_interval_secs must be greater than zero");
    }
    Ok(config)
}

/// Resolve the database path; relative paths are taken from the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);
    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(db_path)))
        .unwrap_or_else(|| db_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "db/petromonitor.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.alerts.retention_days, 30);
    }

    #[test]
    fn test_optional_sections_fall_back_to_defaults() {
        let config = parse_config("[database]\npath = \"/tmp/x.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.alerts.scan_interval_secs, 3600);
        assert_eq!(get_database_path(&config), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let raw = "[database]\npath = \"a.db\"\n[alerts]\nscan_interval_secs = 0\nretention_days = 1\n";
        assert!(parse_config(raw).is_err());
    }
}
