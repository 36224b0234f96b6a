use once_cell::sync::OnceCell;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Port of the backend on the page's host
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
port = 3000

[logging]
level = "debug"
"#;

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig { port: 3000 },
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Falls back to `Info` for an unrecognised level name
    pub fn log_level(&self) -> log::Level {
        self.logging.level.parse().unwrap_or(log::Level::Info)
    }
}

pub fn load_config() -> Result<AppConfig, toml::de::Error> {
    toml::from_str(DEFAULT_CONFIG)
}

/// Installs the configuration for the rest of the session; first call wins
pub fn init(config: AppConfig) -> &'static AppConfig {
    CONFIG.get_or_init(|| config)
}

pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = load_config().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_level(), log::Level::Debug);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
