use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Optional YAML server configuration. Command-line flags win over file
/// values, file values win over the defaults baked into the CLI.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub cors_origin: Option<String>,
    pub base_currency: Option<String>,
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ServerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization() {
        let yaml = r#"
port: 4100
database: procura.db
cors_origin: "http://localhost:5173"
base_currency: USD
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).expect("This to parse");
        assert_eq!(config.port, Some(4100));
        assert_eq!(config.database.as_deref(), Some("procura.db"));
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.base_currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_partial_config() {
        let config: ServerConfig = serde_yaml::from_str("port: 8080").expect("This to parse");
        assert_eq!(config.port, Some(8080));
        assert!(config.database.is_none());
    }
}
