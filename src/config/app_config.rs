use serde::{Deserialize, Serialize};

/// Credentials and model selection for the generative text capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: AppConfig = toml::from_str(
            r#"
            api_key = "test-key"
            model = "gemini-1.5-flash"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let result: Result<AppConfig, _> = toml::from_str(r#"model = "gemini-1.5-flash""#);
        assert!(result.is_err());
    }
}
