use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Process configuration. Every field has a compiled-in default; the YAML
/// file only overrides what it mentions and may be absent entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub models: ModelsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            models: ModelsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "fieldnote.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Priority-ordered `provider/model` fallback chain.
    pub chain: Vec<String>,
    /// Environment variable holding the Gemini API key.
    pub api_key_env: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            chain: vec![
                "gemini/gemini-2.0-flash".to_string(),
                "gemini/gemini-2.0-flash-lite".to_string(),
                "gemini/gemini-1.5-flash".to_string(),
            ],
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/fieldnote.yaml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8787");
        assert_eq!(config.models.chain.len(), 3);
        assert_eq!(config.models.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fieldnote.yaml");
        std::fs::write(
            &path,
            "server:\n  bind: 0.0.0.0:9000\nmodels:\n  chain:\n    - gemini/gemini-2.0-pro\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.models.chain, vec!["gemini/gemini-2.0-pro"]);
        // Untouched section keeps its default.
        assert_eq!(config.database.path, "fieldnote.db");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fieldnote.yaml");
        std::fs::write(&path, "server: [not, a, map]").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
