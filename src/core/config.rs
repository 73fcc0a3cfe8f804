use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_SYMBOLS_BASE_URL: &str = "https://api.exchangeratesapi.io/v1";
pub const DEFAULT_CONVERSION_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SymbolsProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversionProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub symbols: Option<SymbolsProviderConfig>,
    pub conversion: Option<ConversionProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            symbols: Some(SymbolsProviderConfig {
                base_url: DEFAULT_SYMBOLS_BASE_URL.to_string(),
            }),
            conversion: Some(ConversionProviderConfig {
                base_url: DEFAULT_CONVERSION_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// JSON file holding `api_key_currency` and `api_key_conversion`.
    pub credentials_path: Option<String>,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the config from the default location. A missing file is not an
    /// error here; the built-in provider endpoints are used instead.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("in", "codito", "fxconv")
            .context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_credentials_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("api.json"))
    }

    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_path {
            Some(custom_path) => Ok(PathBuf::from(custom_path)),
            None => Self::default_credentials_path(),
        }
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn symbols_base_url(&self) -> &str {
        self.providers
            .symbols
            .as_ref()
            .map_or(DEFAULT_SYMBOLS_BASE_URL, |p| &p.base_url)
    }

    pub fn conversion_base_url(&self) -> &str {
        self.providers
            .conversion
            .as_ref()
            .map_or(DEFAULT_CONVERSION_BASE_URL, |p| &p.base_url)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  symbols:
    base_url: "http://example.com/symbols"
  conversion:
    base_url: "http://example.com/convert"
credentials_path: "/tmp/fxconv/api.json"
data_path: "/tmp/fxconv/data"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.symbols_base_url(), "http://example.com/symbols");
        assert_eq!(config.conversion_base_url(), "http://example.com/convert");
        assert_eq!(
            config.credentials_path().unwrap(),
            PathBuf::from("/tmp/fxconv/api.json")
        );
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/fxconv/data")
        );
    }

    #[test]
    fn test_config_defaults_when_sections_missing() {
        let config: AppConfig = serde_yaml::from_str("data_path: /tmp/x\n").unwrap();
        assert_eq!(config.symbols_base_url(), DEFAULT_SYMBOLS_BASE_URL);
        assert_eq!(config.conversion_base_url(), DEFAULT_CONVERSION_BASE_URL);
        assert!(config.credentials_path.is_none());

        // A provider section set to null still falls back to the default URL
        let config: AppConfig =
            serde_yaml::from_str("providers:\n  symbols: null\n  conversion: null\n").unwrap();
        assert_eq!(config.symbols_base_url(), DEFAULT_SYMBOLS_BASE_URL);
        assert_eq!(config.conversion_base_url(), DEFAULT_CONVERSION_BASE_URL);
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "providers:\n  symbols:\n    base_url: http://localhost:1")?;

        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.symbols_base_url(), "http://localhost:1");
        // conversion section absent in the file, so the field is None
        assert_eq!(config.conversion_base_url(), DEFAULT_CONVERSION_BASE_URL);
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
