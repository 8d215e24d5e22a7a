use crate::domain::ports::{ConfigProvider, OutputFormat};
use crate::utils::error::{BaziError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub batch: Option<BatchConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub input_path: String,
    pub output_path: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BaziError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BaziError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR}); unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BaziError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(level) = &self.logging.level {
            validation::validate_non_empty_string("logging.level", level)?;
            validation::validate_one_of("logging.level", &level.to_ascii_lowercase(), &LOG_LEVELS)?;
        }

        if let Some(batch) = &self.batch {
            validation::validate_path("batch.input_path", &batch.input_path)?;
            validation::validate_path("batch.output_path", &batch.output_path)?;
        }

        Ok(())
    }

    /// Command-line flags take precedence over the file.
    pub fn apply_overrides(&mut self, format: Option<OutputFormat>, no_cache: bool) {
        if let Some(format) = format {
            self.output.format = format;
        }
        if no_cache {
            self.engine.cache_enabled = false;
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json
    }
}

impl ConfigProvider for TomlConfig {
    fn cache_enabled(&self) -> bool {
        self.engine.cache_enabled
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format
    }

    fn pretty_json(&self) -> bool {
        self.output.pretty
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[engine]
cache_enabled = false

[output]
format = "json"
pretty = true

[logging]
level = "debug"
json = true

[batch]
input_path = "births.csv"
output_path = "charts.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(!config.cache_enabled());
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert!(config.pretty_json());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert_eq!(config.batch.as_ref().unwrap().input_path, "births.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.cache_enabled());
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(!config.pretty_json());
        assert!(config.batch.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BAZI_TEST_OUTPUT_DIR", "/tmp/charts");

        let toml_content = r#"
[batch]
input_path = "births.csv"
output_path = "${BAZI_TEST_OUTPUT_DIR}/out.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.batch.unwrap().output_path, "/tmp/charts/out.csv");

        std::env::remove_var("BAZI_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let result = TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n");
        assert!(matches!(
            result,
            Err(BaziError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());

        let config =
            TomlConfig::from_toml_str("[batch]\ninput_path = \"\"\noutput_path = \"o.csv\"\n")
                .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = TomlConfig::default();
        config.apply_overrides(Some(OutputFormat::Json), true);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert!(!config.cache_enabled());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[engine]\ncache_enabled = true\n[output]\nformat = \"csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Csv);
    }
}
