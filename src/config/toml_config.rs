use crate::adapters::fixture::DEFAULT_FIXTURE_COUNT;
use crate::adapters::settings::{
    SettingsDefaults, DEFAULT_PAGE_SIZE, MAX_FONT_SCALE, MAX_PAGE_SIZE, MIN_FONT_SCALE,
};
use crate::core::{ConfigProvider, SourceKind};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub catalog: Option<CatalogSection>,
    pub source: SourceConfig,
    pub fixture: Option<FixtureConfig>,
    pub settings: Option<SettingsConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureConfig {
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub page_size: Option<usize>,
    pub dark_theme: Option<bool>,
    pub font_scale: Option<f32>,
    pub animations_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_one_of("source.type", &self.source.r#type, &SourceKind::ALL)?;

        if self.source_kind() == SourceKind::Http {
            let endpoint =
                validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
            validation::validate_url("source.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(count) = self.fixture.as_ref().and_then(|f| f.count) {
            validation::validate_positive_number("fixture.count", count, 1)?;
        }

        if let Some(settings) = &self.settings {
            if let Some(page_size) = settings.page_size {
                validation::validate_range("settings.page_size", page_size, 1, MAX_PAGE_SIZE)?;
            }
            if let Some(scale) = settings.font_scale {
                validation::validate_range(
                    "settings.font_scale",
                    scale,
                    MIN_FONT_SCALE,
                    MAX_FONT_SCALE,
                )?;
            }
        }

        if let Some(catalog) = &self.catalog {
            validation::validate_non_empty_string("catalog.name", &catalog.name)?;
        }

        Ok(())
    }

    pub fn settings_defaults(&self) -> SettingsDefaults {
        let base = SettingsDefaults::default();
        match &self.settings {
            Some(s) => SettingsDefaults {
                page_size: s.page_size.unwrap_or(base.page_size),
                dark_theme: s.dark_theme.unwrap_or(base.dark_theme),
                font_scale: s.font_scale.unwrap_or(base.font_scale),
                animations_enabled: s.animations_enabled.unwrap_or(base.animations_enabled),
            },
            None => base,
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_kind(&self) -> SourceKind {
        // 未驗證的類型退回 fixture，validate_config 會先攔截
        self.source.r#type.parse().unwrap_or(SourceKind::Fixture)
    }

    fn api_endpoint(&self) -> &str {
        self.source.endpoint.as_deref().unwrap_or_default()
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn fixture_count(&self) -> usize {
        self.fixture
            .as_ref()
            .and_then(|f| f.count)
            .unwrap_or(DEFAULT_FIXTURE_COUNT)
    }

    fn default_page_size(&self) -> usize {
        self.settings
            .as_ref()
            .and_then(|s| s.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
