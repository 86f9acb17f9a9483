use crate::config::toml_config::TomlConfig;
use crate::core::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::core::ConfigProvider;
use crate::utils::error::{EcoError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

/// Values given on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved, immutable settings for the recommendation client.
#[derive(Clone)]
pub struct ServiceSettings {
    api_key: String,
    api_base: String,
    model: String,
    request_timeout: Option<Duration>,
}

fn resolved(value: Option<String>) -> Option<String> {
    value.filter(|v| !TomlConfig::is_unresolved(v))
}

impl ServiceSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// 合併命令列與設定檔，命令列優先
    pub fn resolve(overrides: SettingsOverrides, file: Option<&TomlConfig>) -> Result<Self> {
        let section = file.map(|f| f.service.clone()).unwrap_or_default();

        let api_key = resolved(overrides.api_key.or(section.api_key));
        let api_key = validate_required_field("api_key", &api_key)?;

        let settings = Self {
            api_key: api_key.clone(),
            api_base: resolved(overrides.api_base.or(section.api_base))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: resolved(overrides.model.or(section.model))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: overrides
                .timeout_seconds
                .or(section.timeout_seconds)
                .map(Duration::from_secs),
        };
        settings.validate()?;

        tracing::debug!(
            "Resolved service settings: model={}, api_base={}, timeout={:?}",
            settings.model,
            settings.api_base,
            settings.request_timeout
        );
        Ok(settings)
    }
}

// API key 不能出現在日誌裡
impl fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ConfigProvider for ServiceSettings {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Validate for ServiceSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_key", &self.api_key)?;
        validate_non_empty_string("model", &self.model)?;
        validate_url("api_base", &self.api_base)?;
        if let Some(timeout) = self.request_timeout {
            validate_range("timeout_seconds", timeout.as_secs(), 1, 300)?;
        }
        if self.model.contains('/') {
            return Err(EcoError::InvalidConfigValueError {
                field: "model".to_string(),
                value: self.model.clone(),
                reason: "Model identifier cannot contain '/'".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(toml: &str) -> TomlConfig {
        TomlConfig::from_toml_str(toml).unwrap()
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_given() {
        let settings = ServiceSettings::resolve(
            SettingsOverrides {
                api_key: Some("key".to_string()),
                ..Default::default()
            },
            None,
        )
        .unwrap();

        assert_eq!(settings.api_key(), "key");
        assert_eq!(settings.model(), DEFAULT_MODEL);
        assert_eq!(settings.api_base(), DEFAULT_API_BASE);
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = file_config(
            r#"
[service]
api_key = "file-key"
model = "file-model"
timeout_seconds = 20
"#,
        );

        let settings = ServiceSettings::resolve(
            SettingsOverrides {
                api_key: Some("flag-key".to_string()),
                timeout_seconds: Some(5),
                ..Default::default()
            },
            Some(&file),
        )
        .unwrap();

        assert_eq!(settings.api_key(), "flag-key");
        assert_eq!(settings.model(), "file-model");
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        let result = ServiceSettings::resolve(SettingsOverrides::default(), None);
        assert!(matches!(result, Err(EcoError::MissingConfigError { field }) if field == "api_key"));
    }

    #[test]
    fn test_unresolved_placeholder_counts_as_missing() {
        let file = file_config("[service]\napi_key = \"${ECO_CHOICE_NEVER_SET_KEY}\"\n");
        let result = ServiceSettings::resolve(SettingsOverrides::default(), Some(&file));
        assert!(matches!(result, Err(EcoError::MissingConfigError { .. })));
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = ServiceSettings::resolve(
            SettingsOverrides {
                api_key: Some("   ".to_string()),
                ..Default::default()
            },
            None,
        );
        assert!(matches!(result, Err(EcoError::InvalidConfigValueError { .. })));
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let settings = ServiceSettings::new("super-secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
