use crate::config::SettingsOverrides;
use clap::Parser;
use std::path::PathBuf;

/// 只在 API_KEY 環境變數存在時使用，優先權低於 GEMINI_API_KEY
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Parser)]
#[command(name = "eco-choice")]
#[command(about = "Find sustainable alternatives to everyday products")]
pub struct CliConfig {
    /// Product to find an alternative for. Starts an interactive prompt when omitted.
    pub query: Option<String>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Model identifier (default: gemini-2.5-flash)")]
    pub model: Option<String>,

    #[arg(long, help = "Base URL of the generative language API")]
    pub api_base: Option<String>,

    #[arg(long, help = "HTTP timeout for the recommendation request")]
    pub timeout_seconds: Option<u64>,

    /// Path to a TOML file with a [service] section
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the recommendation as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_key: self
                .api_key
                .clone()
                .or_else(|| std::env::var(FALLBACK_API_KEY_ENV).ok()),
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_and_flags() {
        let config = CliConfig::parse_from([
            "eco-choice",
            "plastic water bottle",
            "--api-key",
            "flag-key",
            "--model",
            "gemini-2.0-flash",
            "--json",
        ]);

        assert_eq!(config.query.as_deref(), Some("plastic water bottle"));
        assert_eq!(config.api_key.as_deref(), Some("flag-key"));
        assert!(config.json);
        assert!(!config.verbose);

        let overrides = config.overrides();
        assert_eq!(overrides.api_key.as_deref(), Some("flag-key"));
        assert_eq!(overrides.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(overrides.timeout_seconds, None);
    }

    #[test]
    fn test_query_is_optional() {
        let config = CliConfig::parse_from(["eco-choice", "--config", "eco.toml", "-v"]);
        assert!(config.query.is_none());
        assert_eq!(config.config, Some(PathBuf::from("eco.toml")));
        assert!(config.verbose);
    }
}
