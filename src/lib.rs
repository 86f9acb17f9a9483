pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{settings::ServiceSettings, toml_config::TomlConfig};
pub use core::{
    gemini::GeminiClient, session::RecommendationSession, SubmitOutcome,
    SustainableProductRecommendation, ViewState,
};
pub use utils::error::{EcoError, Result, ServiceError};
