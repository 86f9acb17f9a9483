use crate::core::{ConfigProvider, RecommendationService, SustainableProductRecommendation};
use crate::utils::error::{EcoError, Result, ServiceError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const TEMPERATURE: f64 = 0.7;

pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant passionate about sustainability. \
Your goal is to help users find eco-friendly alternatives to everyday products. \
Be concise, positive, and informative. Provide your response in the requested JSON format.";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub fn build_prompt(query: &str) -> String {
    format!(
        "I'm looking for a sustainable, eco-friendly alternative to the following product: \"{}\". \
Please recommend a specific type of product.",
        query
    )
}

/// JSON schema the model's output is constrained to.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "The common name of the sustainable product alternative."
            },
            "description": {
                "type": "STRING",
                "description": "A brief, engaging, one-paragraph description of the sustainable product and why it's a better alternative."
            },
            "sustainability_features": {
                "type": "ARRAY",
                "description": "A list of 2-4 key bullet points on its sustainability benefits (e.g., \"Biodegradable\", \"Made from recycled materials\", \"Reduces plastic waste\").",
                "items": { "type": "STRING" }
            },
            "original_product_category": {
                "type": "STRING",
                "description": "A single, general category for the original product, like \"Personal Care\", \"Kitchen Supplies\", \"Cleaning\", \"Office\", or \"Clothing\"."
            }
        },
        "required": SustainableProductRecommendation::REQUIRED_FIELDS
    })
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn for_query(query: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: build_prompt(query),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: TEMPERATURE,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// 第一個候選回應的文字部分，全部串接起來
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Turns the model's text output into a validated recommendation.
pub fn parse_recommendation(
    text: &str,
) -> std::result::Result<SustainableProductRecommendation, ServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }

    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(ServiceError::MalformedResponse)?;

    let missing = SustainableProductRecommendation::missing_fields(&value);
    if !missing.is_empty() {
        return Err(ServiceError::MissingRequiredFields { fields: missing });
    }

    // 欄位都檢查過了，這裡只剩下型別不合的極端情況
    serde_json::from_value(value).map_err(ServiceError::MalformedResponse)
}

pub struct GeminiClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> GeminiClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| EcoError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base().trim_end_matches('/'),
            self.config.model()
        )
    }

    async fn request_text(&self, query: &str) -> std::result::Result<String, ServiceError> {
        let endpoint = self.endpoint();
        tracing::debug!("Making generateContent request to: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, self.config.api_key())
            .json(&GenerateContentRequest::for_query(query))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&body).map_err(ServiceError::MalformedResponse)?;
        Ok(envelope.text())
    }

    async fn try_fetch(
        &self,
        query: &str,
    ) -> std::result::Result<SustainableProductRecommendation, ServiceError> {
        let text = self.request_text(query).await?;
        parse_recommendation(&text)
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> RecommendationService for GeminiClient<C> {
    async fn fetch_alternative(&self, query: &str) -> Result<SustainableProductRecommendation> {
        match self.try_fetch(query).await {
            Ok(recommendation) => {
                tracing::info!(
                    "🌱 Found '{}' for query '{}'",
                    recommendation.name,
                    query
                );
                Ok(recommendation)
            }
            Err(e) => {
                match &e {
                    ServiceError::Status { status, body } => {
                        tracing::error!(
                            "❌ Recommendation request for '{}' failed with HTTP {}: {}",
                            query,
                            status,
                            body
                        );
                    }
                    ServiceError::MissingRequiredFields { fields } => {
                        tracing::error!(
                            "❌ Recommendation for '{}' is missing fields: {}",
                            query,
                            fields.join(", ")
                        );
                    }
                    other => {
                        tracing::error!("❌ Recommendation request for '{}' failed: {:?}", query, other);
                    }
                }
                Err(EcoError::ServiceError(e))
            }
        }
    }
}
