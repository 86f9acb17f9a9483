use crate::domain::model::SustainableProductRecommendation;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Read-only settings for the generative service.
pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn api_base(&self) -> &str;
    fn model(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Looks up one sustainable alternative for `query`.
    async fn fetch_alternative(&self, query: &str) -> Result<SustainableProductRecommendation>;
}
