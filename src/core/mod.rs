pub mod gemini;
pub mod presenter;
pub mod session;

pub use crate::domain::model::{SubmitOutcome, SustainableProductRecommendation, ViewState};
pub use crate::domain::ports::{ConfigProvider, RecommendationService};
pub use crate::utils::error::Result;
