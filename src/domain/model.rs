use serde::{Deserialize, Serialize};

/// A sustainable alternative suggested for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SustainableProductRecommendation {
    pub name: String,
    pub description: String,
    pub sustainability_features: Vec<String>,
    pub original_product_category: String,
}

impl SustainableProductRecommendation {
    pub const REQUIRED_FIELDS: [&'static str; 4] = [
        "name",
        "description",
        "sustainability_features",
        "original_product_category",
    ];

    /// Checks a raw JSON document against the required-field rules and
    /// returns the names of the fields that fail them.
    ///
    /// `name`, `description` and `original_product_category` must be
    /// non-empty strings. `sustainability_features` must be an array of
    /// strings; an empty array is accepted.
    pub fn missing_fields(value: &serde_json::Value) -> Vec<&'static str> {
        let non_empty_str = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .is_some_and(|s| !s.is_empty())
        };

        let mut missing = Vec::new();
        if !non_empty_str("name") {
            missing.push("name");
        }
        if !non_empty_str("description") {
            missing.push("description");
        }
        let features_ok = value
            .get("sustainability_features")
            .and_then(|v| v.as_array())
            .is_some_and(|items| items.iter().all(|item| item.is_string()));
        if !features_ok {
            missing.push("sustainability_features");
        }
        if !non_empty_str("original_product_category") {
            missing.push("original_product_category");
        }
        missing
    }

    /// 裝飾圖片用的識別字，只取決於類別
    pub fn image_seed(&self) -> String {
        self.original_product_category.to_lowercase()
    }
}

/// What the presenter shows. Exactly one state is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Loading,
    Error(String),
    Loaded(SustainableProductRecommendation),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn recommendation(&self) -> Option<&SustainableProductRecommendation> {
        match self {
            ViewState::Loaded(recommendation) => Some(recommendation),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Result of one submit call on the input collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing was sent.
    Rejected,
    /// A request was already in flight; this submit was ignored.
    Ignored,
    Loaded,
    Failed,
}
