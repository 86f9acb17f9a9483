use crate::core::{SustainableProductRecommendation, ViewState};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

const IMAGE_SERVICE_BASE: &str = "https://picsum.photos/seed";

// 與 encodeURIComponent 相同：只保留英數字與 -_.!~*'()
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const WELCOME_TITLE: &str = "Ready to Go Green?";
pub const WELCOME_HINT: &str = "Enter a product like \"plastic water bottle\" or \"paper towels\" to discover a sustainable alternative.";
pub const LOADING_TEXT: &str = "Searching for a greener choice...";

/// Decorative image for a recommendation, seeded by its category.
pub fn image_url(recommendation: &SustainableProductRecommendation) -> Option<Url> {
    let seed = recommendation.image_seed();
    let encoded = utf8_percent_encode(&seed, URI_COMPONENT);
    Url::parse(&format!("{}/{}/800/400", IMAGE_SERVICE_BASE, encoded)).ok()
}

pub fn render_recommendation(recommendation: &SustainableProductRecommendation) -> String {
    let mut lines = vec![
        recommendation.name.clone(),
        String::new(),
        recommendation.description.clone(),
        String::new(),
        "Key Benefits:".to_string(),
    ];
    lines.extend(
        recommendation
            .sustainability_features
            .iter()
            .map(|feature| format!("  🌿 {}", feature)),
    );
    if let Some(url) = image_url(recommendation) {
        lines.push(String::new());
        lines.push(format!("Image: {}", url));
    }
    lines.join("\n")
}

/// 把目前狀態轉成終端機文字，一次只會顯示一種狀態
pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Empty => format!("{}\n{}", WELCOME_TITLE, WELCOME_HINT),
        ViewState::Loading => LOADING_TEXT.to_string(),
        ViewState::Error(message) => format!("Oops! {}", message),
        ViewState::Loaded(recommendation) => render_recommendation(recommendation),
    }
}
