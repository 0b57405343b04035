use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::ai::{ExtractionError, TextModel};
use crate::models::ExtractedFields;

use super::prompt::build_prompt;

/// Schema-constrained extractor: prompts the text model with the rendered
/// page plus the closed vocabularies, parses the JSON answer and applies
/// field-level post-processing.
pub struct StructuredExtractor {
    model: Arc<dyn TextModel>,
}

impl StructuredExtractor {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        StructuredExtractor { model }
    }

    pub async fn extract(&self, page_html: &str) -> Result<ExtractedFields, ExtractionError> {
        let prompt = build_prompt(page_html);
        let raw = self.model.generate_json(&prompt).await?;

        let mut fields: ExtractedFields = serde_json::from_str(raw.trim())?;
        normalize_fields(&mut fields);

        debug!(
            "Extracted {} / {} ({})",
            fields.brand, fields.kor_name, fields.first_category
        );
        Ok(fields)
    }
}

fn normalize_fields(fields: &mut ExtractedFields) {
    fields.kor_name = strip_bracket_prefix(&fields.kor_name);
    fields.eng_name = strip_bracket_prefix(&fields.eng_name);
    fields.brand = fields.brand.to_uppercase();
}

/// Drop a leading `[...] ` token from a product name. Storefronts prefix
/// names with bracketed shop tags the report must not carry.
pub fn strip_bracket_prefix(name: &str) -> String {
    let prefix = Regex::new(r"^\[.*?\] (.*)").unwrap();
    match prefix.captures(name) {
        Some(captures) => captures[1].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct CannedModel {
        response: String,
    }

    #[async_trait]
    impl TextModel for CannedModel {
        async fn generate_json(&self, _prompt: &str) -> Result<String, ExtractionError> {
            Ok(self.response.clone())
        }
    }

    fn extractor_with(response: &str) -> StructuredExtractor {
        StructuredExtractor::new(Arc::new(CannedModel {
            response: response.to_string(),
        }))
    }

    const VALID_RESPONSE: &str = r#"{
        "price": 1250000,
        "market_price": "1990000",
        "brand": "gucci",
        "first_category": "가방",
        "second_category": "백팩",
        "gender": "남성,여성",
        "colors": ["블랙"],
        "sizes": ["S(90)", "M(95)"],
        "kor_name": "[구찌] 구찌 백팩",
        "eng_name": "[GUCCI] GUCCI backpack",
        "genuine_number": "406370"
    }"#;

    #[tokio::test]
    async fn test_extract_parses_and_normalizes() {
        let fields = extractor_with(VALID_RESPONSE).extract("<html/>").await.unwrap();

        assert_eq!(fields.price, 1250000);
        assert_eq!(fields.brand, "GUCCI");
        assert_eq!(fields.kor_name, "구찌 백팩");
        assert_eq!(fields.eng_name, "GUCCI backpack");
        assert_eq!(fields.joined_sizes(), "S[90],M[95]");
        assert_eq!(fields.genuine_number, "406370");
    }

    #[tokio::test]
    async fn test_extract_rejects_malformed_json() {
        let result = extractor_with("I could not find a product.").extract("<html/>").await;
        assert!(matches!(result, Err(ExtractionError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_extract_rejects_missing_fields() {
        let result = extractor_with(r#"{"price": 1000}"#).extract("<html/>").await;
        assert!(matches!(result, Err(ExtractionError::InvalidJson(_))));
    }

    #[test]
    fn test_strip_bracket_prefix() {
        assert_eq!(strip_bracket_prefix("[GUCCI] 백팩"), "백팩");
        assert_eq!(strip_bracket_prefix("[퀄엔드] 구찌 백팩"), "구찌 백팩");
        assert_eq!(strip_bracket_prefix("백팩"), "백팩");
        assert_eq!(strip_bracket_prefix(""), "");
        // No trailing space after the bracket token: left untouched.
        assert_eq!(strip_bracket_prefix("[GUCCI]백팩"), "[GUCCI]백팩");
    }
}
