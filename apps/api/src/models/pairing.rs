use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "en";

/// Inbound chat request from the BFF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingRequest {
    #[serde(default)]
    pub message: String,
    pub locale: Option<String>,
    pub user_id: Option<String>,
    /// Ids the caller already committed to in a guided UI flow.
    pub selected_wine_ids: Option<Vec<String>>,
    pub selected_cheese_ids: Option<Vec<String>>,
}

impl PairingRequest {
    /// Requested locale, `en` when absent or blank.
    pub fn locale(&self) -> &str {
        match self.locale.as_deref().map(str::trim) {
            Some(locale) if !locale.is_empty() => locale,
            _ => DEFAULT_LOCALE,
        }
    }

    /// Absent and empty selections are the same thing.
    pub fn selected_wines(&self) -> &[String] {
        self.selected_wine_ids.as_deref().unwrap_or_default()
    }

    pub fn selected_cheeses(&self) -> &[String] {
        self.selected_cheese_ids.as_deref().unwrap_or_default()
    }
}

/// Outbound chat response. Identical to what gets written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingResponse {
    pub answer: String,
    pub recommended_wine_ids: Vec<String>,
    pub recommended_cheese_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_camel_case_fields() {
        let json = serde_json::json!({
            "message": "pair something with this",
            "locale": "es",
            "userId": "u-1",
            "selectedCheeseIds": ["c1"]
        });
        let request: PairingRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.locale(), "es");
        assert_eq!(request.user_id.as_deref(), Some("u-1"));
        assert_eq!(request.selected_cheeses(), ["c1".to_string()]);
        assert!(request.selected_wines().is_empty());
    }

    #[test]
    fn test_locale_defaults_to_en_when_missing_or_blank() {
        let mut request = PairingRequest::default();
        assert_eq!(request.locale(), "en");
        request.locale = Some("  ".to_string());
        assert_eq!(request.locale(), "en");
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = PairingResponse {
            answer: "Try the Malbec.".to_string(),
            recommended_wine_ids: vec!["w1".to_string()],
            recommended_cheese_ids: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recommendedWineIds"][0], "w1");
        assert!(json["recommendedCheeseIds"].as_array().unwrap().is_empty());
    }
}
