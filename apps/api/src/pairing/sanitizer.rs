//! Result Sanitizer: turns whatever the model said into a bounded response.
//!
//! Order matters: fallback on failure, structured parse (raw prose on parse
//! failure), then count clamp and mode exclusivity on parsed output only.

use serde::Deserialize;
use tracing::warn;

use crate::llm_client::LlmError;
use crate::models::pairing::PairingResponse;
use crate::pairing::mode::{PairingMode, PairingPlan};

/// The model's structured guess. Unknown extra fields are ignored; null or
/// missing id lists read as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPairingResult {
    pub answer: Option<String>,
    pub recommended_wine_ids: Option<Vec<String>>,
    pub recommended_cheese_ids: Option<Vec<String>>,
}

/// Apology shown when no usable answer came back.
pub fn fallback_answer(locale: &str) -> &'static str {
    let locale = locale.to_ascii_lowercase();
    if locale.starts_with("es") {
        "Lo siento, no pude generar una recomendación en este momento."
    } else if locale.starts_with("fr") {
        "Désolé, je n'ai pas pu générer de recommandation pour le moment."
    } else {
        "Sorry, I could not generate a recommendation at this time."
    }
}

pub fn fallback_response(locale: &str) -> PairingResponse {
    PairingResponse {
        answer: fallback_answer(locale).to_string(),
        recommended_wine_ids: Vec::new(),
        recommended_cheese_ids: Vec::new(),
    }
}

/// Sanitizes a completion outcome against the resolved plan.
pub fn sanitize(
    completion: Result<String, LlmError>,
    plan: &PairingPlan,
    locale: &str,
) -> PairingResponse {
    let raw = match completion {
        Ok(text) => text,
        Err(e) => {
            warn!("Completion unavailable, using fallback answer: {e}");
            return fallback_response(locale);
        }
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return fallback_response(locale);
    }

    let parsed = match serde_json::from_str::<AiPairingResult>(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Model output is not the expected JSON, returning it as plain text: {e}");
            return PairingResponse {
                answer: raw.to_string(),
                recommended_wine_ids: Vec::new(),
                recommended_cheese_ids: Vec::new(),
            };
        }
    };

    let Some(answer) = parsed.answer else {
        warn!("Model JSON carried no answer, using fallback answer");
        return fallback_response(locale);
    };

    let mut wine_ids = parsed.recommended_wine_ids.unwrap_or_default();
    let mut cheese_ids = parsed.recommended_cheese_ids.unwrap_or_default();

    wine_ids.truncate(plan.max_wine_count);
    cheese_ids.truncate(plan.max_cheese_count);

    match plan.mode {
        PairingMode::WineOnly => cheese_ids.clear(),
        PairingMode::CheeseOnly => wine_ids.clear(),
        PairingMode::Pairing => {}
    }

    PairingResponse {
        answer,
        recommended_wine_ids: wine_ids,
        recommended_cheese_ids: cheese_ids,
    }
}
