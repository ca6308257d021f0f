//! Mode & quantity resolution: pure functions over the inbound request.
//!
//! Guided UI selections beat free text. Free text is matched with plain
//! lowercase substring checks (English and Spanish), which is deliberately
//! loose; the model re-validates against the catalog anyway.

use std::fmt;
use std::num::IntErrorKind;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::pairing::PairingRequest;

/// Hard ceiling for a numeric "<N> ... wines" request.
pub const MAX_REQUESTABLE_WINES: u32 = 5;

const WINE_KEYWORDS: &[&str] = &["wine", "vino"];
const CHEESE_KEYWORDS: &[&str] = &["cheese", "queso"];
const ONLY_WINE_PHRASES: &[&str] = &["only wine", "just wine", "solo vino"];
const ONLY_CHEESE_PHRASES: &[&str] = &["only cheese", "just cheese", "solo queso"];

const TWO_WINES_PHRASES: &[&str] = &[
    "two wines",
    "two red wines",
    "2 wines",
    "2 red wines",
    "dos vinos",
];
const THREE_WINES_PHRASES: &[&str] = &[
    "three wines",
    "three red wines",
    "3 wines",
    "3 red wines",
    "tres vinos",
];
const TWO_CHEESES_PHRASES: &[&str] = &["two cheeses", "2 cheeses", "dos quesos"];
const THREE_CHEESES_PHRASES: &[&str] = &["three cheeses", "3 cheeses", "tres quesos"];

/// "<N> [words...] wine(s)". Cheese has no numeric counterpart.
static NUMBERED_WINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)\s+\w*(?:\s+\w+)*\s*wines?").expect("numbered wine pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairingMode {
    WineOnly,
    CheeseOnly,
    Pairing,
}

impl PairingMode {
    /// Marker written into the prompt, e.g. `MODE: WINE_ONLY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingMode::WineOnly => "WINE_ONLY",
            PairingMode::CheeseOnly => "CHEESE_ONLY",
            PairingMode::Pairing => "PAIRING",
        }
    }
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved mode plus per-category ceilings. Told to the model in the prompt
/// and enforced again on its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingPlan {
    pub mode: PairingMode,
    pub max_wine_count: usize,
    pub max_cheese_count: usize,
}

impl PairingPlan {
    pub fn resolve(request: &PairingRequest) -> Self {
        let mode = detect_mode(request);
        Self {
            mode,
            max_wine_count: compute_max_wine_count(request, mode),
            max_cheese_count: compute_max_cheese_count(request, mode),
        }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// First match wins: selection, explicit "only" phrase, mention heuristic,
/// then full pairing.
pub fn detect_mode(request: &PairingRequest) -> PairingMode {
    let has_selected_wine = !request.selected_wines().is_empty();
    let has_selected_cheese = !request.selected_cheeses().is_empty();

    // A chosen wine with no cheese means "find me a cheese for this".
    if has_selected_wine && !has_selected_cheese {
        return PairingMode::CheeseOnly;
    }
    if has_selected_cheese && !has_selected_wine {
        return PairingMode::WineOnly;
    }

    let msg = request.message.to_lowercase();

    if contains_any(&msg, ONLY_CHEESE_PHRASES) {
        return PairingMode::CheeseOnly;
    }
    if contains_any(&msg, ONLY_WINE_PHRASES) {
        return PairingMode::WineOnly;
    }

    let mentions_wine = contains_any(&msg, WINE_KEYWORDS);
    let mentions_cheese = contains_any(&msg, CHEESE_KEYWORDS);

    match (mentions_wine, mentions_cheese) {
        (true, false) => PairingMode::WineOnly,
        (false, true) => PairingMode::CheeseOnly,
        _ => PairingMode::Pairing,
    }
}

pub fn compute_max_wine_count(request: &PairingRequest, mode: PairingMode) -> usize {
    let msg = request.message.to_lowercase();

    if let Some(caps) = NUMBERED_WINES.captures(&msg) {
        let n = match caps[1].parse::<u32>() {
            Ok(n) => n,
            // A digit run too long for u32 is still a count, just above the ceiling.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_REQUESTABLE_WINES,
            Err(_) => 0,
        };
        return n.clamp(1, MAX_REQUESTABLE_WINES) as usize;
    }

    if contains_any(&msg, TWO_WINES_PHRASES) {
        return 2;
    }
    if contains_any(&msg, THREE_WINES_PHRASES) {
        return 3;
    }

    match mode {
        PairingMode::WineOnly | PairingMode::Pairing => 1,
        PairingMode::CheeseOnly => 0,
    }
}

pub fn compute_max_cheese_count(request: &PairingRequest, mode: PairingMode) -> usize {
    let msg = request.message.to_lowercase();

    if contains_any(&msg, TWO_CHEESES_PHRASES) {
        return 2;
    }
    if contains_any(&msg, THREE_CHEESES_PHRASES) {
        return 3;
    }

    match mode {
        PairingMode::CheeseOnly | PairingMode::Pairing => 1,
        PairingMode::WineOnly => 0,
    }
}
