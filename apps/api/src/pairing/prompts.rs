//! Prompt constants and prompt assembly for the pairing chat.

use rand::seq::SliceRandom;

use crate::catalog::CatalogSnapshot;
use crate::models::pairing::PairingRequest;
use crate::pairing::mode::PairingPlan;

/// Most items per category listed in a single prompt.
pub const MAX_LISTED_ITEMS: usize = 50;

/// Fixed system instruction: persona, catalog-only rule, MODE/MAX markers,
/// no ids in prose, diversity, and the exact JSON output shape.
pub const PAIRING_SYSTEM: &str = r#"You are the AI sommelier of the Saveurs Maison app.

Your job is to recommend wine and/or cheese using ONLY products from our catalog.

VERY IMPORTANT:
- The user message includes a line "MODE: WINE_ONLY", "MODE: CHEESE_ONLY" or "MODE: PAIRING".
- You MUST respect this MODE. Do NOT try to infer a different mode.
- The user message also includes:
  - "MAX_WINE_COUNT: N"
  - "MAX_CHEESE_COUNT: M"
  You MUST NEVER return more than N wines or more than M cheeses.

BEHAVIOUR BY MODE:

1) MODE = CHEESE_ONLY
- Recommend ONLY cheeses from the catalog.
- "recommendedCheeseIds" must contain one or more IDs (up to MAX_CHEESE_COUNT).
- "recommendedWineIds" MUST be an empty array [].
- In the "answer" you may mention the wine the user already chose, but you MUST NOT
  introduce any new wine from the catalog.

2) MODE = WINE_ONLY
- Recommend ONLY wines from the catalog.
- "recommendedWineIds" must contain one or more IDs (up to MAX_WINE_COUNT).
- "recommendedCheeseIds" MUST be an empty array [].
- In the "answer" you may mention the cheese the user already chose, but you MUST NOT
  introduce any new cheese from the catalog.

3) MODE = PAIRING
- Recommend BOTH wine(s) and cheese(s), never more than MAX_WINE_COUNT / MAX_CHEESE_COUNT.

DIVERSITY:
- If several products fit the request, do NOT always recommend the same one.
- Alternate between products of the same style, region or grape when possible.

GENERAL RULES:
- Answer in a friendly but concise tone.
- ONLY use wines and cheeses that appear in the catalog list provided.
- In the "answer" text you MUST NOT show product IDs. Use product names only
  (e.g. "Pinot Noir Reserve 2022", "Brie de Meaux AOP").
- Product IDs go ONLY in "recommendedWineIds" and "recommendedCheeseIds", and must match
  the products you mention in the answer.
- If the user asks for something we don't have, suggest the closest style from our catalog.

OUTPUT FORMAT:
- Respond ONLY with a single JSON object. No markdown, no explanation, no extra text.
- The JSON MUST have exactly these fields:
  {
    "answer": "final answer text in the user's language",
    "recommendedWineIds": ["id1", "id2"],
    "recommendedCheeseIds": ["id3", "id4"]
  }
- If you do not recommend any wine or any cheese, use an empty array [] for that field.
- Do NOT add any other fields."#;

/// Per-request instruction, filled by `build_user_prompt`: {locale}, {mode}, {max_wine_count},
/// {max_cheese_count}, {wines}, {cheeses}, {selections}, {message}
pub const PAIRING_PROMPT_TEMPLATE: &str = r#"User language (use this language in 'answer'): {locale}
MODE: {mode}
MAX_WINE_COUNT: {max_wine_count}
MAX_CHEESE_COUNT: {max_cheese_count}
User message: {message}
{selections}
Here is the list of AVAILABLE WINES in the catalog (ID, name, type, price):
{wines}

Here is the list of AVAILABLE CHEESES in the catalog (ID, name, price):
{cheeses}

TASK:
You MUST respect the MODE above (WINE_ONLY, CHEESE_ONLY or PAIRING) when deciding whether to recommend wines, cheeses, or both.
You MUST also respect MAX_WINE_COUNT and MAX_CHEESE_COUNT:
- Never return more than MAX_WINE_COUNT items in "recommendedWineIds".
- Never return more than MAX_CHEESE_COUNT items in "recommendedCheeseIds".
Please recommend using ONLY the products above.
You MUST respond ONLY with a single JSON object with this structure:
{
  "answer": "final answer text in the user's language",
  "recommendedWineIds": ["id1", "id2"],
  "recommendedCheeseIds": ["id3", "id4"]
}
If you don't want to recommend any product, use an empty array [].
Do NOT include any extra text outside the JSON."#;

/// Decides the order catalog items are listed in. Production shuffles so
/// repeated identical requests don't keep surfacing the same products.
pub trait ListingOrder: Send + Sync {
    /// A permutation of `0..len`.
    fn arrange(&self, len: usize) -> Vec<usize>;
}

/// Unseeded shuffle via the thread-local RNG.
pub struct ShuffledOrder;

impl ListingOrder for ShuffledOrder {
    fn arrange(&self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut rand::thread_rng());
        order
    }
}

/// Catalog order, unchanged.
#[cfg(test)]
pub struct CatalogOrder;

#[cfg(test)]
impl ListingOrder for CatalogOrder {
    fn arrange(&self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

fn listing<T>(items: &[T], order: &dyn ListingOrder, line: impl Fn(&T) -> String) -> String {
    order
        .arrange(items.len())
        .into_iter()
        .filter_map(|i| items.get(i))
        .take(MAX_LISTED_ITEMS)
        .map(line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn selections(request: &PairingRequest) -> String {
    let mut lines = String::new();
    if !request.selected_wines().is_empty() {
        lines.push_str(&format!(
            "Selected wine IDs: [{}]\n",
            request.selected_wines().join(", ")
        ));
    }
    if !request.selected_cheeses().is_empty() {
        lines.push_str(&format!(
            "Selected cheese IDs: [{}]\n",
            request.selected_cheeses().join(", ")
        ));
    }
    lines
}

/// Substitutes every `{key}` in `template` in a single left-to-right scan.
/// Substituted values are copied through as-is and never re-scanned, so
/// braces inside user text, ids, or catalog names stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_brace = &rest[open + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            after_brace
                .strip_prefix(*key)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });
        match hit {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after_brace;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Builds the user instruction from the resolved plan, the request, and the
/// catalog snapshot.
pub fn build_user_prompt(
    request: &PairingRequest,
    plan: &PairingPlan,
    catalog: &CatalogSnapshot,
    order: &dyn ListingOrder,
) -> String {
    let wines = listing(&catalog.wines, order, |w| {
        format!(
            "- id={} | name={} | type={} | price={:.2}",
            w.id,
            w.display_name(),
            w.display_type(),
            w.display_price()
        )
    });
    let cheeses = listing(&catalog.cheeses, order, |c| {
        format!(
            "- id={} | name={} | price={:.2}",
            c.id,
            c.display_name(),
            c.display_price()
        )
    });
    let max_wine_count = plan.max_wine_count.to_string();
    let max_cheese_count = plan.max_cheese_count.to_string();
    let selected = selections(request);

    fill_template(
        PAIRING_PROMPT_TEMPLATE,
        &[
            ("locale", request.locale()),
            ("mode", plan.mode.as_str()),
            ("max_wine_count", max_wine_count.as_str()),
            ("max_cheese_count", max_cheese_count.as_str()),
            ("message", request.message.as_str()),
            ("selections", selected.as_str()),
            ("wines", wines.as_str()),
            ("cheeses", cheeses.as_str()),
        ],
    )
}
