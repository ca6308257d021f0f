//! Pairing Orchestrator: sequences the chat pipeline for one request.
//!
//! Flow: fetch catalog → resolve mode/maxima → build prompt → one completion
//! attempt → sanitize → respond, with the audit write spawned off the
//! response path.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::audit::PairingLogStore;
use crate::catalog::{fetch_catalog, CatalogSnapshot, CatalogSource};
use crate::llm_client::CompletionClient;
use crate::models::pairing::{PairingRequest, PairingResponse};
use crate::models::pairing_log::NewPairingLog;
use crate::pairing::mode::PairingPlan;
use crate::pairing::prompts::{build_user_prompt, ListingOrder, PAIRING_SYSTEM};
use crate::pairing::sanitizer::sanitize;

/// Stateless across requests; every collaborator is shared behind an `Arc`
/// and must tolerate concurrent use.
pub struct PairingService {
    catalog: Arc<dyn CatalogSource>,
    llm: Arc<dyn CompletionClient>,
    logs: Arc<dyn PairingLogStore>,
    order: Arc<dyn ListingOrder>,
}

impl PairingService {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        llm: Arc<dyn CompletionClient>,
        logs: Arc<dyn PairingLogStore>,
        order: Arc<dyn ListingOrder>,
    ) -> Self {
        Self {
            catalog,
            llm,
            logs,
            order,
        }
    }

    /// Runs the pipeline. Never fails: collaborator problems degrade to a
    /// fallback answer, and audit problems are only logged.
    pub async fn chat(&self, request: PairingRequest) -> PairingResponse {
        let locale = request.locale().to_string();

        // Step 1: Catalog snapshot (wines and cheeses fetched concurrently)
        let catalog = fetch_catalog(self.catalog.as_ref()).await;

        // Step 2: Mode and maxima
        let plan = PairingPlan::resolve(&request);
        debug!(
            "Resolved plan: mode={} max_wines={} max_cheeses={}",
            plan.mode, plan.max_wine_count, plan.max_cheese_count
        );

        // Step 3: Prompt
        let prompt = build_user_prompt(&request, &plan, &catalog, self.order.as_ref());

        // Step 4: Single completion attempt; failure is handled by the sanitizer
        let completion = self.llm.complete(PAIRING_SYSTEM, &prompt).await;

        // Step 5: Sanitize
        let response = sanitize(completion, &plan, &locale);
        report_unknown_ids(&catalog, &response);

        info!(
            "Pairing answered: mode={} wines={} cheeses={}",
            plan.mode,
            response.recommended_wine_ids.len(),
            response.recommended_cheese_ids.len()
        );

        // Step 6: Audit, off the response path
        self.record(NewPairingLog::from_exchange(&request, &response));

        response
    }

    fn record(&self, log: NewPairingLog) {
        let logs = Arc::clone(&self.logs);
        tokio::spawn(async move {
            if let Err(e) = logs.save(log).await {
                warn!("Failed to persist pairing log: {e}");
            }
        });
    }
}

/// Model-returned ids are trusted as-is; ids missing from the snapshot are
/// only reported.
fn report_unknown_ids(catalog: &CatalogSnapshot, response: &PairingResponse) {
    let unknown_wines = response
        .recommended_wine_ids
        .iter()
        .filter(|id| !catalog.has_wine(id))
        .count();
    let unknown_cheeses = response
        .recommended_cheese_ids
        .iter()
        .filter(|id| !catalog.has_cheese(id))
        .count();

    if unknown_wines + unknown_cheeses > 0 {
        warn!(
            "Model recommended ids outside the catalog snapshot: {} wines, {} cheeses",
            unknown_wines, unknown_cheeses
        );
    }
}
