use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use twiga_catalog::CatalogIndex;

use crate::expander::{expand, QuoteBreakdown};
use crate::itinerary::TripDraft;
use crate::markup::{apply_markups, MarkupBreakdown, MarkupParams};

/// One itinerary variant to price side by side with the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub trip: TripDraft,
    #[serde(default)]
    pub markups: MarkupParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub id: Uuid,
    pub name: String,
    pub breakdown: QuoteBreakdown,
    pub markups: MarkupBreakdown,
    pub compared_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("no scenarios to compare")]
    NoScenarios,
}

/// Run the full pipeline (expand → markups) independently per variant.
/// Contains no pricing logic of its own; variants share one catalog
/// snapshot and never interact.
pub fn compare_scenarios(
    catalog: &CatalogIndex,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioOutcome>, ScenarioError> {
    if scenarios.is_empty() {
        return Err(ScenarioError::NoScenarios);
    }

    let compared_at = Utc::now();
    Ok(scenarios
        .iter()
        .map(|scenario| {
            let breakdown = expand(&scenario.trip, catalog);
            let markups = apply_markups(
                breakdown.totals.grand_total,
                &scenario.markups,
                scenario.trip.travelers,
            );
            ScenarioOutcome {
                id: Uuid::new_v4(),
                name: scenario.name.clone(),
                breakdown,
                markups,
                compared_at,
            }
        })
        .collect())
}
