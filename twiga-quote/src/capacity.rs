use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use twiga_catalog::{CatalogIndex, CatalogItem, Category, CostType};

use crate::resolver::effective_quantity;

/// A same-category, same-cost-type replacement candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeItem {
    pub item_id: String,
    pub name: String,
    pub capacity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum RemediationAction {
    #[serde(rename_all = "camelCase")]
    IncreaseQuantity { required_quantity: u32 },
    #[serde(rename_all = "camelCase")]
    ReplaceItem { alternatives: Vec<AlternativeItem> },
}

/// One feasibility finding. Capacity 0 with no actions marks a catalog
/// data-quality gap (declared but unusable capacity).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacityIssue {
    pub item_id: String,
    pub travelers: u32,
    pub capacity: f64,
    pub quantity: u32,
    pub actions: Vec<RemediationAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacityReport {
    pub is_valid: bool,
    pub issues: Vec<CapacityIssue>,
}

fn is_conveyance(item: &CatalogItem) -> bool {
    matches!(item.cost_type, CostType::FixedGroup | CostType::FixedPerDay)
        && matches!(
            item.category,
            Category::Vehicle | Category::Aviation | Category::Logistics
        )
}

/// Check that every selected physical conveyance can actually seat the
/// group. Advisory only: never blocks pricing, always a second pass over
/// the same itinerary.
pub fn validate_capacity(
    travelers: u32,
    selected_ids: &[String],
    catalog: &CatalogIndex,
    quantity_overrides: &HashMap<String, f64>,
) -> CapacityReport {
    let mut issues = Vec::new();

    if travelers >= 1 {
        let mut seen = HashSet::new();
        for id in selected_ids {
            // One conveyance referenced twice is one feasibility question.
            if !seen.insert(id.as_str()) {
                continue;
            }
            let Some(item) = catalog.get(id) else {
                continue;
            };
            if !is_conveyance(item) {
                continue;
            }
            let Some(declared) = item.capacity else {
                continue;
            };

            let quantity =
                effective_quantity(quantity_overrides.get(id).copied(), item.quantity);

            if !declared.is_finite() || declared <= 0.0 {
                tracing::warn!(item_id = %item.id, declared, "declared capacity is unusable");
                issues.push(CapacityIssue {
                    item_id: item.id.clone(),
                    travelers,
                    capacity: 0.0,
                    quantity,
                    actions: Vec::new(),
                });
                continue;
            }

            if travelers as f64 > declared * quantity as f64 {
                let required_quantity = (travelers as f64 / declared).ceil() as u32;
                let alternatives = catalog
                    .alternatives_with_capacity(
                        item.category,
                        item.cost_type,
                        travelers as f64,
                        &item.id,
                    )
                    .into_iter()
                    .map(|alt| AlternativeItem {
                        item_id: alt.id.clone(),
                        name: alt.name.clone(),
                        capacity: alt.capacity.unwrap_or(0.0),
                    })
                    .collect();

                issues.push(CapacityIssue {
                    item_id: item.id.clone(),
                    travelers,
                    capacity: declared,
                    quantity,
                    actions: vec![
                        RemediationAction::IncreaseQuantity { required_quantity },
                        RemediationAction::ReplaceItem { alternatives },
                    ],
                });
            }
        }
    }

    CapacityReport {
        is_valid: issues.is_empty(),
        issues,
    }
}
