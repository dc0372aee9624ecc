use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lodging::LodgingPricing;

/// Service categories in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Parks,
    #[serde(rename = "Park Fees")]
    ParkFees,
    Lodging,
    Activities,
    Vehicle,
    Aviation,
    Permits,
    Extras,
    Logistics,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Parks => "Parks",
            Category::ParkFees => "Park Fees",
            Category::Lodging => "Lodging",
            Category::Activities => "Activities",
            Category::Vehicle => "Vehicle",
            Category::Aviation => "Aviation",
            Category::Permits => "Permits",
            Category::Extras => "Extras",
            Category::Logistics => "Logistics",
            Category::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

/// Pricing formula tag. Unrecognized tags deserialize to `Unknown` and
/// price to zero instead of failing the whole quote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    FixedGroup,
    FixedPerDay,
    PerPerson,
    PerPersonPerDay,
    PerNight,
    PerNightPerPerson,
    PerGuide,
    HierarchicalLodging,
    #[serde(other)]
    Unknown,
}

/// Where an item may be used: anywhere, or only on days in one park.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "appliesTo", rename_all = "camelCase")]
pub enum ItemScope {
    Global,
    #[serde(rename_all = "camelCase")]
    Park { park_id: String },
}

impl Default for ItemScope {
    fn default() -> Self {
        ItemScope::Global
    }
}

/// A priced, reusable service offering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub cost_type: CostType,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub scope: ItemScope,
    /// Seat limit for physical conveyances. May carry junk from the wire;
    /// only the capacity validator interprets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    /// Catalog-level default multiplier, overridable per itinerary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

fn default_active() -> bool {
    true
}

impl CatalogItem {
    pub fn is_hierarchical(&self) -> bool {
        self.cost_type == CostType::HierarchicalLodging
    }

    /// Parse the nested room/season/occupancy pricing table out of `metadata`.
    /// Absent or malformed tables resolve to `None`; the item then prices to
    /// zero with an explanatory breakdown line rather than failing.
    pub fn lodging_pricing(&self) -> Option<LodgingPricing> {
        match LodgingPricing::from_metadata(&self.metadata) {
            Ok(pricing) => Some(pricing),
            Err(err) => {
                if self.is_hierarchical() {
                    tracing::warn!(item_id = %self.id, %err, "lodging pricing table unusable");
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_type_wire_tags() {
        let ct: CostType = serde_json::from_str("\"per_person_per_day\"").unwrap();
        assert_eq!(ct, CostType::PerPersonPerDay);

        // Tags this build does not know about must not fail deserialization.
        let ct: CostType = serde_json::from_str("\"per_llama\"").unwrap();
        assert_eq!(ct, CostType::Unknown);
    }

    #[test]
    fn test_item_defaults() {
        let item: CatalogItem = serde_json::from_value(serde_json::json!({
            "id": "fee-001",
            "name": "Serengeti entry",
            "category": "Park Fees",
            "costType": "per_person",
        }))
        .unwrap();

        assert!(item.active);
        assert_eq!(item.scope, ItemScope::Global);
        assert_eq!(item.base_price, 0.0);
        assert!(item.capacity.is_none());
    }

    #[test]
    fn test_park_scope_round_trip() {
        let scope = ItemScope::Park {
            park_id: "serengeti".to_string(),
        };
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["appliesTo"], "park");
        assert_eq!(json["parkId"], "serengeti");

        let back: ItemScope = serde_json::from_value(json).unwrap();
        assert_eq!(back, scope);
    }

    #[test]
    fn test_lodging_pricing_absent_metadata() {
        let item: CatalogItem = serde_json::from_value(serde_json::json!({
            "id": "lodge-001",
            "name": "Kopje Lodge",
            "category": "Lodging",
            "costType": "hierarchical_lodging",
        }))
        .unwrap();

        assert!(item.lodging_pricing().is_none());
    }
}
