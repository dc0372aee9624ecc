use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use twiga_catalog::{PriceBasis, Rate, RoomDefinition};

/// A park-fee slot. Excluded fees stay visible on the quote as zeroed lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkFeeRef {
    pub item_id: String,
    #[serde(default)]
    pub excluded: bool,
}

/// A user-made selection against a hierarchical lodging item for one day.
/// Carries the unit price resolved from the room table at selection time;
/// this is the only way hierarchical pricing produces a non-zero total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LodgingSelection {
    pub room_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    pub season: String,
    pub occupancy: String,
    pub price: f64,
    pub basis: PriceBasis,
}

impl LodgingSelection {
    /// Build a selection from a rate cell looked up in the catalog table.
    pub fn from_rate(room: &RoomDefinition, season: &str, occupancy: &str, rate: Rate) -> Self {
        Self {
            room_type_id: room.id.clone(),
            room_name: Some(room.name.clone()),
            season: season.to_string(),
            occupancy: occupancy.to_string(),
            price: rate.amount,
            basis: rate.basis,
        }
    }

    pub fn display_room(&self) -> &str {
        self.room_name.as_deref().unwrap_or(&self.room_type_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LodgingSlot {
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<LodgingSelection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub movements: Vec<String>,
}

/// A manually entered cost line bypassing the catalog entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManualLine {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub park_id: Option<String>,
    #[serde(default)]
    pub park_fees: Vec<ParkFeeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lodging: Option<LodgingSlot>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistics: Option<LogisticsBlock>,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(default)]
    pub manual_lines: Vec<ManualLine>,
}

impl TripDay {
    fn has_lodging(&self) -> bool {
        self.lodging
            .as_ref()
            .map(|slot| !slot.item_id.is_empty())
            .unwrap_or(false)
    }
}

/// The quotation being priced. The engine only ever reads a snapshot;
/// authoring happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default)]
    pub travelers: u32,
    #[serde(default)]
    pub days: u32,
    #[serde(default)]
    pub day_list: Vec<TripDay>,
    /// Per-item quantity overrides, superseding catalog defaults wherever
    /// the item is referenced. Junk values normalize away downstream.
    #[serde(default)]
    pub item_quantities: HashMap<String, f64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl TripDraft {
    pub fn new(name: &str, travelers: u32, days: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            tier: None,
            travelers,
            days,
            day_list: Vec::new(),
            item_quantities: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn quantity_override(&self, item_id: &str) -> Option<f64> {
        self.item_quantities.get(item_id).copied()
    }

    /// Nights are derived, not stored: a park accrues one night for every
    /// day in that park carrying a lodging reference.
    pub fn park_nights(&self) -> HashMap<String, u32> {
        let mut nights: HashMap<String, u32> = HashMap::new();
        for day in &self.day_list {
            if let Some(park_id) = &day.park_id {
                if day.has_lodging() {
                    *nights.entry(park_id.clone()).or_insert(0) += 1;
                }
            }
        }
        nights
    }

    pub fn total_park_nights(&self) -> u32 {
        self.park_nights().values().sum()
    }

    /// Every catalog id referenced anywhere in the draft, first-seen order,
    /// de-duplicated. Feed for the capacity validator.
    pub fn selected_item_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut push = |id: &str| {
            if !id.is_empty() && seen.insert(id.to_string()) {
                ids.push(id.to_string());
            }
        };

        for day in &self.day_list {
            for fee in &day.park_fees {
                push(&fee.item_id);
            }
            if let Some(arrival) = &day.arrival {
                push(arrival);
            }
            if let Some(slot) = &day.lodging {
                push(&slot.item_id);
            }
            for activity in &day.activities {
                push(activity);
            }
            for extra in &day.extras {
                push(extra);
            }
            if let Some(logistics) = &day.logistics {
                if let Some(vehicle) = &logistics.vehicle {
                    push(vehicle);
                }
                for movement in &logistics.movements {
                    push(movement);
                }
            }
        }
        ids
    }
}
