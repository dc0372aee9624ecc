use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use twiga_catalog::{CatalogIndex, CatalogItem, Category, CostType, ItemScope};

use crate::itinerary::{LodgingSlot, TripDay, TripDraft};
use crate::resolver::{resolve_item, resolve_lodging_selection, LineResolution};

/// One emitted pricing result. Zero-total lines stay in the list so staff
/// can see exactly what still needs configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownLine {
    pub park: String,
    pub category: Category,
    pub name: String,
    pub base_price: f64,
    pub cost_type: CostType,
    /// Only meaningful for Activities (repetition count); 1 elsewhere
    /// unless the item folded a quantity into a fixed formula.
    pub quantity: u32,
    pub total: f64,
    pub per_person: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub grand_total: f64,
    pub per_person: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub lines: Vec<BreakdownLine>,
    pub totals: QuoteTotals,
}

/// Walk the draft day by day and price every populated slot.
///
/// Pure function of the two snapshots: identical inputs produce identical
/// line ordering and totals. Dangling or out-of-park references are skipped,
/// never errors; degraded lines (excluded fees, unconfigured lodging) stay
/// visible with zero totals.
pub fn expand(trip: &TripDraft, catalog: &CatalogIndex) -> QuoteBreakdown {
    let park_nights = trip.park_nights();
    let mut expansion = Expansion {
        trip,
        catalog,
        total_park_nights: park_nights.values().sum(),
        park_nights,
        lines: Vec::new(),
    };

    for day in &trip.day_list {
        expansion.expand_day(day);
    }

    let grand_total: f64 = expansion.lines.iter().map(|line| line.total).sum();
    let per_person = if trip.travelers > 0 {
        grand_total / trip.travelers as f64
    } else {
        0.0
    };

    QuoteBreakdown {
        lines: expansion.lines,
        totals: QuoteTotals {
            grand_total,
            per_person,
        },
    }
}

struct Expansion<'a> {
    trip: &'a TripDraft,
    catalog: &'a CatalogIndex,
    park_nights: HashMap<String, u32>,
    total_park_nights: u32,
    lines: Vec<BreakdownLine>,
}

impl<'a> Expansion<'a> {
    /// Slot precedence is fixed: park fees, arrival, lodging, activities,
    /// manual lines, extras, logistics vehicle, internal movements.
    fn expand_day(&mut self, day: &TripDay) {
        for fee in &day.park_fees {
            if fee.excluded {
                if let Some(item) = self.lookup(day, &fee.item_id) {
                    let name = format!("{} — Excluded by user", item.name);
                    self.push_line(
                        day,
                        item.category,
                        name,
                        item.base_price,
                        item.cost_type,
                        LineResolution {
                            total: 0.0,
                            explanation: "excluded by user".to_string(),
                            quantity: 1,
                        },
                    );
                }
            } else {
                // A fee is evaluated once per day-slot it appears in, never
                // multiplied by the trip length.
                self.push_catalog_line(day, &fee.item_id, 1, 1);
            }
        }

        if let Some(arrival) = &day.arrival {
            self.push_catalog_line(day, arrival, self.trip.days, self.trip.days);
        }

        if let Some(slot) = &day.lodging {
            if !slot.item_id.is_empty() {
                self.expand_lodging(day, slot);
            }
        }

        for activity in &day.activities {
            self.push_catalog_line(day, activity, self.trip.days, self.trip.days);
        }

        for manual in &day.manual_lines {
            // Stray empty rows from the authoring UI carry neither text nor
            // an amount; everything else stays visible.
            if manual.description.trim().is_empty() && manual.amount == 0.0 {
                continue;
            }
            self.push_line(
                day,
                Category::Extras,
                manual.description.clone(),
                manual.amount,
                CostType::FixedGroup,
                LineResolution {
                    total: manual.amount,
                    explanation: "manual amount".to_string(),
                    quantity: 1,
                },
            );
        }

        for extra in &day.extras {
            self.push_catalog_line(day, extra, self.trip.days, self.trip.days);
        }

        if let Some(logistics) = &day.logistics {
            if let Some(vehicle) = &logistics.vehicle {
                // Vehicles bill per night of use in the day's park, not per
                // calendar day of the whole trip. A parkless logistics day
                // falls back to the trip-wide night count.
                let nights = day
                    .park_id
                    .as_ref()
                    .and_then(|park| self.park_nights.get(park).copied())
                    .unwrap_or(self.total_park_nights);
                self.push_catalog_line(day, vehicle, nights, nights);
            }
            for movement in &logistics.movements {
                self.push_catalog_line(day, movement, self.trip.days, self.trip.days);
            }
        }
    }

    fn expand_lodging(&mut self, day: &TripDay, slot: &LodgingSlot) {
        let Some(item) = self.lookup(day, &slot.item_id) else {
            return;
        };

        if item.is_hierarchical() {
            if let Some(config) = &slot.config {
                let resolution = resolve_lodging_selection(
                    config,
                    self.trip.quantity_override(&item.id),
                    self.trip.travelers,
                );
                let name = format!("{} ({})", item.name, config.display_room());
                self.push_line(day, item.category, name, item.base_price, item.cost_type, resolution);
                return;
            }
            // Selected but not yet configured: falls through to the resolver's
            // zero-total, explained line.
        }

        let resolution = resolve_item(
            item,
            self.trip.travelers,
            self.trip.days,
            self.trip.days,
            self.trip.quantity_override(&item.id),
        );
        self.push_line(
            day,
            item.category,
            item.name.clone(),
            item.base_price,
            item.cost_type,
            resolution,
        );
    }

    /// The single "find item, check scope, resolve, push" path shared by
    /// every catalog-backed slot.
    fn push_catalog_line(&mut self, day: &TripDay, item_id: &str, days: u32, nights: u32) {
        let Some(item) = self.lookup(day, item_id) else {
            return;
        };
        let resolution = resolve_item(
            item,
            self.trip.travelers,
            days,
            nights,
            self.trip.quantity_override(&item.id),
        );
        self.push_line(
            day,
            item.category,
            item.name.clone(),
            item.base_price,
            item.cost_type,
            resolution,
        );
    }

    fn lookup(&self, day: &TripDay, item_id: &str) -> Option<&'a CatalogItem> {
        let Some(item) = self.catalog.get(item_id) else {
            tracing::debug!(item_id, "catalog reference not found, skipping");
            return None;
        };
        if let ItemScope::Park { park_id } = &item.scope {
            if day.park_id.as_deref() != Some(park_id.as_str()) {
                tracing::debug!(item_id, %park_id, "park-scoped item outside its park, skipping");
                return None;
            }
        }
        Some(item)
    }

    fn push_line(
        &mut self,
        day: &TripDay,
        category: Category,
        name: String,
        base_price: f64,
        cost_type: CostType,
        resolution: LineResolution,
    ) {
        let per_person = if self.trip.travelers > 0 {
            resolution.total / self.trip.travelers as f64
        } else {
            0.0
        };
        let park = self.park_label(day);
        self.lines.push(BreakdownLine {
            park,
            category,
            name,
            base_price,
            cost_type,
            quantity: resolution.quantity,
            total: resolution.total,
            per_person,
            explanation: resolution.explanation,
        });
    }

    fn park_label(&self, day: &TripDay) -> String {
        match &day.park_id {
            Some(park_id) => self
                .catalog
                .park_name(park_id)
                .unwrap_or(park_id.as_str())
                .to_string(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::{LodgingSelection, LogisticsBlock, ManualLine, ParkFeeRef};
    use twiga_catalog::PriceBasis;

    fn item(id: &str, category: Category, cost_type: CostType, base_price: f64) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            category,
            cost_type,
            base_price,
            scope: ItemScope::Global,
            capacity: None,
            quantity: None,
            active: true,
            description: None,
            updated_at: None,
            metadata: serde_json::Value::Null,
        }
    }

    fn park(id: &str, name: &str) -> CatalogItem {
        let mut park = item(id, Category::Parks, CostType::Unknown, 0.0);
        park.name = name.to_string();
        park
    }

    fn safari_day(park_id: &str) -> TripDay {
        TripDay {
            park_id: Some(park_id.to_string()),
            ..TripDay::default()
        }
    }

    fn lodged_day(park_id: &str, lodging_id: &str) -> TripDay {
        TripDay {
            park_id: Some(park_id.to_string()),
            lodging: Some(LodgingSlot {
                item_id: lodging_id.to_string(),
                config: None,
            }),
            ..TripDay::default()
        }
    }

    #[test]
    fn test_empty_trip_prices_to_zero() {
        let trip = TripDraft::new("Empty", 4, 0);
        let result = expand(&trip, &CatalogIndex::default());
        assert!(result.lines.is_empty());
        assert_eq!(result.totals.grand_total, 0.0);
        assert_eq!(result.totals.per_person, 0.0);
    }

    #[test]
    fn test_vehicle_bills_park_nights_not_trip_days() {
        let catalog = CatalogIndex::new(vec![
            item("cruiser", Category::Vehicle, CostType::FixedPerDay, 300.0),
            item("lodge", Category::Lodging, CostType::PerGuide, 0.0),
        ]);

        // Nominal day count deliberately differs from the lodged-night count.
        let mut trip = TripDraft::new("North circuit", 4, 7);
        let mut days: Vec<TripDay> = (0..5).map(|_| lodged_day("serengeti", "lodge")).collect();
        days[0].logistics = Some(LogisticsBlock {
            vehicle: Some("cruiser".to_string()),
            movements: Vec::new(),
        });
        trip.day_list = days;

        let result = expand(&trip, &catalog);
        let vehicle = result
            .lines
            .iter()
            .find(|line| line.category == Category::Vehicle)
            .unwrap();
        assert_eq!(vehicle.total, 1500.0);
        assert!(vehicle.explanation.contains("5 days"));
    }

    #[test]
    fn test_vehicle_on_parkless_day_uses_trip_wide_nights() {
        let catalog = CatalogIndex::new(vec![
            item("cruiser", Category::Vehicle, CostType::FixedPerDay, 100.0),
            item("lodge", Category::Lodging, CostType::PerGuide, 0.0),
        ]);

        let mut trip = TripDraft::new("Split", 2, 4);
        let mut transfer_day = TripDay::default();
        transfer_day.logistics = Some(LogisticsBlock {
            vehicle: Some("cruiser".to_string()),
            movements: Vec::new(),
        });
        trip.day_list = vec![
            lodged_day("serengeti", "lodge"),
            lodged_day("ngorongoro", "lodge"),
            transfer_day,
        ];

        let result = expand(&trip, &catalog);
        let vehicle = result
            .lines
            .iter()
            .find(|line| line.category == Category::Vehicle)
            .unwrap();
        assert_eq!(vehicle.total, 200.0);
    }

    #[test]
    fn test_excluded_fee_stays_visible_at_zero() {
        let catalog = CatalogIndex::new(vec![item(
            "fee",
            Category::ParkFees,
            CostType::PerPerson,
            70.0,
        )]);

        let mut trip = TripDraft::new("Fees", 3, 2);
        let mut day = safari_day("serengeti");
        day.park_fees = vec![
            ParkFeeRef {
                item_id: "fee".to_string(),
                excluded: true,
            },
            ParkFeeRef {
                item_id: "fee".to_string(),
                excluded: false,
            },
        ];
        trip.day_list = vec![day];

        let result = expand(&trip, &catalog);
        assert_eq!(result.lines.len(), 2);

        let excluded = &result.lines[0];
        assert!(excluded.name.contains("Excluded by user"));
        assert_eq!(excluded.total, 0.0);

        // The kept fee evaluates once, not once per trip day.
        assert_eq!(result.lines[1].total, 210.0);
        assert_eq!(result.totals.grand_total, 210.0);
    }

    #[test]
    fn test_dangling_references_are_skipped() {
        let mut trip = TripDraft::new("Dangling", 2, 3);
        let mut day = safari_day("serengeti");
        day.arrival = Some("deleted-item".to_string());
        day.activities = vec!["also-gone".to_string()];
        trip.day_list = vec![day];

        let result = expand(&trip, &CatalogIndex::default());
        assert!(result.lines.is_empty());
        assert_eq!(result.totals.grand_total, 0.0);
    }

    #[test]
    fn test_park_scoped_item_skipped_outside_its_park() {
        let mut scoped = item("balloon", Category::Activities, CostType::PerPerson, 550.0);
        scoped.scope = ItemScope::Park {
            park_id: "serengeti".to_string(),
        };
        let catalog = CatalogIndex::new(vec![scoped]);

        let mut trip = TripDraft::new("Scoped", 2, 2);
        let mut wrong_park = safari_day("ngorongoro");
        wrong_park.activities = vec!["balloon".to_string()];
        let mut right_park = safari_day("serengeti");
        right_park.activities = vec!["balloon".to_string()];
        trip.day_list = vec![wrong_park, right_park];

        let result = expand(&trip, &catalog);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].total, 1100.0);
    }

    #[test]
    fn test_manual_lines_bypass_the_catalog() {
        let mut trip = TripDraft::new("Manual", 2, 1);
        let mut day = TripDay::default();
        day.manual_lines = vec![
            ManualLine {
                description: "Tip pool".to_string(),
                amount: 150.0,
            },
            ManualLine {
                description: String::new(),
                amount: 0.0,
            },
        ];
        trip.day_list = vec![day];

        let result = expand(&trip, &CatalogIndex::default());
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].category, Category::Extras);
        assert_eq!(result.lines[0].total, 150.0);
        assert_eq!(result.totals.per_person, 75.0);
    }

    #[test]
    fn lodging_per_night_uses_trip_length() {
        let catalog = CatalogIndex::new(vec![item(
            "camp",
            Category::Lodging,
            CostType::PerNightPerPerson,
            90.0,
        )]);

        let mut trip = TripDraft::new("Long stay", 2, 6);
        trip.day_list = vec![lodged_day("serengeti", "camp")];

        let result = expand(&trip, &catalog);
        // One lodging selection spans the whole trip: 90 × 2 × 6 nights.
        assert_eq!(result.lines[0].total, 1080.0);
    }

    #[test]
    fn test_configured_hierarchical_lodging_line() {
        let mut lodge = item("lodge", Category::Lodging, CostType::HierarchicalLodging, 0.0);
        lodge.name = "Kopje Lodge".to_string();
        let catalog = CatalogIndex::new(vec![lodge]);

        let mut trip = TripDraft::new("Configured", 2, 3);
        let mut day = safari_day("serengeti");
        day.lodging = Some(LodgingSlot {
            item_id: "lodge".to_string(),
            config: Some(LodgingSelection {
                room_type_id: "garden".to_string(),
                room_name: Some("Garden Room".to_string()),
                season: "high".to_string(),
                occupancy: "double".to_string(),
                price: 400.0,
                basis: PriceBasis::PerPerson,
            }),
        });
        trip.day_list = vec![day];

        let result = expand(&trip, &catalog);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].name, "Kopje Lodge (Garden Room)");
        assert_eq!(result.lines[0].total, 800.0);
    }

    #[test]
    fn test_unconfigured_hierarchical_lodging_stays_visible() {
        let catalog = CatalogIndex::new(vec![item(
            "lodge",
            Category::Lodging,
            CostType::HierarchicalLodging,
            0.0,
        )]);

        let mut trip = TripDraft::new("Unconfigured", 2, 3);
        trip.day_list = vec![lodged_day("serengeti", "lodge")];

        let result = expand(&trip, &catalog);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].total, 0.0);
        assert!(result.lines[0]
            .explanation
            .contains("requires explicit configuration"));
    }

    #[test]
    fn test_expand_is_deterministic() {
        let catalog = CatalogIndex::new(vec![
            park("serengeti", "Serengeti"),
            item("fee", Category::ParkFees, CostType::PerPerson, 70.0),
            item("game-drive", Category::Activities, CostType::PerPerson, 120.0),
            item("cruiser", Category::Vehicle, CostType::FixedPerDay, 300.0),
            item("lodge", Category::Lodging, CostType::PerNightPerPerson, 90.0),
        ]);

        let mut trip = TripDraft::new("Repeat", 4, 3);
        let mut day = lodged_day("serengeti", "lodge");
        day.park_fees = vec![ParkFeeRef {
            item_id: "fee".to_string(),
            excluded: false,
        }];
        day.activities = vec!["game-drive".to_string()];
        day.logistics = Some(LogisticsBlock {
            vehicle: Some("cruiser".to_string()),
            movements: Vec::new(),
        });
        trip.day_list = vec![day.clone(), day];

        let first = expand(&trip, &catalog);
        let second = expand(&trip, &catalog);
        assert_eq!(first, second);
        assert_eq!(first.lines[0].park, "Serengeti");
        assert!(
            (first.totals.per_person - first.totals.grand_total / 4.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_zero_travelers_zeroes_per_person_only() {
        let catalog = CatalogIndex::new(vec![item(
            "permit",
            Category::Permits,
            CostType::FixedGroup,
            500.0,
        )]);

        let mut trip = TripDraft::new("No pax yet", 0, 2);
        let mut day = TripDay::default();
        day.extras = vec!["permit".to_string()];
        trip.day_list = vec![day];

        let result = expand(&trip, &catalog);
        assert_eq!(result.totals.grand_total, 500.0);
        assert_eq!(result.totals.per_person, 0.0);
        assert_eq!(result.lines[0].per_person, 0.0);
    }
}
