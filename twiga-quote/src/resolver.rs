use twiga_catalog::{CatalogItem, Category, CostType, PriceBasis};

use crate::itinerary::LodgingSelection;

/// Outcome of pricing a single line: the amount, the audit trail for it,
/// and the quantity that took effect.
#[derive(Debug, Clone, PartialEq)]
pub struct LineResolution {
    pub total: f64,
    pub explanation: String,
    pub quantity: u32,
}

fn valid_quantity(quantity: Option<f64>) -> Option<u32> {
    match quantity {
        Some(q) if q.is_finite() && q >= 1.0 => Some(q.floor() as u32),
        _ => None,
    }
}

/// Override → catalog default → 1. Negative, zero, and non-finite values
/// fall through to the next source rather than being rejected.
pub fn effective_quantity(override_quantity: Option<f64>, default_quantity: Option<f64>) -> u32 {
    valid_quantity(override_quantity)
        .or_else(|| valid_quantity(default_quantity))
        .unwrap_or(1)
}

/// Price one catalog item against the supplied counts.
///
/// For Activities the quantity multiplies the finished total as a trailing
/// step (repeated bookings of an experience); for every other category it
/// multiplies inline in the fixed_* formulas only (units purchased). Never
/// panics: unknown and hierarchical tags price to zero with an explanation.
pub fn resolve_item(
    item: &CatalogItem,
    travelers: u32,
    days: u32,
    nights: u32,
    quantity_override: Option<f64>,
) -> LineResolution {
    let quantity = effective_quantity(quantity_override, item.quantity);
    let is_activity = item.category == Category::Activities;
    let unit_quantity = if is_activity { 1 } else { quantity };
    let base = item.base_price;

    let (mut total, mut explanation) = match item.cost_type {
        CostType::FixedGroup => (
            base * unit_quantity as f64,
            format!("{} × {} (fixed group)", base, unit_quantity),
        ),
        CostType::FixedPerDay => (
            base * days as f64 * unit_quantity as f64,
            format!("{} × {} days × {}", base, days, unit_quantity),
        ),
        CostType::PerPerson => (
            base * travelers as f64,
            format!("{} × {} travelers", base, travelers),
        ),
        CostType::PerPersonPerDay => (
            base * travelers as f64 * days as f64,
            format!("{} × {} travelers × {} days", base, travelers, days),
        ),
        CostType::PerNight => (
            base * nights as f64,
            format!("{} × {} nights", base, nights),
        ),
        CostType::PerNightPerPerson => (
            base * travelers as f64 * nights as f64,
            format!("{} × {} travelers × {} nights", base, travelers, nights),
        ),
        CostType::PerGuide => (base, format!("{} flat (per guide)", base)),
        CostType::HierarchicalLodging => (
            0.0,
            "unknown cost type (hierarchical lodging requires explicit configuration)".to_string(),
        ),
        CostType::Unknown => (0.0, "unknown cost type".to_string()),
    };

    if is_activity && quantity != 1 {
        total *= quantity as f64;
        explanation.push_str(&format!(" × {}", quantity));
    }

    LineResolution {
        total,
        explanation,
        quantity,
    }
}

/// Price a configured hierarchical-lodging selection. Per-room and
/// per-villa charges ignore the traveler count.
pub fn resolve_lodging_selection(
    selection: &LodgingSelection,
    quantity_override: Option<f64>,
    travelers: u32,
) -> LineResolution {
    let quantity = effective_quantity(quantity_override, None);
    let total = match selection.basis {
        PriceBasis::PerRoom | PriceBasis::PerVilla => selection.price * quantity as f64,
        PriceBasis::PerPerson => selection.price * travelers as f64 * quantity as f64,
    };

    let mut explanation = match selection.basis {
        PriceBasis::PerPerson => format!(
            "{} ({}, {}): {} per person × {} travelers",
            selection.display_room(),
            selection.season,
            selection.occupancy,
            selection.price,
            travelers
        ),
        basis => format!(
            "{} ({}, {}): {} {}",
            selection.display_room(),
            selection.season,
            selection.occupancy,
            selection.price,
            basis
        ),
    };
    if quantity > 1 {
        explanation.push_str(&format!(" × {}", quantity));
    }

    LineResolution {
        total,
        explanation,
        quantity,
    }
}
