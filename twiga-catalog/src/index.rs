use std::collections::HashMap;

use crate::item::{CatalogItem, Category, CostType};

/// Id-keyed read view over one catalog snapshot.
///
/// The snapshot is immutable for the duration of a computation; input
/// ordering is irrelevant and duplicate ids resolve to the last occurrence.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    items: HashMap<String, CatalogItem>,
}

impl CatalogIndex {
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self { items }
    }

    /// Look up an item by id. Inactive items still resolve so that saved
    /// itineraries referencing them keep pricing.
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display name for a park reference, when the park itself is cataloged.
    pub fn park_name(&self, park_id: &str) -> Option<&str> {
        self.items
            .get(park_id)
            .filter(|item| item.category == Category::Parks)
            .map(|item| item.name.as_str())
    }

    /// Active same-category, same-cost-type items whose declared capacity is
    /// valid and at least `min_capacity`, smallest sufficient option first.
    pub fn alternatives_with_capacity(
        &self,
        category: Category,
        cost_type: CostType,
        min_capacity: f64,
        exclude_id: &str,
    ) -> Vec<&CatalogItem> {
        let mut alternatives: Vec<&CatalogItem> = self
            .items
            .values()
            .filter(|item| {
                item.active
                    && item.id != exclude_id
                    && item.category == category
                    && item.cost_type == cost_type
                    && matches!(item.capacity, Some(c) if c.is_finite() && c >= min_capacity)
            })
            .collect();

        alternatives.sort_by(|a, b| {
            a.capacity
                .partial_cmp(&b.capacity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        alternatives
    }
}
