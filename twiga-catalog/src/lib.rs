pub mod index;
pub mod item;
pub mod lodging;

pub use index::CatalogIndex;
pub use item::{CatalogItem, Category, CostType, ItemScope};
pub use lodging::{CatalogError, LodgingPricing, PriceBasis, Rate, RoomDefinition};
