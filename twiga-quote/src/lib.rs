pub mod capacity;
pub mod expander;
pub mod itinerary;
pub mod markup;
pub mod resolver;
pub mod scenario;

pub use capacity::{validate_capacity, CapacityIssue, CapacityReport, RemediationAction};
pub use expander::{expand, BreakdownLine, QuoteBreakdown, QuoteTotals};
pub use itinerary::{LodgingSelection, TripDay, TripDraft};
pub use markup::{apply_markups, MarkupBreakdown, MarkupParams};
pub use scenario::{compare_scenarios, Scenario, ScenarioError, ScenarioOutcome};
