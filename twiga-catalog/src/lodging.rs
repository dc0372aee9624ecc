use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a resolved lodging rate is charged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PriceBasis {
    PerPerson,
    PerRoom,
    PerVilla,
}

impl std::fmt::Display for PriceBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PriceBasis::PerPerson => "per person",
            PriceBasis::PerRoom => "per room",
            PriceBasis::PerVilla => "per villa",
        };
        write!(f, "{}", label)
    }
}

/// A normalized rate cell: one basis, one amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub basis: PriceBasis,
    pub amount: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("lodging metadata missing or not an object")]
    MissingLodgingMetadata,

    #[error("lodging metadata malformed: {0}")]
    MalformedLodgingMetadata(#[from] serde_json::Error),
}

/// Wire form of one rate cell: either a bare number (read as per-person)
/// or an object carrying at most one of perRoom / perPerson / perVilla.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawRate {
    Bare(f64),
    #[serde(rename_all = "camelCase")]
    Detailed {
        #[serde(default)]
        per_room: Option<f64>,
        #[serde(default)]
        per_person: Option<f64>,
        #[serde(default)]
        per_villa: Option<f64>,
    },
}

impl RawRate {
    fn normalize(&self) -> Option<Rate> {
        match self {
            RawRate::Bare(amount) => Some(Rate {
                basis: PriceBasis::PerPerson,
                amount: *amount,
            }),
            RawRate::Detailed {
                per_room,
                per_person,
                per_villa,
            } => {
                if let Some(amount) = per_room {
                    Some(Rate {
                        basis: PriceBasis::PerRoom,
                        amount: *amount,
                    })
                } else if let Some(amount) = per_person {
                    Some(Rate {
                        basis: PriceBasis::PerPerson,
                        amount: *amount,
                    })
                } else if let Some(amount) = per_villa {
                    Some(Rate {
                        basis: PriceBasis::PerVilla,
                        amount: *amount,
                    })
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoom {
    id: String,
    name: String,
    #[serde(default)]
    max_occupancy: Option<u32>,
    #[serde(default)]
    pricing: BTreeMap<String, BTreeMap<String, RawRate>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLodging {
    rooms: Vec<RawRoom>,
    #[serde(default)]
    seasons: BTreeMap<String, String>,
}

/// One room type with its season → occupancy rate table
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomDefinition {
    pub id: String,
    pub name: String,
    pub max_occupancy: Option<u32>,
    pub pricing: BTreeMap<String, BTreeMap<String, Rate>>,
}

/// The full room × season × occupancy pricing table of one lodging item.
/// Season entries are presentational; season selection arrives with the
/// itinerary-side configuration, never from dates.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LodgingPricing {
    pub rooms: Vec<RoomDefinition>,
    pub seasons: BTreeMap<String, String>,
}

impl LodgingPricing {
    /// Parse and normalize the table out of a catalog item's raw metadata.
    pub fn from_metadata(metadata: &serde_json::Value) -> Result<Self, CatalogError> {
        if !metadata.is_object() {
            return Err(CatalogError::MissingLodgingMetadata);
        }

        let raw: RawLodging = serde_json::from_value(metadata.clone())?;
        let rooms = raw
            .rooms
            .into_iter()
            .map(|room| {
                let pricing = room
                    .pricing
                    .into_iter()
                    .map(|(season, occupancies)| {
                        let cells = occupancies
                            .into_iter()
                            .filter_map(|(occupancy, rate)| {
                                rate.normalize().map(|rate| (occupancy, rate))
                            })
                            .collect();
                        (season, cells)
                    })
                    .collect();
                RoomDefinition {
                    id: room.id,
                    name: room.name,
                    max_occupancy: room.max_occupancy,
                    pricing,
                }
            })
            .collect();

        Ok(LodgingPricing {
            rooms,
            seasons: raw.seasons,
        })
    }

    pub fn room(&self, room_id: &str) -> Option<&RoomDefinition> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    /// Resolve one rate cell. Any missing key resolves to None, which
    /// downstream prices as zero.
    pub fn rate_for(&self, room_id: &str, season: &str, occupancy: &str) -> Option<Rate> {
        self.room(room_id)?.pricing.get(season)?.get(occupancy).copied()
    }
}
