//! The map aggregate: hexes, the territories that label them, and the grid they sit on.
//!
//! A [`MapDefinition`] is either generated (see [`crate::world_gen`]) or loaded from
//! JSON (see [`MapDefinition::from_json`]). Once built it is treated as read-only:
//! everything derived from it is recomputed from scratch rather than patched.

use derive_more::{Display, From};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geometry::{HexCoord, HexGridConfig};

mod schema;
pub use schema::{
    DisplaySettings, RawBounds, RawGridConfig, RawHex, RawMapDefinition, RawOrigin, RawTerritory,
    CURRENT_VERSION,
};

/// The string identifier of a territory.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct TerritoryId(String);

impl TerritoryId {
    /// Creates a territory id from any string-like value.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        TerritoryId(id.into())
    }

    /// The id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TerritoryId {
    fn from(id: &str) -> Self {
        TerritoryId::new(id)
    }
}

/// A single hex of a map, with the territory that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapHex {
    /// Where the hex is.
    pub coord: HexCoord,
    /// The territory this hex belongs to, or `None` for void hexes.
    pub territory_id: Option<TerritoryId>,
}

impl MapHex {
    /// A hex owned by `territory_id`.
    #[must_use]
    pub fn new(coord: HexCoord, territory_id: impl Into<TerritoryId>) -> Self {
        MapHex {
            coord,
            territory_id: Some(territory_id.into()),
        }
    }

    /// A hex that belongs to no territory.
    #[must_use]
    pub fn void(coord: HexCoord) -> Self {
        MapHex {
            coord,
            territory_id: None,
        }
    }
}

/// A labeled region of the map.
///
/// Its footprint is the set of hexes carrying its id; it has no shape of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    /// Unique id, referenced by [`MapHex::territory_id`].
    pub id: TerritoryId,
    /// Color used by renderers, as a CSS-style string.
    pub display_color: String,
    /// The hexes owned by this territory, in map order.
    pub hex_ids: Vec<HexCoord>,
}

/// The complete description of a board.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDefinition {
    /// Stable identifier, such as `generated-37`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Schema version of the map data.
    pub version: u32,
    /// Layout shared by every hex.
    pub grid: HexGridConfig,
    /// Every hex on the board, in a stable order.
    pub hexes: Vec<MapHex>,
    /// Every territory, in declaration order.
    pub territories: Vec<Territory>,
    /// Neighboring territories of each territory.
    ///
    /// Every territory is a key, possibly with an empty list.
    pub adjacencies: IndexMap<TerritoryId, Vec<TerritoryId>>,
    /// Free-form metadata carried alongside the map.
    pub metadata: Option<serde_json::Value>,
}

impl MapDefinition {
    /// Looks up a territory by id.
    #[must_use]
    pub fn territory(&self, id: &TerritoryId) -> Option<&Territory> {
        self.territories.iter().find(|territory| &territory.id == id)
    }

    /// Display options stored in the metadata block.
    #[must_use]
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings::from_metadata(self.metadata.as_ref())
    }
}
