//! The on-disk map schema, and its conversion to and from [`MapDefinition`].
//!
//! Raw types mirror the JSON exactly; [`RawMapDefinition::process`] validates them
//! and produces the map used everywhere else.

use std::collections::BTreeSet;
use std::path::Path;

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjacency::{adjacency_lists, resolve_adjacency_for};
use crate::error::{ConfigError, MapDataError, MapError};
use crate::geometry::{GridBounds, HexCoord, HexGridConfig, Orientation};

use super::{MapDefinition, MapHex, Territory, TerritoryId};

/// The map schema version written by this crate.
pub const CURRENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// A map exactly as it appears in a map file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMapDefinition {
    /// Stable identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Grid layout.
    pub grid: RawGridConfig,
    /// Hex records. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hexes: Option<Vec<RawHex>>,
    /// Territory records. Required; older files call this `states`.
    #[serde(default, alias = "states", skip_serializing_if = "Option::is_none")]
    pub territories: Option<Vec<RawTerritory>>,
    /// Stored adjacency lists. Derived from the hexes when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacencies: Option<IndexMap<String, Vec<String>>>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// The grid block of a map file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGridConfig {
    /// `"pointy"` or `"flat"`.
    pub orientation: String,
    /// Center-to-corner distance.
    pub hex_size: f64,
    /// The hex drawn at world `(0, 0)`.
    #[serde(default)]
    pub origin: RawOrigin,
    /// Optional coordinate limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<RawBounds>,
}

/// Axial origin of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawOrigin {
    /// `q` of the origin hex.
    pub q: i32,
    /// `r` of the origin hex.
    pub r: i32,
}

/// Coordinate limits of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBounds {
    /// Smallest allowed `q`.
    pub min_q: i32,
    /// Largest allowed `q`.
    pub max_q: i32,
    /// Smallest allowed `r`.
    pub min_r: i32,
    /// Largest allowed `r`.
    pub max_r: i32,
}

/// One hex record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHex {
    /// Axial `q`.
    pub q: i32,
    /// Axial `r`.
    pub r: i32,
    /// Cube `s`; must equal `-q - r`. Derived when omitted.
    #[serde(default)]
    pub s: Option<i32>,
    /// Owning territory, `null` for void hexes.
    #[serde(default)]
    pub territory_id: Option<String>,
}

/// One territory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTerritory {
    /// Unique id.
    pub id: String,
    /// Renderer color.
    #[serde(default)]
    pub display_color: String,
    /// `"q,r"` ids of the owned hexes. Derived from the hex labels when empty.
    #[serde(default)]
    pub hex_ids: Vec<String>,
}

/// Display options resolved from a map's metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Should renderers draw territory names?
    pub show_territory_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            show_territory_labels: true,
        }
    }
}

impl DisplaySettings {
    /// Reads `display.showTerritoryLabels`, falling back to a flat `showTerritoryLabels`.
    #[must_use]
    pub fn from_metadata(metadata: Option<&serde_json::Value>) -> Self {
        let Some(metadata) = metadata else {
            return DisplaySettings::default();
        };

        let show_territory_labels = metadata
            .pointer("/display/showTerritoryLabels")
            .and_then(serde_json::Value::as_bool)
            .or_else(|| {
                metadata
                    .get("showTerritoryLabels")
                    .and_then(serde_json::Value::as_bool)
            })
            .unwrap_or(DisplaySettings::default().show_territory_labels);

        DisplaySettings {
            show_territory_labels,
        }
    }
}

impl RawGridConfig {
    /// Validates the grid block.
    pub fn process(&self) -> Result<HexGridConfig, ConfigError> {
        let orientation: Orientation = self.orientation.parse()?;
        let config = HexGridConfig::new(orientation, self.hex_size)?
            .with_origin(HexCoord::new(self.origin.q, self.origin.r));

        match self.bounds {
            Some(bounds) => config.with_bounds(GridBounds {
                min_q: bounds.min_q,
                max_q: bounds.max_q,
                min_r: bounds.min_r,
                max_r: bounds.max_r,
            }),
            None => Ok(config),
        }
    }
}

impl From<&HexGridConfig> for RawGridConfig {
    fn from(config: &HexGridConfig) -> Self {
        let origin = config.origin();

        RawGridConfig {
            orientation: config.orientation().to_string(),
            hex_size: config.hex_size(),
            origin: RawOrigin {
                q: origin.q(),
                r: origin.r(),
            },
            bounds: config.bounds().map(|bounds| RawBounds {
                min_q: bounds.min_q,
                max_q: bounds.max_q,
                min_r: bounds.min_r,
                max_r: bounds.max_r,
            }),
        }
    }
}

impl RawMapDefinition {
    /// Validates the raw data and builds the [`MapDefinition`] it describes.
    ///
    /// This is the only place map data is checked: the rest of the crate assumes
    /// its input went through here or through the generator.
    pub fn process(self) -> Result<MapDefinition, MapError> {
        let grid = self.grid.process()?;
        let raw_hexes = self.hexes.ok_or(MapDataError::MissingField("hexes"))?;
        let raw_territories = self
            .territories
            .ok_or(MapDataError::MissingField("territories"))?;

        let mut declared: HashSet<TerritoryId> = HashSet::with_capacity(raw_territories.len());
        for raw_territory in &raw_territories {
            let id = TerritoryId::new(raw_territory.id.as_str());
            if !declared.insert(id.clone()) {
                return Err(MapDataError::DuplicateTerritory(id).into());
            }
        }

        let mut hexes = Vec::with_capacity(raw_hexes.len());
        let mut labels: HashMap<HexCoord, Option<TerritoryId>> =
            HashMap::with_capacity(raw_hexes.len());
        for raw_hex in raw_hexes {
            let hex = raw_hex.process(&grid, &declared)?;
            if labels
                .insert(hex.coord, hex.territory_id.clone())
                .is_some()
            {
                return Err(MapDataError::DuplicateHex(hex.coord).into());
            }
            hexes.push(hex);
        }

        let territories = raw_territories
            .into_iter()
            .map(|raw_territory| raw_territory.process(&hexes, &labels))
            .collect::<Result<Vec<Territory>, MapDataError>>()?;

        let derived = adjacency_lists(&resolve_adjacency_for(
            territories.iter().map(|territory| &territory.id),
            &hexes,
        ));
        let adjacencies = match self.adjacencies {
            Some(stored) => process_adjacencies(stored, &territories, derived)?,
            None => derived,
        };

        debug!(
            map = %self.id,
            hexes = hexes.len(),
            territories = territories.len(),
            "loaded map"
        );

        Ok(MapDefinition {
            id: self.id,
            name: self.name,
            version: self.version,
            grid,
            hexes,
            territories,
            adjacencies,
            metadata: self.metadata,
        })
    }
}

impl RawHex {
    /// Checks the cube invariant, the coordinate range, the bounds and the territory label.
    fn process(
        self,
        grid: &HexGridConfig,
        declared: &HashSet<TerritoryId>,
    ) -> Result<MapHex, MapDataError> {
        if let Some(s) = self.s {
            HexCoord::from_cube(self.q, self.r, s)?;
        }
        let coord = HexCoord::checked(self.q, self.r)?;

        if let Some(bounds) = grid.bounds() {
            if !bounds.contains(coord) {
                return Err(MapDataError::OutOfBounds(coord));
            }
        }

        let territory_id = match self.territory_id {
            Some(id) => {
                let id = TerritoryId::new(id);
                if !declared.contains(&id) {
                    return Err(MapDataError::UnknownTerritory {
                        hex: coord,
                        territory: id,
                    });
                }
                Some(id)
            }
            None => None,
        };

        Ok(MapHex {
            coord,
            territory_id,
        })
    }
}

impl RawTerritory {
    /// Collects the hexes labeled with this territory, in map order.
    ///
    /// A non-empty `hexIds` list must name exactly those hexes, once each.
    fn process(
        self,
        hexes: &[MapHex],
        labels: &HashMap<HexCoord, Option<TerritoryId>>,
    ) -> Result<Territory, MapDataError> {
        let id = TerritoryId::new(self.id);

        let labeled: Vec<HexCoord> = hexes
            .iter()
            .filter(|hex| hex.territory_id.as_ref() == Some(&id))
            .map(|hex| hex.coord)
            .collect();

        if !self.hex_ids.is_empty() {
            let mut listed: HashSet<HexCoord> = HashSet::with_capacity(self.hex_ids.len());
            for hex_id in &self.hex_ids {
                let coord: HexCoord = hex_id.parse()?;
                // A hex can only be listed by the territory its own label names,
                // which also rules out two territories claiming one hex.
                if labels.get(&coord) != Some(&Some(id.clone())) {
                    return Err(MapDataError::TerritoryMismatch {
                        territory: id,
                        hex: coord,
                    });
                }
                if !listed.insert(coord) {
                    return Err(MapDataError::DuplicateHexId {
                        territory: id,
                        hex: coord,
                    });
                }
            }

            if let Some(&missing) = labeled.iter().find(|coord| !listed.contains(*coord)) {
                return Err(MapDataError::UnlistedHex {
                    territory: id,
                    hex: missing,
                });
            }
        }

        Ok(Territory {
            id,
            display_color: self.display_color,
            hex_ids: labeled,
        })
    }
}

/// Checks stored adjacency lists and fills in territories they omit.
///
/// The stored lists must be symmetric, and must agree with `derived`, the
/// borders actually drawn by the hexes.
fn process_adjacencies(
    stored: IndexMap<String, Vec<String>>,
    territories: &[Territory],
    derived: IndexMap<TerritoryId, Vec<TerritoryId>>,
) -> Result<IndexMap<TerritoryId, Vec<TerritoryId>>, MapDataError> {
    let mut edges: IndexMap<TerritoryId, BTreeSet<TerritoryId>> = territories
        .iter()
        .map(|territory| (territory.id.clone(), BTreeSet::new()))
        .collect();

    for (from, neighbors) in stored {
        let from = TerritoryId::new(from);
        for to in neighbors {
            let to = TerritoryId::new(to);
            if from == to || !edges.contains_key(&to) {
                return Err(MapDataError::InvalidAdjacency { from, to });
            }
            match edges.get_mut(&from) {
                Some(neighbors) => neighbors.insert(to),
                None => return Err(MapDataError::InvalidAdjacency { from, to }),
            };
        }
    }

    for (from, neighbors) in &edges {
        for to in neighbors {
            let symmetric = edges.get(to).is_some_and(|back| back.contains(from));
            if !symmetric {
                return Err(MapDataError::InvalidAdjacency {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }
    }

    for (territory, neighbors) in &edges {
        let found = derived.get(territory).map(Vec::as_slice).unwrap_or_default();
        if !neighbors.iter().eq(found) {
            return Err(MapDataError::StaleAdjacency {
                territory: territory.clone(),
                stored: neighbors.iter().cloned().collect(),
                derived: found.to_vec(),
            });
        }
    }

    Ok(derived)
}

impl From<&MapDefinition> for RawMapDefinition {
    fn from(map: &MapDefinition) -> Self {
        RawMapDefinition {
            id: map.id.clone(),
            name: map.name.clone(),
            version: map.version,
            grid: RawGridConfig::from(&map.grid),
            hexes: Some(
                map.hexes
                    .iter()
                    .map(|hex| RawHex {
                        q: hex.coord.q(),
                        r: hex.coord.r(),
                        s: Some(hex.coord.s()),
                        territory_id: hex
                            .territory_id
                            .as_ref()
                            .map(|id| id.as_str().to_string()),
                    })
                    .collect(),
            ),
            territories: Some(
                map.territories
                    .iter()
                    .map(|territory| RawTerritory {
                        id: territory.id.as_str().to_string(),
                        display_color: territory.display_color.clone(),
                        hex_ids: territory.hex_ids.iter().map(HexCoord::to_string).collect(),
                    })
                    .collect(),
            ),
            adjacencies: Some(
                map.adjacencies
                    .iter()
                    .map(|(from, neighbors)| {
                        (
                            from.as_str().to_string(),
                            neighbors.iter().map(|to| to.as_str().to_string()).collect(),
                        )
                    })
                    .collect(),
            ),
            metadata: map.metadata.clone(),
        }
    }
}

impl MapDefinition {
    /// Parses and validates a map from JSON text.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let raw: RawMapDefinition = serde_json::from_str(json)?;
        raw.process()
    }

    /// Reads, parses and validates a map file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading map file");
        let json = std::fs::read_to_string(path)?;
        MapDefinition::from_json(&json)
    }

    /// Serializes the map using the current schema.
    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(&RawMapDefinition::from(self))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_territory_map() -> serde_json::Value {
        json!({
            "id": "duel",
            "name": "Duel",
            "version": 1,
            "grid": { "orientation": "pointy", "hexSize": 40.0, "origin": { "q": 0, "r": 0 } },
            "hexes": [
                { "q": 0, "r": 0, "s": 0, "territoryId": "A" },
                { "q": 1, "r": 0, "s": -1, "territoryId": "B" },
                { "q": 5, "r": 5, "s": -10, "territoryId": null }
            ],
            "territories": [
                { "id": "A", "displayColor": "#ff0000", "hexIds": ["0,0"] },
                { "id": "B", "displayColor": "#0000ff", "hexIds": [] }
            ]
        })
    }

    fn load(value: serde_json::Value) -> Result<MapDefinition, MapError> {
        MapDefinition::from_json(&value.to_string())
    }

    #[test]
    fn loads_well_formed_map() {
        let map = load(two_territory_map()).unwrap();

        assert_eq!(map.hexes.len(), 3);
        assert_eq!(map.territories.len(), 2);
        assert_eq!(map.hexes[2].territory_id, None);
        // Empty hex lists are derived from the labels.
        assert_eq!(map.territories[1].hex_ids, vec![HexCoord::new(1, 0)]);
        assert_eq!(map.adjacencies[&TerritoryId::from("A")], vec![TerritoryId::from("B")]);
        assert_eq!(map.adjacencies[&TerritoryId::from("B")], vec![TerritoryId::from("A")]);
    }

    #[test]
    fn states_is_an_alias_for_territories() {
        let mut value = two_territory_map();
        let territories = value.as_object_mut().unwrap().remove("territories").unwrap();
        value["states"] = territories;

        let map = load(value).unwrap();
        assert_eq!(map.territories.len(), 2);
    }

    #[test]
    fn missing_arrays_are_malformed() {
        for field in ["hexes", "territories"] {
            let mut value = two_territory_map();
            value.as_object_mut().unwrap().remove(field);

            assert!(matches!(
                load(value),
                Err(MapError::MalformedMapData(MapDataError::MissingField(missing))) if missing == field
            ));
        }
    }

    #[test]
    fn broken_cube_invariant_is_rejected() {
        let mut value = two_territory_map();
        value["hexes"][1]["s"] = json!(4);

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::BrokenCubeInvariant { q: 1, r: 0, s: 4 }))
        ));
    }

    #[test]
    fn non_positive_hex_size_is_invalid_config() {
        let mut value = two_territory_map();
        value["grid"]["hexSize"] = json!(0.0);

        assert!(matches!(
            load(value),
            Err(MapError::InvalidConfig(ConfigError::NonPositiveHexSize(_)))
        ));
    }

    #[test]
    fn unknown_orientation_is_invalid_config() {
        let mut value = two_territory_map();
        value["grid"]["orientation"] = json!("diagonal");

        assert!(matches!(
            load(value),
            Err(MapError::InvalidConfig(ConfigError::UnknownOrientation(_)))
        ));
    }

    #[test]
    fn duplicate_hexes_are_rejected() {
        let mut value = two_territory_map();
        value["hexes"][1] = json!({ "q": 0, "r": 0, "s": 0, "territoryId": "B" });

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::DuplicateHex(_)))
        ));
    }

    #[test]
    fn undeclared_territory_is_rejected() {
        let mut value = two_territory_map();
        value["hexes"][2]["territoryId"] = json!("C");

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::UnknownTerritory { .. }))
        ));
    }

    #[test]
    fn territory_cannot_claim_another_territorys_hex() {
        let mut value = two_territory_map();
        value["territories"][1]["hexIds"] = json!(["0,0"]);

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::TerritoryMismatch { .. }))
        ));
    }

    #[test]
    fn asymmetric_stored_adjacency_is_rejected() {
        let mut value = two_territory_map();
        value["adjacencies"] = json!({ "A": ["B"], "B": [] });

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::InvalidAdjacency { .. }))
        ));
    }

    #[test]
    fn cube_sum_overflow_is_a_broken_invariant() {
        let mut value = two_territory_map();
        value["hexes"][2] = json!({ "q": i32::MAX, "r": 1, "s": 0, "territoryId": null });

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::BrokenCubeInvariant { q: i32::MAX, r: 1, s: 0 }))
        ));
    }

    #[test]
    fn far_away_hexes_are_rejected() {
        for (q, r) in [(2_000_000_000, 0), (0, i32::MIN), (HexCoord::MAX_RADIUS, 1)] {
            let mut value = two_territory_map();
            value["grid"]["origin"] = json!({ "q": -2_000_000_000, "r": 0 });
            value["hexes"][2] = json!({ "q": q, "r": r, "territoryId": null });

            assert!(matches!(
                load(value),
                Err(MapError::MalformedMapData(MapDataError::CoordinateOutOfRange { .. }))
            ));
        }
    }

    #[test]
    fn extreme_origin_still_positions() {
        let mut value = two_territory_map();
        value["grid"]["origin"] = json!({ "q": -2_000_000_000, "r": i32::MAX });
        value["hexes"][2] = json!({ "q": HexCoord::MAX_RADIUS, "r": -HexCoord::MAX_RADIUS, "territoryId": null });
        let board = crate::board::HexBoard::new(load(value).unwrap());

        assert_eq!(board.positioned_hexes().len(), 3);
        assert!(board
            .positioned_hexes()
            .iter()
            .all(|hex| hex.center.x.is_finite() && hex.center.y.is_finite()));
    }

    #[test]
    fn partial_hex_lists_are_rejected() {
        let mut value = two_territory_map();
        value["hexes"][2]["territoryId"] = json!("A");

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::UnlistedHex { hex, .. })) if hex == HexCoord::new(5, 5)
        ));
    }

    #[test]
    fn repeated_hex_ids_are_rejected() {
        let mut value = two_territory_map();
        value["hexes"][2] = json!({ "q": 0, "r": 1, "territoryId": "A" });
        value["territories"][0]["hexIds"] = json!(["0,0", "0,0"]);

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::DuplicateHexId { .. }))
        ));
    }

    #[test]
    fn listed_hexes_come_back_in_map_order() {
        let mut value = two_territory_map();
        value["hexes"][2] = json!({ "q": 0, "r": 1, "territoryId": "A" });
        value["territories"][0]["hexIds"] = json!(["0,1", "0,0"]);
        let map = load(value).unwrap();

        assert_eq!(
            map.territories[0].hex_ids,
            vec![HexCoord::new(0, 0), HexCoord::new(0, 1)]
        );
    }

    #[test]
    fn stale_stored_adjacency_is_rejected() {
        let mut value = two_territory_map();
        value["adjacencies"] = json!({ "A": [], "B": [] });

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::StaleAdjacency { .. }))
        ));
    }

    #[test]
    fn matching_stored_adjacency_is_kept() {
        let mut value = two_territory_map();
        value["adjacencies"] = json!({ "B": ["A"], "A": ["B"] });
        let map = load(value).unwrap();
        let board = crate::board::HexBoard::new(map.clone());

        for (id, neighbors) in &map.adjacencies {
            let derived: Vec<TerritoryId> = board.territory_neighbors(id).unwrap().iter().cloned().collect();
            assert_eq!(&derived, neighbors);
        }
    }

    #[test]
    fn hexes_outside_bounds_are_rejected() {
        let mut value = two_territory_map();
        value["grid"]["bounds"] = json!({ "minQ": -2, "maxQ": 2, "minR": -2, "maxR": 2 });

        assert!(matches!(
            load(value),
            Err(MapError::MalformedMapData(MapDataError::OutOfBounds(_)))
        ));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            MapDefinition::from_json("{ not json"),
            Err(MapError::Parse(_))
        ));
    }

    #[test]
    fn display_settings_prefer_nested_flag() {
        let nested = json!({ "display": { "showTerritoryLabels": false }, "showTerritoryLabels": true });
        let flat = json!({ "showTerritoryLabels": false });
        let unrelated = json!({ "author": "someone" });

        assert!(!DisplaySettings::from_metadata(Some(&nested)).show_territory_labels);
        assert!(!DisplaySettings::from_metadata(Some(&flat)).show_territory_labels);
        assert!(DisplaySettings::from_metadata(Some(&unrelated)).show_territory_labels);
        assert!(DisplaySettings::from_metadata(None).show_territory_labels);
    }

    #[test]
    fn written_maps_load_back_unchanged() {
        let mut value = two_territory_map();
        value["metadata"] = json!({ "display": { "showTerritoryLabels": false } });
        let map = load(value).unwrap();

        let reloaded = MapDefinition::from_json(&map.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, map);
        assert!(!reloaded.display_settings().show_territory_labels);
    }
}
