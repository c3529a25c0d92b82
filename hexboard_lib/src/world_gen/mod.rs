//! Procedurally generating hex maps.
//!
//! Hexes are laid out in a spiral: the central hex, then each concentric ring in
//! turn, until the requested number of hexes has been placed. Every hex is then
//! labeled with a territory by sampling [`territory_noise`].

use tracing::debug;

use crate::adjacency::{adjacency_lists, resolve_adjacency_for};
use crate::error::MapError;
use crate::geometry::{
    neighbor_deltas, HexCoord, HexGridConfig, Orientation, RING_START_DIRECTION,
};
use crate::map::{MapDefinition, MapHex, Territory, TerritoryId};

mod territory_noise;
pub use territory_noise::{
    normalized_noise, territory_index, territory_noise, DEFAULT_NOISE_SCALE,
};

/// A territory that generated maps may paint onto hexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryStyle {
    /// Id given to the territory.
    pub id: TerritoryId,
    /// Color given to the territory.
    pub display_color: String,
}

impl TerritoryStyle {
    /// Creates a new style.
    #[must_use]
    pub fn new(id: impl Into<TerritoryId>, display_color: impl Into<String>) -> Self {
        TerritoryStyle {
            id: id.into(),
            display_color: display_color.into(),
        }
    }
}

/// Controls map generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Exact number of hexes to place.
    pub hex_count: usize,
    /// Center-to-corner size of each hex.
    pub hex_size: f64,
    /// How hexes are drawn.
    pub orientation: Orientation,
    /// Frequency of the territory noise.
    ///
    /// Higher values mean smaller territories.
    pub noise_scale: f64,
    /// The ordered list of territories to paint with.
    ///
    /// Low noise values map to the start of the list, high values to the end.
    pub palette: Vec<TerritoryStyle>,
}

impl Default for GenerationConfig {
    fn default() -> GenerationConfig {
        GenerationConfig {
            hex_count: 91,
            hex_size: 40.,
            orientation: Orientation::Pointy,
            noise_scale: DEFAULT_NOISE_SCALE,
            palette: default_palette(),
        }
    }
}

/// The territories used when no palette is supplied.
#[must_use]
pub fn default_palette() -> Vec<TerritoryStyle> {
    [
        ("territory-1", "#e6194b"),
        ("territory-2", "#3cb44b"),
        ("territory-3", "#ffe119"),
        ("territory-4", "#4363d8"),
        ("territory-5", "#f58231"),
        ("territory-6", "#911eb4"),
        ("territory-7", "#46f0f0"),
        ("territory-8", "#f032e6"),
    ]
    .into_iter()
    .map(|(id, color)| TerritoryStyle::new(id, color))
    .collect()
}

/// Generates a pointy-topped map of exactly `hex_count` hexes with the default palette.
pub fn generate(hex_count: usize, hex_size: f64) -> Result<MapDefinition, MapError> {
    GenerationConfig {
        hex_count,
        hex_size,
        ..Default::default()
    }
    .generate()
}

impl GenerationConfig {
    /// Creates the map described by this config.
    ///
    /// The output depends only on the config: identical configs always produce
    /// identical maps.
    pub fn generate(&self) -> Result<MapDefinition, MapError> {
        let grid = HexGridConfig::new(self.orientation, self.hex_size)?;

        let n_territories = self.palette.len();
        let mut owned: Vec<Vec<HexCoord>> = vec![Vec::new(); n_territories];
        let hexes: Vec<MapHex> = spiral(self.hex_count)
            .into_iter()
            .map(|coord| match territory_index(coord, self.noise_scale, n_territories) {
                Some(index) => {
                    owned[index].push(coord);
                    MapHex::new(coord, self.palette[index].id.clone())
                }
                None => MapHex::void(coord),
            })
            .collect();

        // Only territories that actually own a hex make it onto the map
        let territories: Vec<Territory> = self
            .palette
            .iter()
            .zip(owned)
            .filter(|(_, hex_ids)| !hex_ids.is_empty())
            .map(|(style, hex_ids)| Territory {
                id: style.id.clone(),
                display_color: style.display_color.clone(),
                hex_ids,
            })
            .collect();

        let adjacency = resolve_adjacency_for(
            territories.iter().map(|territory| &territory.id),
            &hexes,
        );

        debug!(
            hex_count = self.hex_count,
            territories = territories.len(),
            "generated map"
        );

        Ok(MapDefinition {
            id: format!("generated-{}", self.hex_count),
            name: format!("Generated map ({} hexes)", self.hex_count),
            version: crate::map::CURRENT_VERSION,
            grid,
            hexes,
            territories,
            adjacencies: adjacency_lists(&adjacency),
            metadata: None,
        })
    }
}

/// Returns the first `hex_count` hexes of the outward spiral around the origin.
///
/// Ring `k` starts `k` steps from the center in direction [`RING_START_DIRECTION`]
/// and walks six sides of `k` steps, side `i` stepping in direction `i`.
/// When `hex_count` falls inside a ring the walk stops mid-side.
#[must_use]
pub fn spiral(hex_count: usize) -> Vec<HexCoord> {
    let mut hexes = Vec::with_capacity(hex_count);
    if hex_count == 0 {
        return hexes;
    }
    hexes.push(HexCoord::ZERO);

    // Cube steps are the same for both orientations
    let deltas = neighbor_deltas(Orientation::Pointy);
    let mut radius: i32 = 1;
    while hexes.len() < hex_count {
        let mut current = HexCoord::ZERO + deltas[RING_START_DIRECTION] * radius;
        for delta in deltas {
            for _ in 0..radius {
                if hexes.len() == hex_count {
                    return hexes;
                }
                hexes.push(current);
                current = current + delta;
            }
        }
        radius += 1;
    }

    hexes
}

/// The number of hexes in a full hexagon of the given radius.
#[inline]
#[must_use]
pub const fn hexagon_hex_count(radius: usize) -> usize {
    1 + 3 * radius * (radius + 1)
}
