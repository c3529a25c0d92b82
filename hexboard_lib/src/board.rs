//! The read-only view of a map handed to renderers.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::adjacency::{resolve_adjacency_for, AdjacencyMap};
use crate::chunks::{build_chunks, ChunkIndex, ChunkKey};
use crate::geometry::{bounds_of_points, HexCoord, WorldBounds, WorldPos};
use crate::map::{MapDefinition, TerritoryId};
use crate::positioning::{position, PositionedHex};

/// A map together with everything derived from it.
///
/// All derived data is computed once, in [`HexBoard::new`]. There is no way to
/// change a board: a different map means building a new one.
#[derive(Debug, Clone)]
pub struct HexBoard {
    /// The source map.
    map: MapDefinition,
    /// Every hex placed in world space, in map order.
    positioned: Vec<PositionedHex>,
    /// Index into `positioned` for each hex.
    hex_index: HashMap<HexCoord, usize>,
    /// Hexes grouped by chunk.
    chunks: ChunkIndex,
    /// Neighboring territories of each territory.
    adjacency: AdjacencyMap,
    /// Box around every hex polygon.
    bounds: WorldBounds,
}

impl HexBoard {
    /// Derives positions, chunks and adjacency from `map`.
    #[must_use]
    pub fn new(map: MapDefinition) -> Self {
        let positioned = position(&map);
        let hex_index = positioned
            .iter()
            .enumerate()
            .map(|(i, hex)| (hex.id(), i))
            .collect();
        let chunks = build_chunks(&positioned);
        let adjacency = resolve_adjacency_for(
            map.territories.iter().map(|territory| &territory.id),
            &map.hexes,
        );
        let corners: Vec<WorldPos> = positioned
            .iter()
            .flat_map(|hex| hex.corners)
            .collect();
        let bounds = bounds_of_points(&corners);

        HexBoard {
            map,
            positioned,
            hex_index,
            chunks,
            adjacency,
            bounds,
        }
    }

    /// The source map.
    #[inline]
    #[must_use]
    pub fn map(&self) -> &MapDefinition {
        &self.map
    }

    /// Every hex placed in world space, in map order.
    #[inline]
    #[must_use]
    pub fn positioned_hexes(&self) -> &[PositionedHex] {
        &self.positioned
    }

    /// The positioned hex at `coord`, if it is on the map.
    #[inline]
    #[must_use]
    pub fn hex(&self, coord: HexCoord) -> Option<&PositionedHex> {
        self.hex_index.get(&coord).map(|&i| &self.positioned[i])
    }

    /// The hexes in the chunk at `key`.
    #[inline]
    #[must_use]
    pub fn chunk(&self, key: &ChunkKey) -> Option<&[HexCoord]> {
        self.chunks.get(key)
    }

    /// The full chunk index.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &ChunkIndex {
        &self.chunks
    }

    /// The territories bordering `id`, or `None` for an unknown territory.
    #[inline]
    #[must_use]
    pub fn territory_neighbors(&self, id: &TerritoryId) -> Option<&BTreeSet<TerritoryId>> {
        self.adjacency.get(id)
    }

    /// The full adjacency map.
    #[inline]
    #[must_use]
    pub fn adjacency(&self) -> &AdjacencyMap {
        &self.adjacency
    }

    /// Box around every hex polygon; all zero for an empty map.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// The positioned hexes whose chunks overlap the rectangle from `min` to `max`.
    ///
    /// This is a chunk-level filter: hexes near the rectangle but outside it may be included.
    /// The cost is bounded by the number of chunks, however large the rectangle.
    pub fn hexes_near(&self, min: WorldPos, max: WorldPos) -> impl Iterator<Item = &PositionedHex> {
        self.chunks
            .chunks_in_rect(min, max)
            .flat_map(|(_, hexes)| hexes)
            .filter_map(|coord| self.hex(*coord))
    }
}
