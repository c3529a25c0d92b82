//! Places the hexes of a map in world space.

use serde::Serialize;

use crate::chunks::ChunkKey;
use crate::geometry::{axial_to_world, corners_of, HexCoord, HexGridConfig, WorldPos};
use crate::map::{MapDefinition, MapHex};

/// A hex together with where it sits in the world.
///
/// Positioned hexes are derived from a map and its grid. When either changes,
/// the whole set is recomputed rather than patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedHex {
    /// The source hex.
    #[serde(flatten)]
    pub hex: MapHex,
    /// World-space center.
    pub center: WorldPos,
    /// The six corners, clockwise on screen, starting at the orientation's first vertex.
    pub corners: [WorldPos; 6],
    /// The chunk containing [`PositionedHex::center`].
    pub chunk_key: ChunkKey,
}

impl PositionedHex {
    /// The hex id, whose string form is `"q,r"`.
    #[inline]
    #[must_use]
    pub fn id(&self) -> HexCoord {
        self.hex.coord
    }
}

/// Positions every hex of `map`, in map order.
///
/// Positioning the same map twice yields identical results, and an empty map
/// yields an empty list.
#[must_use]
pub fn position(map: &MapDefinition) -> Vec<PositionedHex> {
    position_hexes(&map.hexes, &map.grid)
}

/// Positions `hexes` on `grid`, in input order.
#[must_use]
pub fn position_hexes(hexes: &[MapHex], grid: &HexGridConfig) -> Vec<PositionedHex> {
    hexes
        .iter()
        .map(|hex| {
            let center = axial_to_world(hex.coord.q(), hex.coord.r(), grid);
            PositionedHex {
                hex: hex.clone(),
                center,
                corners: corners_of(center, grid.hex_size(), grid.orientation()),
                chunk_key: ChunkKey::containing(center),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;
    use crate::world_gen::generate;

    #[test]
    fn positioning_is_idempotent() {
        let map = generate(127, 35.).unwrap();
        assert_eq!(position(&map), position(&map));
    }

    #[test]
    fn positions_follow_map_order() {
        let map = generate(19, 10.).unwrap();
        let positioned = position(&map);

        assert_eq!(positioned.len(), map.hexes.len());
        for (positioned_hex, hex) in positioned.iter().zip(&map.hexes) {
            assert_eq!(&positioned_hex.hex, hex);
        }
    }

    #[test]
    fn center_hex_sits_at_origin_in_chunk_zero() {
        let map = generate(1, 40.).unwrap();
        let positioned = position(&map);

        assert_eq!(positioned[0].center, WorldPos::ZERO);
        assert_eq!(positioned[0].chunk_key, ChunkKey::new(0, 0));
        assert_eq!(positioned[0].id().to_string(), "0,0");
    }

    #[test]
    fn hexes_left_of_origin_fall_in_negative_chunks() {
        let grid = HexGridConfig::new(Orientation::Pointy, 200.).unwrap();
        let positioned = position_hexes(&[MapHex::void(HexCoord::new(-1, 0))], &grid);

        // x = -200 * sqrt(3), about -346
        assert_eq!(positioned[0].chunk_key, ChunkKey::new(-2, 0));
    }

    #[test]
    fn empty_map_positions_nothing() {
        let map = generate(0, 40.).unwrap();
        assert!(position(&map).is_empty());
    }

    #[test]
    fn positioned_hex_serializes_with_string_ids() {
        let grid = HexGridConfig::new(Orientation::Flat, 10.).unwrap();
        let positioned = position_hexes(&[MapHex::new(HexCoord::new(2, -1), "A")], &grid);
        let json = serde_json::to_value(&positioned[0]).unwrap();

        assert_eq!(json["coord"], "2,-1");
        assert_eq!(json["territoryId"], "A");
        assert_eq!(json["chunkKey"], "0_0");
        assert_eq!(json["corners"].as_array().unwrap().len(), 6);
    }
}
