//! Hex coordinates and the layout that places them in world space.

mod coordinates;
pub use coordinates::{
    neighbor_deltas, HexCoord, HexDelta, CUBE_DIRECTIONS, RING_START_DIRECTION,
};

mod layout;
pub(crate) use layout::{bounds_of_points, corners_of};
pub use layout::{
    axial_to_world, compute_bounds, hex_corners, world_to_axial, GridBounds, HexGridConfig,
    Orientation, WorldBounds, WorldPos,
};
