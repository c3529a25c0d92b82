//! A smooth, table-free noise function used to paint territories onto hexes.
//!
//! The same `(q, r)` always produces the same value, and neighboring hexes
//! produce similar values, so territories come out as coherent blobs.

use crate::geometry::HexCoord;

/// The noise frequency used by generated maps.
pub const DEFAULT_NOISE_SCALE: f64 = 0.15;

/// The raw noise value at `coord`, in `[-3, 3]`.
#[must_use]
pub fn territory_noise(coord: HexCoord, scale: f64) -> f64 {
    let q = f64::from(coord.q());
    let r = f64::from(coord.r());

    (q * scale).sin() + (r * scale * 0.8).cos() + ((q + r) * scale * 0.5).sin()
}

/// The noise value at `coord`, rescaled to `[0, 1]`.
#[must_use]
pub fn normalized_noise(coord: HexCoord, scale: f64) -> f64 {
    ((territory_noise(coord, scale) + 3.) / 6.).clamp(0., 1.)
}

/// Picks which of `n_territories` owns `coord`.
///
/// Returns `None` only when there are no territories to choose from.
#[must_use]
pub fn territory_index(coord: HexCoord, scale: f64, n_territories: usize) -> Option<usize> {
    if n_territories == 0 {
        return None;
    }

    let index = (normalized_noise(coord, scale) * n_territories as f64).floor() as usize;
    Some(index.min(n_territories - 1))
}
