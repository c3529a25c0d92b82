//! Integer hex coordinates and the unit steps between them.

use core::fmt::Display;
use std::cmp::Ordering;
use std::fmt::Formatter;
use std::ops::{Add, Mul};
use std::str::FromStr;

use derive_more::{Add, AddAssign, Deref, Sub, SubAssign};
use hexx::Hex;
use serde::{Deserialize, Serialize};

use crate::error::MapDataError;

use super::Orientation;

/// The index into [`CUBE_DIRECTIONS`] that ring walks start from.
pub const RING_START_DIRECTION: usize = 4;

/// The six unit steps in cube space, as `(dq, dr)`.
///
/// The order is load-bearing: it fixes the traversal order of generated maps,
/// and with it the ids of every persisted `generated-N` map.
pub const CUBE_DIRECTIONS: [HexDelta; 6] = [
    HexDelta { dq: 1, dr: 0 },
    HexDelta { dq: 1, dr: -1 },
    HexDelta { dq: 0, dr: -1 },
    HexDelta { dq: -1, dr: 0 },
    HexDelta { dq: -1, dr: 1 },
    HexDelta { dq: 0, dr: 1 },
];

/// Returns the six neighbor steps, in ring-walk order.
///
/// Cube steps do not depend on how hexes are drawn, so both orientations share
/// the same table. The argument exists so callers can stay orientation-agnostic.
#[inline]
#[must_use]
pub const fn neighbor_deltas(_orientation: Orientation) -> [HexDelta; 6] {
    CUBE_DIRECTIONS
}

/// A single step between two hexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexDelta {
    /// Change along the `q` axis.
    pub dq: i32,
    /// Change along the `r` axis.
    pub dr: i32,
}

impl Mul<i32> for HexDelta {
    type Output = HexDelta;

    #[inline]
    fn mul(self, rhs: i32) -> Self::Output {
        HexDelta {
            dq: self.dq * rhs,
            dr: self.dr * rhs,
        }
    }
}

/// An axial hex coordinate, identifying exactly one hex.
///
/// Only `q` and `r` are stored; `s` is always derived as `-q - r`.
/// The string form `"q,r"` is the hex id used by territories and chunks.
///
/// Neighbor and `s` arithmetic is only guaranteed not to overflow within
/// [`HexCoord::MAX_RADIUS`] of the origin. Loaded maps are checked against it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deref,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Serialize,
    Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct HexCoord {
    /// The underlying hex coordinate
    pub(crate) hex: Hex,
}

impl HexCoord {
    /// The central hex.
    pub const ZERO: HexCoord = HexCoord { hex: Hex::ZERO };

    /// The furthest a hex may lie from the origin, in steps.
    pub const MAX_RADIUS: i32 = 1 << 29;

    /// Creates a coordinate from its axial components.
    #[inline]
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        HexCoord {
            hex: Hex { x: q, y: r },
        }
    }

    /// Creates a coordinate from cube components, if they satisfy `q + r + s = 0`.
    #[inline]
    pub fn from_cube(q: i32, r: i32, s: i32) -> Result<Self, MapDataError> {
        if i64::from(q) + i64::from(r) + i64::from(s) == 0 {
            Ok(HexCoord::new(q, r))
        } else {
            Err(MapDataError::BrokenCubeInvariant { q, r, s })
        }
    }

    /// Creates a coordinate, if it lies within [`HexCoord::MAX_RADIUS`] of the origin.
    pub fn checked(q: i32, r: i32) -> Result<Self, MapDataError> {
        let radius = i64::from(Self::MAX_RADIUS);
        let (q64, r64) = (i64::from(q), i64::from(r));
        if q64.abs() <= radius && r64.abs() <= radius && (q64 + r64).abs() <= radius {
            Ok(HexCoord::new(q, r))
        } else {
            Err(MapDataError::CoordinateOutOfRange { q, r })
        }
    }

    /// The `q` component.
    #[inline]
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.hex.x
    }

    /// The `r` component.
    #[inline]
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.hex.y
    }

    /// The derived `s` component.
    #[inline]
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.hex.x - self.hex.y
    }

    /// Returns `[q, r, s]`.
    #[inline]
    #[must_use]
    pub const fn to_cubic_array(&self) -> [i32; 3] {
        [self.q(), self.r(), self.s()]
    }

    /// The hex one step away in `delta`.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, delta: HexDelta) -> Self {
        *self + delta
    }

    /// All six neighbors, in [`CUBE_DIRECTIONS`] order.
    ///
    /// # Warning
    ///
    /// This includes neighbors that are not on the map.
    #[inline]
    #[must_use]
    pub fn neighbors(&self) -> [HexCoord; 6] {
        CUBE_DIRECTIONS.map(|delta| self.neighbor(delta))
    }

    /// Number of steps between the two hexes.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: HexCoord) -> u32 {
        let dq = i64::from(self.q()) - i64::from(other.q());
        let dr = i64::from(self.r()) - i64::from(other.r());
        let steps = (dq.abs() + dr.abs() + (dq + dr).abs()) / 2;

        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Rounds fractional axial coordinates to the hex that contains them.
    ///
    /// Components are first clamped to [`HexCoord::MAX_RADIUS`].
    #[must_use]
    pub fn round(q: f64, r: f64) -> Self {
        let limit = f64::from(Self::MAX_RADIUS);
        let q = q.clamp(-limit, limit);
        let r = r.clamp(-limit, limit);
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        HexCoord::new(rq as i32, rr as i32)
    }
}

impl Add<HexDelta> for HexCoord {
    type Output = HexCoord;

    #[inline]
    fn add(self, rhs: HexDelta) -> Self::Output {
        HexCoord::new(self.q() + rhs.dq, self.r() + rhs.dr)
    }
}

impl Display for HexCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.q(), self.r())
    }
}

impl FromStr for HexCoord {
    type Err = MapDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MapDataError::InvalidHexId(s.to_string());
        let (q, r) = s.split_once(',').ok_or_else(invalid)?;
        let q = q.trim().parse().map_err(|_| invalid())?;
        let r = r.trim().parse().map_err(|_| invalid())?;

        Ok(HexCoord::new(q, r))
    }
}

impl From<HexCoord> for String {
    fn from(coord: HexCoord) -> Self {
        coord.to_string()
    }
}

impl TryFrom<String> for HexCoord {
    type Error = MapDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl PartialOrd for HexCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HexCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.q(), self.r()).cmp(&(other.q(), other.r()))
    }
}
