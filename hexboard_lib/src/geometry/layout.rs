//! Converting hex coordinates into world space.

use derive_more::{Add, AddAssign, Sub, SubAssign};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

use super::HexCoord;

/// Whether hexes are drawn with a flat edge or a point at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A vertex points straight up; rows of hexes are horizontal.
    #[default]
    Pointy,
    /// An edge lies flat at the top; columns of hexes are vertical.
    Flat,
}

impl Orientation {
    /// Angle of corner 0, in degrees.
    #[inline]
    #[must_use]
    pub const fn corner_offset_degrees(self) -> f64 {
        match self {
            Orientation::Pointy => 30.,
            Orientation::Flat => 0.,
        }
    }

    /// The name used in map files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Orientation::Pointy => "pointy",
            Orientation::Flat => "flat",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pointy" => Ok(Orientation::Pointy),
            "flat" => Ok(Orientation::Flat),
            _ => Err(ConfigError::UnknownOrientation(s.to_string())),
        }
    }
}

/// A point in world space.
///
/// The `y` axis points down, as on a screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Add, Sub, AddAssign, SubAssign, Serialize, Deserialize,
)]
pub struct WorldPos {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl WorldPos {
    /// The world origin.
    pub const ZERO: WorldPos = WorldPos { x: 0., y: 0. };

    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        WorldPos { x, y }
    }
}

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBounds {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl WorldBounds {
    /// Right edge.
    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }
}

/// Inclusive limits on the axial coordinates a map may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridBounds {
    /// Smallest allowed `q`.
    pub min_q: i32,
    /// Largest allowed `q`.
    pub max_q: i32,
    /// Smallest allowed `r`.
    pub min_r: i32,
    /// Largest allowed `r`.
    pub max_r: i32,
}

impl GridBounds {
    /// Is `coord` within these bounds?
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        (self.min_q..=self.max_q).contains(&coord.q())
            && (self.min_r..=self.max_r).contains(&coord.r())
    }
}

/// The layout shared by every hex of a map.
///
/// Construction validates the configuration, so every existing value
/// describes a usable layout. Values never change once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGridConfig {
    /// Flat or pointy hexes.
    orientation: Orientation,
    /// Distance from a hex center to any of its corners.
    hex_size: f64,
    /// The hex drawn at world `(0, 0)`.
    origin: HexCoord,
    /// Optional limits on the coordinates in use.
    bounds: Option<GridBounds>,
}

impl HexGridConfig {
    /// Creates a layout centered on `(0, 0)` with no coordinate bounds.
    pub fn new(orientation: Orientation, hex_size: f64) -> Result<Self, ConfigError> {
        validate_hex_size(hex_size)?;

        Ok(HexGridConfig {
            orientation,
            hex_size,
            origin: HexCoord::ZERO,
            bounds: None,
        })
    }

    /// Moves the hex drawn at world `(0, 0)`.
    #[must_use]
    pub fn with_origin(mut self, origin: HexCoord) -> Self {
        self.origin = origin;
        self
    }

    /// Restricts the coordinates a map may use.
    pub fn with_bounds(mut self, bounds: GridBounds) -> Result<Self, ConfigError> {
        if bounds.min_q > bounds.max_q || bounds.min_r > bounds.max_r {
            return Err(ConfigError::InvertedBounds {
                min_q: bounds.min_q,
                max_q: bounds.max_q,
                min_r: bounds.min_r,
                max_r: bounds.max_r,
            });
        }

        self.bounds = Some(bounds);
        Ok(self)
    }

    /// Flat or pointy hexes.
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Distance from a hex center to any of its corners.
    #[inline]
    #[must_use]
    pub const fn hex_size(&self) -> f64 {
        self.hex_size
    }

    /// The hex drawn at world `(0, 0)`.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> HexCoord {
        self.origin
    }

    /// Limits on the coordinates in use, if any.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }
}

/// Rejects hex sizes that cannot describe a hex.
fn validate_hex_size(hex_size: f64) -> Result<(), ConfigError> {
    if hex_size.is_finite() && hex_size > 0. {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveHexSize(hex_size))
    }
}

/// Returns the world-space center of the hex at axial `(q, r)`.
///
/// This is a pure function of its inputs: repeated calls never drift. It is
/// total over every `i32` coordinate and origin.
#[must_use]
pub fn axial_to_world(q: i32, r: i32, config: &HexGridConfig) -> WorldPos {
    let sqrt_3 = 3_f64.sqrt();
    let q = f64::from(q) - f64::from(config.origin.q());
    let r = f64::from(r) - f64::from(config.origin.r());
    let size = config.hex_size;

    match config.orientation {
        Orientation::Pointy => WorldPos {
            x: size * (sqrt_3 * q + sqrt_3 / 2. * r),
            y: size * (3. / 2. * r),
        },
        Orientation::Flat => WorldPos {
            x: size * (3. / 2. * q),
            y: size * (sqrt_3 / 2. * q + sqrt_3 * r),
        },
    }
}

/// Returns the hex containing `pos`.
///
/// Inverse of [`axial_to_world`], used for picking and viewport lookups.
/// Points beyond [`HexCoord::MAX_RADIUS`] snap to the edge of that range.
#[must_use]
pub fn world_to_axial(pos: WorldPos, config: &HexGridConfig) -> HexCoord {
    let sqrt_3 = 3_f64.sqrt();
    let x = pos.x / config.hex_size;
    let y = pos.y / config.hex_size;

    let (q, r) = match config.orientation {
        Orientation::Pointy => (sqrt_3 / 3. * x - y / 3., 2. / 3. * y),
        Orientation::Flat => (2. / 3. * x, sqrt_3 / 3. * y - x / 3.),
    };

    HexCoord::round(
        q + f64::from(config.origin.q()),
        r + f64::from(config.origin.r()),
    )
}

/// Returns the six corners of a hex, clockwise on screen.
///
/// Corner `i` lies at `60 * i + offset` degrees from the center, where the
/// offset is 0 degrees for flat hexes and 30 degrees for pointy ones.
pub fn hex_corners(
    center: WorldPos,
    hex_size: f64,
    orientation: Orientation,
) -> Result<[WorldPos; 6], ConfigError> {
    validate_hex_size(hex_size)?;

    Ok(corners_of(center, hex_size, orientation))
}

/// [`hex_corners`] for a size that has already been validated.
pub(crate) fn corners_of(center: WorldPos, hex_size: f64, orientation: Orientation) -> [WorldPos; 6] {
    let offset = orientation.corner_offset_degrees();

    std::array::from_fn(|i| {
        let angle = (60. * i as f64 + offset).to_radians();
        WorldPos {
            x: center.x + hex_size * angle.cos(),
            y: center.y + hex_size * angle.sin(),
        }
    })
}

/// Computes the box covering the full corner polygon of every hex.
///
/// There is no padding. An empty input yields an all-zero box.
#[must_use]
pub fn compute_bounds<I>(hexes: I, config: &HexGridConfig) -> WorldBounds
where
    I: IntoIterator<Item = HexCoord>,
{
    let corners: Vec<WorldPos> = hexes
        .into_iter()
        .flat_map(|coord| {
            let center = axial_to_world(coord.q(), coord.r(), config);
            corners_of(center, config.hex_size, config.orientation)
        })
        .collect();

    bounds_of_points(&corners)
}

/// The box covering a set of points.
pub(crate) fn bounds_of_points(points: &[WorldPos]) -> WorldBounds {
    let xs = points.iter().map(|point| point.x).minmax_by(f64::total_cmp);
    let ys = points.iter().map(|point| point.y).minmax_by(f64::total_cmp);

    match (xs, ys) {
        (MinMaxResult::MinMax(min_x, max_x), MinMaxResult::MinMax(min_y, max_y)) => WorldBounds {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        },
        (MinMaxResult::OneElement(x), MinMaxResult::OneElement(y)) => WorldBounds {
            min_x: x,
            min_y: y,
            width: 0.,
            height: 0.,
        },
        _ => WorldBounds::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn pointy(hex_size: f64) -> HexGridConfig {
        HexGridConfig::new(Orientation::Pointy, hex_size).unwrap()
    }

    fn assert_close(actual: WorldPos, expected: WorldPos) {
        assert!(
            (actual.x - expected.x).abs() < TOLERANCE && (actual.y - expected.y).abs() < TOLERANCE,
            "{actual:?} is not close to {expected:?}"
        );
    }

    #[test]
    fn origin_hex_is_at_world_origin() {
        assert_close(axial_to_world(0, 0, &pointy(40.)), WorldPos::ZERO);
    }

    #[test]
    fn pointy_step_along_q_is_horizontal() {
        let expected = WorldPos::new(40. * 3_f64.sqrt(), 0.);
        assert_close(axial_to_world(1, 0, &pointy(40.)), expected);
    }

    #[test]
    fn flat_step_along_r_is_vertical() {
        let config = HexGridConfig::new(Orientation::Flat, 10.).unwrap();
        let expected = WorldPos::new(0., 10. * 3_f64.sqrt());
        assert_close(axial_to_world(0, 1, &config), expected);
    }

    #[test]
    fn origin_shifts_the_whole_layout() {
        let config = pointy(10.).with_origin(HexCoord::new(2, -1));
        assert_close(axial_to_world(2, -1, &config), WorldPos::ZERO);
    }

    #[test]
    fn extreme_origins_do_not_overflow() {
        let config = pointy(1.).with_origin(HexCoord::new(i32::MIN, i32::MAX));
        let pos = axial_to_world(i32::MAX, i32::MIN, &config);

        assert!(pos.x.is_finite() && pos.y.is_finite());
        assert!(pos.y < 0.);

        let far = world_to_axial(WorldPos::new(1e300, -1e300), &config);
        assert!(far.distance_to(HexCoord::ZERO) <= 2 * HexCoord::MAX_RADIUS as u32);
    }

    #[test]
    fn repeated_conversion_is_exact() {
        let config = pointy(17.5);
        let first = axial_to_world(-13, 29, &config);
        for _ in 0..1_000 {
            assert_eq!(axial_to_world(-13, 29, &config), first);
        }
    }

    #[test]
    fn world_to_axial_conversions_are_invertable() {
        for orientation in [Orientation::Pointy, Orientation::Flat] {
            let config = HexGridConfig::new(orientation, 23.)
                .unwrap()
                .with_origin(HexCoord::new(1, 1));
            for q in -10..=10 {
                for r in -10..=10 {
                    let world_pos = axial_to_world(q, r, &config);
                    assert_eq!(world_to_axial(world_pos, &config), HexCoord::new(q, r));
                }
            }
        }
    }

    #[test]
    fn corners_are_hex_size_from_center() {
        let center = WorldPos::new(5., -3.);
        for orientation in [Orientation::Pointy, Orientation::Flat] {
            for corner in hex_corners(center, 12., orientation).unwrap() {
                let distance = ((corner.x - center.x).powi(2) + (corner.y - center.y).powi(2)).sqrt();
                assert!((distance - 12.).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn first_corner_follows_orientation() {
        let flat = hex_corners(WorldPos::ZERO, 1., Orientation::Flat).unwrap();
        assert_close(flat[0], WorldPos::new(1., 0.));

        let pointy = hex_corners(WorldPos::ZERO, 2., Orientation::Pointy).unwrap();
        assert_close(pointy[0], WorldPos::new(3_f64.sqrt(), 1.));
    }

    #[test]
    fn corners_wind_clockwise_on_screen() {
        let corners = hex_corners(WorldPos::ZERO, 1., Orientation::Pointy).unwrap();
        // With y pointing down, a positive shoelace sum is clockwise.
        let signed_area: f64 = (0..6)
            .map(|i| {
                let a = corners[i];
                let b = corners[(i + 1) % 6];
                a.x * b.y - b.x * a.y
            })
            .sum();
        assert!(signed_area > 0.);
    }

    #[test]
    fn non_positive_hex_size_is_rejected() {
        for bad in [0., -1., f64::NAN, f64::INFINITY] {
            assert!(HexGridConfig::new(Orientation::Pointy, bad).is_err());
            assert!(hex_corners(WorldPos::ZERO, bad, Orientation::Flat).is_err());
        }
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let bounds = GridBounds {
            min_q: 3,
            max_q: -3,
            min_r: 0,
            max_r: 0,
        };
        assert!(matches!(
            pointy(1.).with_bounds(bounds),
            Err(ConfigError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn unknown_orientation_is_rejected() {
        assert_eq!("Flat".parse::<Orientation>(), Ok(Orientation::Flat));
        assert_eq!(
            "hexagonal".parse::<Orientation>(),
            Err(ConfigError::UnknownOrientation("hexagonal".to_string()))
        );
    }

    #[test]
    fn empty_bounds_are_zero() {
        assert_eq!(compute_bounds([], &pointy(10.)), WorldBounds::default());
    }

    #[test]
    fn single_hex_bounds_cover_corners() {
        let bounds = compute_bounds([HexCoord::ZERO], &pointy(10.));
        let half_width = 10. * 3_f64.sqrt() / 2.;

        assert!((bounds.min_x + half_width).abs() < TOLERANCE);
        assert!((bounds.width - 2. * half_width).abs() < TOLERANCE);
        assert!((bounds.min_y + 10.).abs() < TOLERANCE);
        assert!((bounds.height - 20.).abs() < TOLERANCE);
    }
}
