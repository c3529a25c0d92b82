//! Error types returned when building or loading a hex map.

use thiserror::Error;

use crate::geometry::HexCoord;
use crate::map::TerritoryId;

/// Everything that can go wrong while configuring, generating or loading a map.
///
/// Empty input is never an error: operations on zero hexes return empty results.
#[derive(Debug, Error)]
pub enum MapError {
    /// The grid configuration cannot produce a valid layout.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// The map data violates the map schema.
    #[error("malformed map data: {0}")]
    MalformedMapData(#[from] MapDataError),
    /// The map text was not valid JSON for the map schema.
    #[error("could not parse map JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The map file could not be read or written.
    #[error("map file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`HexGridConfig`](crate::geometry::HexGridConfig) was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `hex_size` must be a finite number greater than zero.
    #[error("hex size must be finite and greater than zero, got {0}")]
    NonPositiveHexSize(f64),
    /// The orientation string was neither `pointy` nor `flat`.
    #[error("unknown orientation {0:?}, expected \"pointy\" or \"flat\"")]
    UnknownOrientation(String),
    /// The optional bounds have a minimum greater than their maximum.
    #[error("grid bounds are inverted: q in {min_q}..={max_q}, r in {min_r}..={max_r}")]
    InvertedBounds {
        /// Smallest allowed `q`.
        min_q: i32,
        /// Largest allowed `q`.
        max_q: i32,
        /// Smallest allowed `r`.
        min_r: i32,
        /// Largest allowed `r`.
        max_r: i32,
    },
}

/// A loaded map failed schema validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapDataError {
    /// A required top-level array was absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// A hex record broke `q + r + s = 0`.
    #[error("hex ({q}, {r}, {s}) does not satisfy q + r + s = 0")]
    BrokenCubeInvariant {
        /// The stored `q`.
        q: i32,
        /// The stored `r`.
        r: i32,
        /// The stored `s`.
        s: i32,
    },
    /// A hex lies too far from the origin for neighbor arithmetic to be exact.
    #[error("hex ({q}, {r}) is further than {} steps from the origin", HexCoord::MAX_RADIUS)]
    CoordinateOutOfRange {
        /// The stored `q`.
        q: i32,
        /// The stored `r`.
        r: i32,
    },
    /// The same coordinate appeared in more than one hex record.
    #[error("hex {0} appears more than once")]
    DuplicateHex(HexCoord),
    /// The same territory id was declared twice.
    #[error("territory {0} is declared more than once")]
    DuplicateTerritory(TerritoryId),
    /// A hex was labeled with a territory that is not declared.
    #[error("hex {hex} references undeclared territory {territory}")]
    UnknownTerritory {
        /// The labeled hex.
        hex: HexCoord,
        /// The missing territory id.
        territory: TerritoryId,
    },
    /// A territory listed a hex that is not in the map or carries another label.
    #[error("territory {territory} lists hex {hex}, which is not labeled with it")]
    TerritoryMismatch {
        /// The territory making the claim.
        territory: TerritoryId,
        /// The claimed hex.
        hex: HexCoord,
    },
    /// A territory listed the same hex twice.
    #[error("territory {territory} lists hex {hex} more than once")]
    DuplicateHexId {
        /// The territory making the claim.
        territory: TerritoryId,
        /// The repeated hex.
        hex: HexCoord,
    },
    /// A territory's hex list left out a hex labeled with it.
    #[error("territory {territory} does not list hex {hex}, which is labeled with it")]
    UnlistedHex {
        /// The territory with the incomplete list.
        territory: TerritoryId,
        /// The labeled hex missing from the list.
        hex: HexCoord,
    },
    /// A hex id string could not be parsed as `"q,r"`.
    #[error("invalid hex id {0:?}, expected \"q,r\"")]
    InvalidHexId(String),
    /// A hex lies outside the grid's declared bounds.
    #[error("hex {0} lies outside the grid bounds")]
    OutOfBounds(HexCoord),
    /// A stored adjacency entry was not symmetric, named itself, or named an undeclared territory.
    #[error("adjacency between {from} and {to} is invalid")]
    InvalidAdjacency {
        /// The key of the offending entry.
        from: TerritoryId,
        /// The offending neighbor.
        to: TerritoryId,
    },
    /// Stored adjacency lists disagree with the borders drawn by the hexes.
    #[error("stored neighbors of {territory} do not match its hexes: stored {stored:?}, found {derived:?}")]
    StaleAdjacency {
        /// The territory whose list is wrong.
        territory: TerritoryId,
        /// The neighbors listed in the file.
        stored: Vec<TerritoryId>,
        /// The neighbors the hexes actually border.
        derived: Vec<TerritoryId>,
    },
}
