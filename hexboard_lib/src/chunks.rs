//! Groups positioned hexes into fixed-size world-space chunks.
//!
//! Chunks are only an index: the map still owns every hex. Renderers use the
//! index to look at the handful of chunks overlapping their viewport instead of
//! scanning the whole map.

use core::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use indexmap::IndexMap;
use itertools::Either;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{HexCoord, WorldPos};
use crate::positioning::PositionedHex;

/// Edge length of a chunk, in world units.
pub const CHUNK_WORLD_SIZE: f64 = 300.;

/// Identifies one chunk-sized cell of world space.
///
/// The string form is `"x_y"`, where `x` and `y` count chunks from the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ChunkKey {
    /// Chunk column.
    pub x: i64,
    /// Chunk row.
    pub y: i64,
}

impl ChunkKey {
    /// Creates a key from chunk column and row.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        ChunkKey { x, y }
    }

    /// The chunk whose cell contains `pos`.
    #[inline]
    #[must_use]
    pub fn containing(pos: WorldPos) -> Self {
        ChunkKey {
            x: (pos.x / CHUNK_WORLD_SIZE).floor() as i64,
            y: (pos.y / CHUNK_WORLD_SIZE).floor() as i64,
        }
    }
}

impl Display for ChunkKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

/// A chunk key string was not of the form `"x_y"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid chunk key {0:?}, expected \"x_y\"")]
pub struct ParseChunkKeyError(String);

impl FromStr for ChunkKey {
    type Err = ParseChunkKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseChunkKeyError(s.to_string());
        // Split on the separator after the first character, so "-1_-2" works
        let separator = s
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '_')
            .map(|(i, _)| i)
            .ok_or_else(invalid)?;
        let x = s[..separator].parse().map_err(|_| invalid())?;
        let y = s[separator + 1..].parse().map_err(|_| invalid())?;

        Ok(ChunkKey { x, y })
    }
}

impl From<ChunkKey> for String {
    fn from(key: ChunkKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ChunkKey {
    type Error = ParseChunkKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Chunk key to the hexes whose centers lie in that chunk.
///
/// Chunks appear in the order their first hex was seen; hexes keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkIndex {
    /// The non-empty chunks.
    chunks: IndexMap<ChunkKey, Vec<HexCoord>>,
}

/// Builds the chunk index for `positioned` in a single pass.
///
/// Every hex lands in exactly one chunk: the one holding its center.
#[must_use]
pub fn build_chunks(positioned: &[PositionedHex]) -> ChunkIndex {
    let mut chunks: IndexMap<ChunkKey, Vec<HexCoord>> = IndexMap::new();
    for hex in positioned {
        chunks.entry(hex.chunk_key).or_default().push(hex.id());
    }

    ChunkIndex { chunks }
}

impl ChunkIndex {
    /// The hexes of the chunk at `key`, if it holds any.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &ChunkKey) -> Option<&[HexCoord]> {
        self.chunks.get(key).map(Vec::as_slice)
    }

    /// Iterates over every non-empty chunk.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkKey, &[HexCoord])> {
        self.chunks.iter().map(|(key, hexes)| (key, hexes.as_slice()))
    }

    /// The number of non-empty chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Does the index hold no chunks at all?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The keys of every chunk cell overlapping the rectangle from `min` to `max`.
    ///
    /// Cells are listed row by row, whether or not they hold any hexes. This yields
    /// one key per cell, so huge rectangles take a long time; use
    /// [`ChunkIndex::chunks_in_rect`] to visit only chunks that exist.
    pub fn keys_in_rect(min: WorldPos, max: WorldPos) -> impl Iterator<Item = ChunkKey> {
        let low = ChunkKey::containing(min);
        let high = ChunkKey::containing(max);

        (low.y..=high.y).flat_map(move |y| (low.x..=high.x).map(move |x| ChunkKey::new(x, y)))
    }

    /// The non-empty chunks overlapping the rectangle from `min` to `max`.
    ///
    /// Costs at most one lookup per chunk in the index, however large the rectangle.
    /// Chunks come row by row when the rectangle spans fewer cells than the index
    /// holds chunks, and in index order otherwise.
    pub fn chunks_in_rect(
        &self,
        min: WorldPos,
        max: WorldPos,
    ) -> impl Iterator<Item = (&ChunkKey, &[HexCoord])> {
        let low = ChunkKey::containing(min);
        let high = ChunkKey::containing(max);
        let span = |from: i64, to: i64| (i128::from(to) - i128::from(from) + 1).max(0);
        let cells = span(low.x, high.x).saturating_mul(span(low.y, high.y));

        if cells <= self.chunks.len() as i128 {
            Either::Left(Self::keys_in_rect(min, max).filter_map(move |key| {
                self.chunks
                    .get_key_value(&key)
                    .map(|(key, hexes)| (key, hexes.as_slice()))
            }))
        } else {
            Either::Right(self.iter().filter(move |(key, _)| {
                (low.x..=high.x).contains(&key.x) && (low.y..=high.y).contains(&key.y)
            }))
        }
    }
}
