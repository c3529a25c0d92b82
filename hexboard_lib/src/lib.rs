//! Spatial model of a hexagonal game board.
//!
//! Maps are generated ([`world_gen`]) or loaded ([`map`]), placed in world space
//! ([`positioning`]), indexed by chunk ([`chunks`]) and analyzed for territory
//! borders ([`adjacency`]). [`board::HexBoard`] bundles the results for renderers.
//!
//! Everything here is a pure function of its inputs: no global state, no I/O
//! outside of [`map::MapDefinition::from_path`].
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
#![deny(missing_docs)]

pub mod adjacency;
pub mod board;
pub mod chunks;
pub mod error;
pub mod geometry;
pub mod map;
pub mod positioning;
pub mod sampling;
pub mod world_gen;

pub use error::MapError;
