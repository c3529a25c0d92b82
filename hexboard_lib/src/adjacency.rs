//! Derives which territories border each other.
//!
//! Two territories are adjacent when at least one hex of the first shares an
//! edge with a hex of the second. Void hexes never border anything.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::geometry::HexCoord;
use crate::map::{MapHex, TerritoryId};

/// Territory id to the ids of every territory sharing an edge with it.
///
/// Keys are in first-seen order; neighbor sets are sorted.
pub type AdjacencyMap = IndexMap<TerritoryId, BTreeSet<TerritoryId>>;

/// Computes the adjacency of every territory labeling at least one hex.
///
/// The result is symmetric and never lists a territory as its own neighbor.
#[must_use]
pub fn resolve_adjacency(hexes: &[MapHex]) -> AdjacencyMap {
    resolve_adjacency_for([], hexes)
}

/// As [`resolve_adjacency`], but also lists each of `territories` as a key,
/// even if no hex carries its label.
#[must_use]
pub fn resolve_adjacency_for<'a>(
    territories: impl IntoIterator<Item = &'a TerritoryId>,
    hexes: &[MapHex],
) -> AdjacencyMap {
    let mut adjacency: AdjacencyMap = territories
        .into_iter()
        .map(|id| (id.clone(), BTreeSet::new()))
        .collect();

    let labels: HashMap<HexCoord, &TerritoryId> = hexes
        .iter()
        .filter_map(|hex| Some((hex.coord, hex.territory_id.as_ref()?)))
        .collect();

    for hex in hexes {
        let Some(territory) = &hex.territory_id else {
            continue;
        };
        adjacency.entry(territory.clone()).or_default();

        for neighbor in hex.coord.neighbors() {
            let Some(&other) = labels.get(&neighbor) else {
                continue;
            };
            if other == territory {
                continue;
            }

            adjacency
                .entry(territory.clone())
                .or_default()
                .insert(other.clone());
            adjacency
                .entry(other.clone())
                .or_default()
                .insert(territory.clone());
        }
    }

    adjacency
}

/// Flattens neighbor sets into the sorted lists stored in a [`MapDefinition`](crate::map::MapDefinition).
#[must_use]
pub fn adjacency_lists(adjacency: &AdjacencyMap) -> IndexMap<TerritoryId, Vec<TerritoryId>> {
    adjacency
        .iter()
        .map(|(id, neighbors)| (id.clone(), neighbors.iter().cloned().collect()))
        .collect()
}
