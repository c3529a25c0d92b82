//! Reading weighted pool descriptions from disk.

use std::path::Path;

use anyhow::Context;
use hexboard_lib::sampling::WeightedPool;
use indexmap::IndexMap;
use serde::Deserialize;

/// One category of a pool file.
#[derive(Debug, Clone, Deserialize)]
struct RawCategory {
    /// Relative chance of drawing from this category.
    weight: f64,
    /// Anything JSON can express.
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// Loads a `{category: {weight, items}}` file into a fresh pool.
///
/// Categories keep their file order, so a given seed always draws the same items.
pub(crate) fn load_pool(path: &Path) -> anyhow::Result<WeightedPool<String, serde_json::Value>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("could not read pool file {}", path.display()))?;
    let raw: IndexMap<String, RawCategory> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid pool description", path.display()))?;

    let mut pool = WeightedPool::new();
    for (category, RawCategory { weight, items }) in raw {
        pool.insert(category.clone(), weight, items)
            .with_context(|| format!("bad weight for category {category:?}"))?;
    }

    Ok(pool)
}
