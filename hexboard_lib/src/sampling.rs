//! Weighted random draws without replacement.
//!
//! Items are grouped into categories, each with a weight. A draw first picks a
//! category in proportion to its weight, considering only categories that still
//! hold items, then removes one item from it. Used for things like reward decks
//! handed out at map setup.

use std::hash::Hash;

use indexmap::IndexMap;
use rand::Rng;
use thiserror::Error;

/// A category weight was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("category weight must be finite and non-negative, got {0}")]
pub struct InvalidWeight(pub f64);

/// The remaining items of one category.
#[derive(Debug, Clone, PartialEq)]
struct Category<T> {
    /// Relative chance of drawing from this category.
    weight: f64,
    /// Items not drawn yet.
    remaining: Vec<T>,
}

/// A working pool of weighted categories that shrinks as items are drawn.
///
/// The pool owns its items: build a fresh pool for every independent set of draws.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPool<C, T>
where
    C: Clone + Eq + Hash,
{
    /// Categories in insertion order, which fixes the draw order for a given seed.
    categories: IndexMap<C, Category<T>>,
}

impl<C, T> Default for WeightedPool<C, T>
where
    C: Clone + Eq + Hash,
{
    fn default() -> Self {
        WeightedPool {
            categories: IndexMap::new(),
        }
    }
}

impl<C, T> WeightedPool<C, T>
where
    C: Clone + Eq + Hash,
{
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `items` to `category`, setting its weight.
    ///
    /// Adding to an existing category appends its items and replaces its weight.
    /// A weight of zero keeps the category from ever being drawn.
    pub fn insert(
        &mut self,
        category: C,
        weight: f64,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), InvalidWeight> {
        if !weight.is_finite() || weight < 0. {
            return Err(InvalidWeight(weight));
        }

        let entry = self.categories.entry(category).or_insert(Category {
            weight,
            remaining: Vec::new(),
        });
        entry.weight = weight;
        entry.remaining.extend(items);

        Ok(())
    }

    /// The number of items left in the whole pool.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.categories
            .values()
            .map(|category| category.remaining.len())
            .sum()
    }

    /// The number of items left in `category`.
    #[must_use]
    pub fn remaining_in(&self, category: &C) -> usize {
        self.categories
            .get(category)
            .map_or(0, |category| category.remaining.len())
    }

    /// Can any further item be drawn?
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.drawable().next().is_none()
    }

    /// Categories that can currently be drawn from.
    fn drawable(&self) -> impl Iterator<Item = (usize, &Category<T>)> {
        self.categories
            .values()
            .enumerate()
            .filter(|(_, category)| category.weight > 0. && !category.remaining.is_empty())
    }

    /// Removes one item, chosen by category weight, and returns it with its category.
    ///
    /// Returns `None` once no category with a positive weight has items left.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(C, T)> {
        let total: f64 = self.drawable().map(|(_, category)| category.weight).sum();
        if total <= 0. {
            return None;
        }

        let threshold = rng.gen_range(0. ..total);
        let mut cumulative = 0.;
        let mut chosen = None;
        for (index, category) in self.drawable() {
            chosen = Some(index);
            cumulative += category.weight;
            if threshold < cumulative {
                break;
            }
        }

        // Rounding can leave the threshold just past the final sum; `chosen` then
        // holds the last drawable category, which is the right answer.
        let (key, category) = self.categories.get_index_mut(chosen?)?;
        let item_index = rng.gen_range(0..category.remaining.len());
        let item = category.remaining.swap_remove(item_index);

        Some((key.clone(), item))
    }

    /// Draws up to `n` items, stopping early if the pool runs dry.
    pub fn draw_many<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<(C, T)> {
        let mut drawn = Vec::with_capacity(n.min(self.remaining()));
        while drawn.len() < n {
            match self.draw(rng) {
                Some(item) => drawn.push(item),
                None => break,
            }
        }
        drawn
    }
}
