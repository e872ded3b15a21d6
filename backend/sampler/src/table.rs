use crate::alias::{SamplerError, WeightedSampler};

/// A list of items paired with an alias sampler over their weights.
#[derive(Debug)]
pub struct WeightedTable<T> {
    items: Vec<T>,
    sampler: WeightedSampler,
}

impl<T> WeightedTable<T> {
    /// Build from `(item, weight)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (T, f64)>) -> Result<Self, SamplerError> {
        let (items, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();
        let sampler = WeightedSampler::new(&weights)?;
        Ok(Self { items, sampler })
    }

    pub fn with_seed(
        entries: impl IntoIterator<Item = (T, f64)>,
        seed: u64,
    ) -> Result<Self, SamplerError> {
        let (items, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();
        let sampler = WeightedSampler::with_seed(&weights, seed)?;
        Ok(Self { items, sampler })
    }

    /// Pick one item at random according to its weight.
    pub fn choose(&self) -> &T {
        &self.items[self.sampler.sample()]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
