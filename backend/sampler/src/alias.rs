//! Vose's alias method.
//!
//! Construction is O(n); each draw costs one uniform sample and one table
//! lookup. The `probability` and `alias` tables are immutable after
//! construction, so concurrent drawers only contend on the generator lock,
//! which is held just long enough to produce one uniform value.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum SamplerError {
    #[error("weight vector is empty")]
    Empty,

    #[error("weight at index {index} is not a finite non-negative number ({weight})")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("weights sum to zero")]
    ZeroSum,
}

/// Weighted random index generator.
pub struct WeightedSampler {
    probability: Vec<f64>,
    alias: Vec<usize>,
    rng: Mutex<StdRng>,
}

impl WeightedSampler {
    /// Build a sampler seeded from system entropy.
    pub fn new(weights: &[f64]) -> Result<Self, SamplerError> {
        Self::build(weights, StdRng::from_entropy())
    }

    /// Build a sampler with a fixed seed (reproducible draws).
    pub fn with_seed(weights: &[f64], seed: u64) -> Result<Self, SamplerError> {
        Self::build(weights, StdRng::seed_from_u64(seed))
    }

    fn build(weights: &[f64], rng: StdRng) -> Result<Self, SamplerError> {
        let scaled = normalize(weights)?;
        let (probability, alias) = alias_tables(scaled);
        debug!(outcomes = probability.len(), "Alias tables built");
        Ok(Self { probability, alias, rng: Mutex::new(rng) })
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.probability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probability.is_empty()
    }

    /// Draw one index, distributed according to the construction weights.
    pub fn sample(&self) -> usize {
        let n = self.probability.len();
        let x = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0.0..n as f64)
        };
        self.resolve(x)
    }

    /// Map a uniform value in `[0, n)` to an outcome.
    fn resolve(&self, x: f64) -> usize {
        let n = self.probability.len();
        let i = (x.floor() as usize).min(n - 1);
        if x - (i as f64) < self.probability[i] {
            i
        } else {
            self.alias[i]
        }
    }
}

impl std::fmt::Debug for WeightedSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedSampler")
            .field("probability", &self.probability)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// Normalize to sum 1, then scale so the mean weight is 1.
fn normalize(weights: &[f64]) -> Result<Vec<f64>, SamplerError> {
    if weights.is_empty() {
        return Err(SamplerError::Empty);
    }
    for (index, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SamplerError::InvalidWeight { index, weight });
        }
    }
    // Rescale by the largest weight first so the sum cannot overflow.
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return Err(SamplerError::ZeroSum);
    }
    let sum: f64 = weights.iter().map(|w| w / max).sum();
    let n = weights.len() as f64;
    Ok(weights.iter().map(|w| w / max / sum * n).collect())
}

fn alias_tables(mut scaled: Vec<f64>) -> (Vec<f64>, Vec<usize>) {
    let n = scaled.len();
    let mut probability = vec![0.0; n];
    let mut alias = vec![0; n];

    let (mut small, mut large): (Vec<usize>, Vec<usize>) =
        (0..n).partition(|&i| scaled[i] < 1.0);

    while !small.is_empty() && !large.is_empty() {
        let (Some(s), Some(l)) = (small.pop(), large.pop()) else {
            break;
        };
        probability[s] = scaled[s];
        alias[s] = l;
        scaled[l] -= 1.0 - scaled[s];
        if scaled[l] < 1.0 {
            small.push(l);
        } else {
            large.push(l);
        }
    }

    // Floating-point residue: whatever is left is drawn outright.
    for i in small.into_iter().chain(large) {
        probability[i] = 1.0;
    }

    (probability, alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequencies(sampler: &WeightedSampler, draws: usize) -> Vec<f64> {
        let mut counts = vec![0usize; sampler.len()];
        for _ in 0..draws {
            counts[sampler.sample()] += 1;
        }
        counts.into_iter().map(|c| c as f64 / draws as f64).collect()
    }

    #[test]
    fn converges_to_weights() {
        let sampler = WeightedSampler::with_seed(&[1.0, 1.0, 2.0], 7).unwrap();
        let freq = frequencies(&sampler, 100_000);
        assert!((freq[0] - 0.25).abs() < 0.01, "index 0: {}", freq[0]);
        assert!((freq[1] - 0.25).abs() < 0.01, "index 1: {}", freq[1]);
        assert!((freq[2] - 0.5).abs() < 0.01, "index 2: {}", freq[2]);
    }

    #[test]
    fn single_outcome_always_zero() {
        let sampler = WeightedSampler::with_seed(&[5.0], 1).unwrap();
        for _ in 0..1000 {
            assert_eq!(sampler.sample(), 0);
        }
    }

    #[test]
    fn zero_weight_never_drawn() {
        let sampler = WeightedSampler::with_seed(&[0.0, 3.0, 1.0], 11).unwrap();
        for _ in 0..10_000 {
            assert_ne!(sampler.sample(), 0);
        }
    }

    #[test]
    fn uneven_weights_converge() {
        let weights = [10.0, 1.0, 5.0, 4.0];
        let sampler = WeightedSampler::with_seed(&weights, 3).unwrap();
        let freq = frequencies(&sampler, 200_000);
        for (f, w) in freq.iter().zip(weights) {
            assert!((f - w / 20.0).abs() < 0.01, "{f} vs {}", w / 20.0);
        }
    }

    #[test]
    fn tables_reproduce_marginals() {
        // Each column i contributes probability[i]/n to i and the rest to alias[i].
        let weights = [1.0, 2.0, 3.0, 4.0, 10.0];
        let sampler = WeightedSampler::with_seed(&weights, 0).unwrap();
        let n = weights.len() as f64;
        let mut mass = vec![0.0; weights.len()];
        for i in 0..weights.len() {
            mass[i] += sampler.probability[i] / n;
            mass[sampler.alias[i]] += (1.0 - sampler.probability[i]) / n;
        }
        for (m, w) in mass.iter().zip(weights) {
            assert!((m - w / 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn resolve_picks_column_or_alias() {
        let sampler = WeightedSampler::with_seed(&[1.0, 3.0], 0).unwrap();
        // scaled = [0.5, 1.5]; column 0 keeps half its width, aliasing to 1.
        assert_eq!(sampler.resolve(0.25), 0);
        assert_eq!(sampler.resolve(0.75), 1);
        assert_eq!(sampler.resolve(1.5), 1);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(WeightedSampler::new(&[]).unwrap_err(), SamplerError::Empty);
        assert_eq!(WeightedSampler::new(&[0.0, 0.0]).unwrap_err(), SamplerError::ZeroSum);
        assert!(matches!(
            WeightedSampler::new(&[1.0, -1.0]).unwrap_err(),
            SamplerError::InvalidWeight { index: 1, .. }
        ));
        assert!(matches!(
            WeightedSampler::new(&[f64::NAN]).unwrap_err(),
            SamplerError::InvalidWeight { index: 0, .. }
        ));
    }

    #[test]
    fn huge_weights_keep_their_proportions() {
        let sampler = WeightedSampler::with_seed(&[f64::MAX, f64::MAX, 1.0], 1).unwrap();
        let freq = frequencies(&sampler, 30_000);
        assert_eq!(freq[2], 0.0);
        assert!((freq[0] - 0.5).abs() < 0.02, "index 0: {}", freq[0]);
        assert!((freq[1] - 0.5).abs() < 0.02, "index 1: {}", freq[1]);
    }

    #[test]
    fn concurrent_draws_stay_in_range() {
        let sampler = std::sync::Arc::new(WeightedSampler::new(&[1.0, 2.0, 3.0]).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sampler = sampler.clone();
                std::thread::spawn(move || (0..1000).all(|_| sampler.sample() < 3))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
