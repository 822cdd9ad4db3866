// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::collections::BTreeMap;

use crate::common::random::RandomSource;
use crate::error::Error;
use crate::error::ErrorKind;

/// A discrete distribution over categories with integer weights.
///
/// Internally the distribution is a cumulative weight table: each category is
/// keyed by the exclusive prefix sum of the weights before it, so sampling is
/// one bounded uniform draw followed by a floor lookup, `O(log n)` in the
/// number of categories.
///
/// The distribution is immutable once built and holds no generator state, so
/// it can be shared freely across threads; every [`sample`](Self::sample)
/// call borrows a [`RandomSource`] from the caller.
///
/// # Examples
///
/// ```
/// use deltasketch::categorical::CategoricalDistribution;
/// use deltasketch::common::random::XorShift64;
///
/// let dist = CategoricalDistribution::from_weights([("heads", 1), ("tails", 3)]).unwrap();
/// let mut rng = XorShift64::seeded(17);
/// let draw = dist.sample(&mut rng);
/// assert!(*draw == "heads" || *draw == "tails");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalDistribution<T> {
    /// Exclusive cumulative weight before each category, in insertion order
    /// of the weights that built the table.
    offsets: BTreeMap<u64, T>,
    /// Sum of all category weights. Always positive.
    total: u64,
}

impl<T> CategoricalDistribution<T> {
    /// Builds a distribution from `(category, weight)` pairs.
    ///
    /// Zero-weight categories are dropped: they cannot be sampled, and
    /// keeping them would make equality depend on unsampleable entries.
    /// Callers who need to distinguish "absent" from "weight zero" should
    /// track that upstream.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if no category has positive weight;
    /// a distribution must have at least one sampleable category. Fails with
    /// an invalid-argument error if the weights sum past `u64::MAX`.
    pub fn from_weights<I>(weights: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut offsets = BTreeMap::new();
        let mut total = 0u64;
        for (category, weight) in weights {
            if weight == 0 {
                continue;
            }
            offsets.insert(total, category);
            total = total.checked_add(weight).ok_or_else(|| {
                Error::new(ErrorKind::InvalidArgument, "total weight overflows u64")
                    .with_context("weight", weight)
            })?;
        }
        if total == 0 {
            return Err(Error::new(
                ErrorKind::InvalidState,
                "at least one category must have positive weight",
            ));
        }
        Ok(Self { offsets, total })
    }

    /// Draws a category with probability proportional to its weight.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> &T {
        let target = rng.next_u64_below(self.total);
        let (_, category) = self
            .offsets
            .range(..=target)
            .next_back()
            .expect("cumulative weight table starts at offset zero");
        category
    }

    /// Transforms every category, keeping the weight structure intact.
    ///
    /// The mapping is applied as-is: if `f` sends two categories to the same
    /// value, the result has duplicate categories whose weights are NOT
    /// combined. That is usually harmless for sampling (the duplicates'
    /// probabilities sum correctly) but matters for enumeration and equality.
    pub fn map<U, F>(self, mut f: F) -> CategoricalDistribution<U>
    where
        F: FnMut(T) -> U,
    {
        CategoricalDistribution {
            offsets: self
                .offsets
                .into_iter()
                .map(|(offset, category)| (offset, f(category)))
                .collect(),
            total: self.total,
        }
    }

    /// Enumerates `(category, weight)` pairs in cumulative-offset order.
    ///
    /// Weights are recovered lazily from consecutive offsets; the final
    /// category's weight is the gap up to the total.
    pub fn categories(&self) -> impl Iterator<Item = (&T, u64)> {
        let next_offsets = self
            .offsets
            .keys()
            .skip(1)
            .copied()
            .chain(std::iter::once(self.total));
        self.offsets
            .iter()
            .zip(next_offsets)
            .map(|((offset, category), next_offset)| (category, next_offset - offset))
    }

    /// Number of categories with positive weight.
    pub fn size(&self) -> usize {
        self.offsets.len()
    }

    /// Sum of all category weights.
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::random::XorShift64;

    #[test]
    fn test_from_weights_drops_zero_weights() {
        let dist =
            CategoricalDistribution::from_weights([("a", 2), ("b", 0), ("c", 3)]).unwrap();
        assert_eq!(dist.size(), 2);
        assert_eq!(dist.total(), 5);

        let categories: Vec<_> = dist.categories().collect();
        assert_eq!(categories, vec![(&"a", 2), (&"c", 3)]);
    }

    #[test]
    fn test_from_weights_rejects_empty_and_all_zero() {
        assert!(CategoricalDistribution::<&str>::from_weights([]).is_err());
        assert!(CategoricalDistribution::from_weights([("a", 0)]).is_err());
    }

    #[test]
    fn test_from_weights_rejects_overflowing_total() {
        let err = CategoricalDistribution::from_weights([("a", u64::MAX), ("b", 1)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_sample_never_returns_zero_weight_category() {
        let dist =
            CategoricalDistribution::from_weights([("live", 1), ("dead", 0)]).unwrap();
        let mut rng = XorShift64::seeded(3);
        for _ in 0..1_000 {
            assert_eq!(*dist.sample(&mut rng), "live");
        }
    }

    #[test]
    fn test_sample_respects_weights() {
        let dist = CategoricalDistribution::from_weights([("x", 1), ("y", 3)]).unwrap();
        let mut rng = XorShift64::seeded(19);
        let draws = 100_000;
        let mut y_count = 0u32;
        for _ in 0..draws {
            if *dist.sample(&mut rng) == "y" {
                y_count += 1;
            }
        }
        let fraction = y_count as f64 / draws as f64;
        assert!((0.72..=0.78).contains(&fraction), "y fraction {fraction} not near 0.75");
    }

    #[test]
    fn test_map_preserves_structure() {
        let dist = CategoricalDistribution::from_weights([(1u32, 2), (2u32, 5)]).unwrap();
        let mapped = dist.map(|n| n * 10);
        assert_eq!(mapped.total(), 7);
        let categories: Vec<_> = mapped.categories().collect();
        assert_eq!(categories, vec![(&10, 2), (&20, 5)]);
    }

    #[test]
    fn test_categories_recovers_weights() {
        let dist =
            CategoricalDistribution::from_weights([("a", 7), ("b", 1), ("c", 4)]).unwrap();
        let weights: u64 = dist.categories().map(|(_, w)| w).sum();
        assert_eq!(weights, dist.total());
    }
}
