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

use crate::categorical::CategoricalDistribution;
use crate::error::Error;
use crate::error::ErrorKind;

/// Accumulator of category observations, the mutable half of the categorical
/// distribution's lifecycle.
///
/// A sketch collects per-category counts; [`fit`](Self::fit) snapshots them
/// into an immutable [`CategoricalDistribution`]. Sketches merge by adding
/// counts, which is commutative and associative, so observations can be
/// partitioned arbitrarily across sketches (one per worker, say) and the
/// fitted distribution is the same as from a single pass.
///
/// Categories are kept ordered so that the fitted distribution is canonical:
/// equal multisets of observations always produce equal distributions,
/// however the observations were partitioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoricalSketch<T: Ord> {
    counts: BTreeMap<T, u64>,
}

impl<T: Ord> CategoricalSketch<T> {
    /// Creates an empty sketch.
    pub fn new() -> Self {
        Self { counts: BTreeMap::new() }
    }

    /// Creates a sketch pre-seeded from `(category, count)` pairs.
    ///
    /// Counts for repeated categories accumulate; zero counts are dropped.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut sketch = Self::new();
        for (category, count) in counts {
            sketch.observe_weighted(category, count);
        }
        sketch
    }

    /// Records one observation of a category.
    pub fn observe(&mut self, category: T) {
        self.observe_weighted(category, 1);
    }

    /// Records `count` observations of a category. A zero count is a no-op.
    pub fn observe_weighted(&mut self, category: T, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(category).or_insert(0) += count;
    }

    /// Adds every count from the other sketch into this one.
    pub fn merge(&mut self, other: CategoricalSketch<T>) {
        for (category, count) in other.counts {
            self.observe_weighted(category, count);
        }
    }

    /// Returns true if the sketch has recorded no observations.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct categories observed.
    pub fn size(&self) -> usize {
        self.counts.len()
    }

    /// Total number of observations recorded.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates `(category, count)` pairs in category order.
    pub fn counts(&self) -> impl Iterator<Item = (&T, u64)> {
        self.counts.iter().map(|(category, &count)| (category, count))
    }

    /// Fits a distribution to the counts observed so far.
    ///
    /// The fit is a snapshot: the sketch is unchanged and may keep
    /// accumulating afterwards without affecting distributions already
    /// fitted from it.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if the sketch is empty; an empty
    /// sketch has no distribution to describe.
    pub fn fit(&self) -> Result<CategoricalDistribution<T>, Error>
    where
        T: Clone,
    {
        if self.counts.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidState,
                "cannot fit a distribution to an empty sketch",
            ));
        }
        CategoricalDistribution::from_weights(
            self.counts.iter().map(|(category, &count)| (category.clone(), count)),
        )
    }
}

impl<T: Ord> Extend<T> for CategoricalSketch<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for category in iter {
            self.observe(category);
        }
    }
}

impl<T: Ord> FromIterator<T> for CategoricalSketch<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sketch = Self::new();
        sketch.extend(iter);
        sketch
    }
}
