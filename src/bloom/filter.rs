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

use std::hash::Hash;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash;
use crate::hash::HashFunction;

/// False positive probability used when none is given.
pub const DEFAULT_FALSE_POSITIVE_PROBABILITY: f64 = 1.0 / 1_000.0;

/// Lower bound on the false positive probability, tied to the number of
/// precomputed hash functions in the family.
pub const MIN_FALSE_POSITIVE_PROBABILITY: f64 = 1.0 / 1_000_000.0;

const LN_2: f64 = std::f64::consts::LN_2;

/// A Bloom filter for probabilistic set membership testing.
///
/// The filter can return false positives, but never false negatives. The
/// likelihood of a false positive is parametric: the number of bits and hash
/// functions are derived from the expected element count and the desired
/// false positive probability at construction, and never change afterwards.
///
/// The filter doubles as its own accumulator: build private filters on
/// independent shards of the input, then [`merge`](Self::merge) them (bitwise
/// OR, commutative and associative) into the final filter. There is no
/// removal operation; supporting one would require a counting variant, which
/// would forfeit the no-false-negative guarantee.
///
/// # Examples
///
/// ```
/// use deltasketch::bloom::BloomFilter;
///
/// let mut filter = BloomFilter::with_probability(1_000, 0.01).unwrap();
/// filter.add("apple");
///
/// assert!(filter.might_contain("apple"));
/// assert!(!filter.might_contain("grape"));
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter {
    expected_size: u64,
    false_positive_probability: f64,
    num_bits: u32,
    num_hash_functions: u32,
    hash_functions: Vec<HashFunction>,
    /// Bit array packed into words; bit `i` is word `i / 64`, offset `i % 64`.
    words: Vec<u64>,
    /// Cached cardinality estimate, recomputed on first read after a mutation.
    approximate_size: Option<u64>,
}

impl BloomFilter {
    /// Creates a filter with the default false positive probability.
    ///
    /// Equivalent to
    /// [`with_probability(expected_size, DEFAULT_FALSE_POSITIVE_PROBABILITY)`](Self::with_probability).
    pub fn new(expected_size: u64) -> Result<Self, Error> {
        Self::with_probability(expected_size, DEFAULT_FALSE_POSITIVE_PROBABILITY)
    }

    /// Creates a filter sized for `expected_size` elements at the given false
    /// positive probability.
    ///
    /// The number of bits and hash functions are pure functions of the
    /// parameters, so two filters built with equal parameters are always
    /// merge-compatible.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument error if `expected_size` is zero or the
    /// probability lies outside `[MIN_FALSE_POSITIVE_PROBABILITY, 1)`.
    pub fn with_probability(
        expected_size: u64,
        false_positive_probability: f64,
    ) -> Result<Self, Error> {
        Self::validate_parameters(expected_size, false_positive_probability)?;

        let num_bits = Self::optimal_bits(expected_size, false_positive_probability)?;
        let num_hash_functions = Self::optimal_hash_functions(false_positive_probability)?;
        let hash_functions = (0..num_hash_functions)
            .map(hash::generate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            expected_size,
            false_positive_probability,
            num_bits,
            num_hash_functions,
            hash_functions,
            words: vec![0u64; num_bits.div_ceil(64) as usize],
            approximate_size: None,
        })
    }

    /// Creates a filter pre-seeded from serialized bit data.
    ///
    /// The bit data should have been produced by [`to_byte_vec`](Self::to_byte_vec)
    /// on a filter built with the same parameters.
    ///
    /// # Errors
    ///
    /// Fails like [`with_probability`](Self::with_probability) on bad
    /// parameters, and with a decoding error if the buffer holds more bits
    /// than the derived capacity.
    pub fn with_bit_data(
        expected_size: u64,
        false_positive_probability: f64,
        bits: &[u8],
    ) -> Result<Self, Error> {
        let mut filter = Self::with_probability(expected_size, false_positive_probability)?;
        filter.words = super::serialization::unpack_bits(bits, filter.num_bits)?;
        Ok(filter)
    }

    /// Computes the optimal number of bits for the given parameters:
    /// `ceil(-n * ln(p) / ln(2)^2)`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument error if the result does not fit the
    /// bit-index space.
    pub fn optimal_bits(expected_size: u64, false_positive_probability: f64) -> Result<u32, Error> {
        let bits =
            (-(expected_size as f64) * false_positive_probability.ln() / (LN_2 * LN_2)).ceil();
        if bits > u32::MAX as f64 {
            return Err(
                Error::new(ErrorKind::InvalidArgument, "filter would exceed bit-index space")
                    .with_context("expectedSize", expected_size)
                    .with_context("falsePositiveProbability", false_positive_probability),
            );
        }
        Ok(bits as u32)
    }

    /// Computes the optimal number of hash functions for the given false
    /// positive probability: `ceil(-ln(p) / ln(2))`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument error if the probability lies outside
    /// `[MIN_FALSE_POSITIVE_PROBABILITY, 1)`.
    pub fn optimal_hash_functions(false_positive_probability: f64) -> Result<u32, Error> {
        Self::validate_probability(false_positive_probability)?;
        Ok((-false_positive_probability.ln() / LN_2).ceil() as u32)
    }

    /// Adds a value to the filter.
    ///
    /// Afterwards [`might_contain`](Self::might_contain) always returns
    /// `true` for the value.
    pub fn add<T: Hash + ?Sized>(&mut self, value: &T) {
        let hash_code = hash::value_hash_code(value);
        for i in 0..self.hash_functions.len() {
            let index = self.bit_index(&self.hash_functions[i], hash_code);
            self.words[index / 64] |= 1u64 << (index % 64);
        }
        self.approximate_size = None;
    }

    /// Adds every value in the iterator to the filter.
    pub fn add_all<T, I>(&mut self, values: I)
    where
        T: Hash,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.add(&value);
        }
    }

    /// Tests whether the filter might contain a value.
    ///
    /// `false` means the value was definitely never added; `true` means it
    /// may have been (false positives occur with the designed probability as
    /// the filter fills).
    pub fn might_contain<T: Hash + ?Sized>(&self, value: &T) -> bool {
        let hash_code = hash::value_hash_code(value);
        self.hash_functions.iter().all(|hash_function| {
            let index = self.bit_index(hash_function, hash_code);
            self.words[index / 64] & (1u64 << (index % 64)) != 0
        })
    }

    /// Adds every value in the other filter to this filter by bitwise OR.
    ///
    /// Merging is commutative and associative, so a multiset of elements can
    /// be partitioned arbitrarily across filters and the merged result is
    /// always the same.
    ///
    /// # Errors
    ///
    /// Fails with an incompatible-merge error unless both filters have the
    /// same number of bits and of hash functions. Both are pure functions of
    /// the construction parameters, so filters built with equal parameters
    /// never fail here.
    pub fn merge(&mut self, other: &BloomFilter) -> Result<(), Error> {
        if self.num_bits != other.num_bits || self.num_hash_functions != other.num_hash_functions {
            return Err(
                Error::new(
                    ErrorKind::IncompatibleMerge,
                    "filters must have the same number of bits and hash functions",
                )
                .with_context("numBits", self.num_bits)
                .with_context("otherNumBits", other.num_bits)
                .with_context("numHashFunctions", self.num_hash_functions)
                .with_context("otherNumHashFunctions", other.num_hash_functions),
            );
        }
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= *other_word;
        }
        self.approximate_size = None;
        Ok(())
    }

    /// Returns true if no bits are set. Equivalent to, but cheaper than,
    /// `approximate_size() == 0`.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Estimates the number of distinct elements added so far from the
    /// bit-array fill ratio: `-m/k * ln(1 - set/m)`.
    ///
    /// The estimate is cached until the next mutation, which is why this
    /// takes `&mut self`; the filter itself carries no interior mutability.
    pub fn approximate_size(&mut self) -> u64 {
        if let Some(cached) = self.approximate_size {
            return cached;
        }
        let m = self.num_bits as f64;
        let k = self.num_hash_functions as f64;
        let set = self.count_set_bits() as f64;
        let estimate = (-m / k * (1.0 - set / m).ln()).ceil() as u64;
        self.approximate_size = Some(estimate);
        estimate
    }

    /// Returns the expected element count given at construction.
    pub fn expected_size(&self) -> u64 {
        self.expected_size
    }

    /// Returns the false positive probability given at construction.
    pub fn false_positive_probability(&self) -> f64 {
        self.false_positive_probability
    }

    /// Returns the derived number of bits in the filter.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the derived number of hash functions.
    pub fn num_hash_functions(&self) -> u32 {
        self.num_hash_functions
    }

    /// Returns the bit data as a minimal little-endian byte vector, suitable
    /// for storage or transport. Byte `i` holds bits `8*i..8*i+8`,
    /// least-significant bit first; trailing zero bytes are trimmed.
    pub fn to_byte_vec(&self) -> Vec<u8> {
        super::serialization::pack_bits(&self.words)
    }

    /// Builds a filter sized for `expected_size` elements and adds every item.
    ///
    /// `expected_size` is not checked against the actual item count. For
    /// larger inputs, split the source into shards, fit one filter per shard
    /// with the same parameters, and [`merge`](Self::merge) the results.
    ///
    /// # Examples
    ///
    /// ```
    /// use deltasketch::bloom::BloomFilter;
    ///
    /// let words = ["ash", "beech", "cedar"];
    /// let filter = BloomFilter::fit(words, 3, 0.001).unwrap();
    /// assert!(filter.might_contain("cedar"));
    /// ```
    pub fn fit<T, I>(items: I, expected_size: u64, false_positive_probability: f64) -> Result<Self, Error>
    where
        T: Hash,
        I: IntoIterator<Item = T>,
    {
        let mut filter = Self::with_probability(expected_size, false_positive_probability)?;
        filter.add_all(items);
        Ok(filter)
    }

    /// Builds a filter sized to the iterator's own length and adds every item.
    pub fn fit_counted<T, I>(items: I, false_positive_probability: f64) -> Result<Self, Error>
    where
        T: Hash,
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        let expected_size = items.len() as u64;
        Self::fit(items, expected_size, false_positive_probability)
    }

    /// Index of the bit that a hash function maps a value hash code to.
    ///
    /// The absolute value is taken in 64-bit space so that `i32::MIN` folds
    /// into range like any other code.
    fn bit_index(&self, hash_function: &HashFunction, hash_code: i32) -> usize {
        ((hash_function.hash(hash_code) as i64).unsigned_abs() % self.num_bits as u64) as usize
    }

    fn count_set_bits(&self) -> u64 {
        self.words.iter().map(|word| word.count_ones() as u64).sum()
    }

    fn validate_parameters(expected_size: u64, false_positive_probability: f64) -> Result<(), Error> {
        if expected_size == 0 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "expected size must be positive",
            ));
        }
        Self::validate_probability(false_positive_probability)
    }

    fn validate_probability(false_positive_probability: f64) -> Result<(), Error> {
        if !(false_positive_probability > 0.0 && false_positive_probability < 1.0) {
            return Err(
                Error::new(
                    ErrorKind::InvalidArgument,
                    "false positive probability must be in the range (0, 1)",
                )
                .with_context("falsePositiveProbability", false_positive_probability),
            );
        }
        if false_positive_probability < MIN_FALSE_POSITIVE_PROBABILITY {
            return Err(
                Error::new(
                    ErrorKind::InvalidArgument,
                    "false positive probability must not be below the minimum",
                )
                .with_context("falsePositiveProbability", false_positive_probability)
                .with_context("min", MIN_FALSE_POSITIVE_PROBABILITY),
            );
        }
        Ok(())
    }
}

/// Equality covers parameters and bit data; the cached size estimate is
/// derived state and deliberately excluded.
impl PartialEq for BloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.expected_size == other.expected_size
            && self.false_positive_probability == other.false_positive_probability
            && self.num_bits == other.num_bits
            && self.num_hash_functions == other.num_hash_functions
            && self.words == other.words
    }
}
