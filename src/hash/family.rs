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

/// The first 20 prime numbers, the basis for the hash family. Because the
/// optimal hash function count is `ceil(-ln(p) / ln(2))`, 20 functions are
/// sufficient down to a false positive probability of 1 in 1,048,576.
const PRIMES: [i32; 20] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Number of hash functions the family can generate.
pub const MAX_HASH_FUNCTIONS: u32 = PRIMES.len() as u32;

/// The seed for the scramble step. It is the 1,000th prime number.
const SCRAMBLE_SEED: u32 = 7919;

/// Seed for [`value_hash_code`]. Every filter must hash values the same way
/// for serialized bit arrays to be interoperable.
const VALUE_HASH_SEED: u32 = 9001;

/// One member of the hash family: scrambles its input with a fixed-seed
/// avalanche mix, then combines it with a per-index prime multiplier.
///
/// Members are generated by [`generate`] in a fixed, globally agreed order.
/// The same `(index, hash_code)` pair always yields the same output, across
/// processes and versions; serialized filters depend on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFunction {
    prime: i32,
}

impl HashFunction {
    /// Maps an input hash code to another integer.
    pub fn hash(&self, hash_code: i32) -> i32 {
        hash_code.wrapping_add(self.prime.wrapping_mul(scramble(hash_code)))
    }
}

/// Generate the numbered hash function. The given index is a number starting
/// from 0. All Bloom filters must use the same hash functions in the same
/// order; this is what makes filters built in different processes mergeable.
///
/// # Errors
///
/// Fails with an invalid-argument error if `index` is not below
/// [`MAX_HASH_FUNCTIONS`].
///
/// # Examples
///
/// ```
/// use deltasketch::hash::generate;
///
/// let h = generate(0).unwrap();
/// assert_eq!(h.hash(12345), h.hash(12345));
/// assert!(generate(20).is_err());
/// ```
pub fn generate(index: u32) -> Result<HashFunction, Error> {
    let Some(&prime) = PRIMES.get(index as usize) else {
        return Err(
            Error::new(ErrorKind::InvalidArgument, "hash function index out of range")
                .with_context("index", index)
                .with_context("max", MAX_HASH_FUNCTIONS),
        );
    };
    Ok(HashFunction { prime })
}

/// Computes a stable 32-bit hash code for a value.
///
/// The code is derived from the value's [`Hash`] byte stream via MurmurHash3
/// with a fixed seed, so it is reproducible across processes as long as the
/// value's `Hash` implementation feeds deterministic bytes (true for the
/// standard library's scalars, strings, slices, and tuples thereof).
pub fn value_hash_code<T: Hash + ?Sized>(value: &T) -> i32 {
    let mut hasher = mur3::Hasher128::with_seed(VALUE_HASH_SEED);
    value.hash(&mut hasher);
    let (lo, _hi) = hasher.finish128();
    lo as i32
}

/// MurmurHash3 x86_32 of a single 32-bit block with the fixed scramble seed.
fn scramble(input: i32) -> i32 {
    let mut k1 = (input as u32).wrapping_mul(0xcc9e2d51);
    k1 = k1.rotate_left(15);
    k1 = k1.wrapping_mul(0x1b873593);

    let mut h1 = SCRAMBLE_SEED ^ k1;
    h1 = h1.rotate_left(13);
    h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);

    // Finalization: the input is a single 32-bit int, so the length is 4.
    h1 ^= 4;

    // fmix32
    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85ebca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2ae35);
    h1 ^= h1 >> 16;

    h1 as i32
}
