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

//! Reproducible hash-function family.
//!
//! The family is a fixed, ordered sequence of integer hash functions derived
//! from a single value hash code. Each member scrambles its input with a
//! fixed-seed MurmurHash3-style avalanche mix and combines the result with a
//! per-index prime multiplier. Determinism across processes is a hard
//! requirement: serialized Bloom filters are only interoperable if every
//! producer and consumer agrees on the family.
//!
//! The family is performance-oriented, not adversarial-input-safe; it offers
//! no cryptographic collision resistance.

mod family;

pub use self::family::HashFunction;
pub use self::family::MAX_HASH_FUNCTIONS;
pub use self::family::generate;
pub use self::family::value_hash_code;
