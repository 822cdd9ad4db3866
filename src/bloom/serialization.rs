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

//! Bloom filter serialization.
//!
//! The stable interchange form is the construction parameters plus the bit
//! array as a minimal little-endian byte buffer. The derived geometry
//! (number of bits, number of hash functions) is recomputed on read rather
//! than serialized, so a buffer can never disagree with its parameters.

use std::io::Cursor;

use byteorder::LittleEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::bloom::BloomFilter;
use crate::error::Error;
use crate::error::ErrorKind;

#[derive(Serialize, Deserialize)]
struct BloomFilterRepr {
    #[serde(rename = "expectedSize")]
    expected_size: u64,
    #[serde(rename = "falsePositiveProbability")]
    false_positive_probability: f64,
    bits: Vec<u8>,
}

impl Serialize for BloomFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BloomFilterRepr {
            expected_size: self.expected_size(),
            false_positive_probability: self.false_positive_probability(),
            bits: self.to_byte_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BloomFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = BloomFilterRepr::deserialize(deserializer)?;
        BloomFilter::with_bit_data(
            repr.expected_size,
            repr.false_positive_probability,
            &repr.bits,
        )
        .map_err(serde::de::Error::custom)
    }
}

/// Packs the bit-array words into a minimal little-endian byte buffer,
/// trimming trailing zero bytes.
pub(crate) fn pack_bits(words: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 8);
    for &word in words {
        // Infallible for Vec writers.
        let _ = bytes.write_u64::<LittleEndian>(word);
    }
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes
}

/// Unpacks a byte buffer produced by [`pack_bits`] into words sized for a
/// filter with `num_bits` bits.
///
/// # Errors
///
/// Fails with a decoding error if the buffer is longer than the filter's
/// capacity or sets a bit at or beyond `num_bits`.
pub(crate) fn unpack_bits(bytes: &[u8], num_bits: u32) -> Result<Vec<u64>, Error> {
    let max_bytes = num_bits.div_ceil(8) as usize;
    if bytes.len() > max_bytes {
        return Err(
            Error::new(ErrorKind::MalformedDeserializeData, "bit data exceeds filter capacity")
                .with_context("byteLength", bytes.len())
                .with_context("maxByteLength", max_bytes),
        );
    }

    let mut words = vec![0u64; num_bits.div_ceil(64) as usize];
    let mut cursor = Cursor::new(bytes);
    for (i, word) in words.iter_mut().enumerate() {
        let remaining = bytes.len().saturating_sub(i * 8);
        *word = match remaining {
            0 => break,
            1..=7 => cursor.read_uint::<LittleEndian>(remaining).map_err(|e| {
                Error::new(ErrorKind::MalformedDeserializeData, "truncated bit data read")
                    .set_source(e)
            })?,
            _ => cursor.read_u64::<LittleEndian>().map_err(|e| {
                Error::new(ErrorKind::MalformedDeserializeData, "truncated bit data read")
                    .set_source(e)
            })?,
        };
    }

    // The capacity check above bounds stray bits to the final byte; reject
    // any set bit at or beyond num_bits.
    if let Some(&last) = words.last() {
        let used = num_bits as usize - (words.len() - 1) * 64;
        let mask = if used == 64 { u64::MAX } else { (1u64 << used) - 1 };
        if last & !mask != 0 {
            return Err(Error::new(
                ErrorKind::MalformedDeserializeData,
                "bit data sets bits beyond filter capacity",
            )
            .with_context("numBits", num_bits));
        }
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_trims_trailing_zero_bytes() {
        assert_eq!(pack_bits(&[0, 0]), Vec::<u8>::new());
        assert_eq!(pack_bits(&[0x0102, 0]), vec![0x02, 0x01]);
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let words = vec![0xdead_beef_u64, 0b101, 0];
        let bytes = pack_bits(&words);
        assert_eq!(unpack_bits(&bytes, 192).unwrap(), words);
    }

    #[test]
    fn test_unpack_reads_partial_tail_word() {
        // 3-byte buffer against a 64-bit filter exercises the short read.
        assert_eq!(unpack_bits(&[0x01, 0x02, 0x03], 64).unwrap(), vec![0x0003_0201]);
    }

    #[test]
    fn test_unpack_rejects_oversized_buffers() {
        let err = unpack_bits(&[0xff; 3], 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_unpack_rejects_stray_high_bits() {
        // 10-bit filter fits in 2 bytes, but only the low 10 bits are valid.
        let err = unpack_bits(&[0x00, 0xff], 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_json_round_trip() {
        let mut filter = BloomFilter::with_probability(50, 0.01).unwrap();
        filter.add("alpha");
        filter.add("beta");

        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("\"expectedSize\":50"));
        assert!(json.contains("\"falsePositiveProbability\":0.01"));

        let restored: BloomFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, restored);
    }

    #[test]
    fn test_json_rejects_bad_parameters() {
        let json = r#"{"expectedSize":0,"falsePositiveProbability":0.01,"bits":[]}"#;
        assert!(serde_json::from_str::<BloomFilter>(json).is_err());
    }
}
