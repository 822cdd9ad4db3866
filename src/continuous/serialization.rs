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

//! Serialization for the continuous family.
//!
//! Gaussian distributions serialize as their parameters under the
//! `"gaussian"` type tag. Sketches serialize as their three raw moments,
//! untagged, since they are transport between workers rather than a
//! published artifact.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;

use crate::continuous::GaussianDistribution;
use crate::continuous::GaussianSketch;

pub(crate) const GAUSSIAN_TAG: &str = "gaussian";

#[derive(Serialize, Deserialize)]
struct GaussianRepr {
    #[serde(rename = "type")]
    kind: String,
    mu: f64,
    sigma: f64,
}

impl Serialize for GaussianDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GaussianRepr {
            kind: GAUSSIAN_TAG.to_string(),
            mu: self.mu(),
            sigma: self.sigma(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GaussianDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = GaussianRepr::deserialize(deserializer)?;
        if repr.kind != GAUSSIAN_TAG {
            return Err(D::Error::custom(format!(
                "expected type {GAUSSIAN_TAG:?}, found {:?}",
                repr.kind
            )));
        }
        GaussianDistribution::new(repr.mu, repr.sigma).map_err(D::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct GaussianSketchRepr {
    sum: f64,
    #[serde(rename = "sumOfSquares")]
    sum_of_squares: f64,
    count: u64,
}

impl Serialize for GaussianSketch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GaussianSketchRepr {
            sum: self.sum(),
            sum_of_squares: self.sum_of_squares(),
            count: self.count(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GaussianSketch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = GaussianSketchRepr::deserialize(deserializer)?;
        Ok(GaussianSketch::from_moments(repr.sum, repr.sum_of_squares, repr.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_json_round_trip() {
        let dist = GaussianDistribution::new(1.5, 0.5).unwrap();
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"type":"gaussian","mu":1.5,"sigma":0.5}"#);

        let restored: GaussianDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(dist, restored);
    }

    #[test]
    fn test_distribution_json_rejects_bad_sigma() {
        let json = r#"{"type":"gaussian","mu":0.0,"sigma":-1.0}"#;
        assert!(serde_json::from_str::<GaussianDistribution>(json).is_err());
    }

    #[test]
    fn test_distribution_json_rejects_wrong_tag() {
        let json = r#"{"type":"uniform","mu":0.0,"sigma":1.0}"#;
        assert!(serde_json::from_str::<GaussianDistribution>(json).is_err());
    }

    #[test]
    fn test_sketch_json_round_trip() {
        let sketch: GaussianSketch = [1.0, 2.0, 3.0].into_iter().collect();
        let json = serde_json::to_string(&sketch).unwrap();
        assert_eq!(json, r#"{"sum":6.0,"sumOfSquares":14.0,"count":3}"#);

        let restored: GaussianSketch = serde_json::from_str(&json).unwrap();
        assert_eq!(sketch, restored);
    }
}
