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

//! Serialization for the categorical family.
//!
//! Distributions carry a `type` tag (`"categorical"`, `"empirical"`,
//! `"uniform"`) so heterogeneous collections can be decoded by inspection;
//! see [`crate::json`]. Weighted categories serialize as a `categories` list
//! of `{category, count}` objects in cumulative-offset order, which keeps the
//! representation independent of the category type. Sketches serialize as the
//! bare list, untagged, since they are transport between workers rather than
//! a published artifact.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as _;

use crate::categorical::CategoricalDistribution;
use crate::categorical::CategoricalSketch;
use crate::categorical::EmpiricalDistribution;
use crate::categorical::UniformDistribution;
use crate::categorical::UniformSketch;

pub(crate) const CATEGORICAL_TAG: &str = "categorical";
pub(crate) const EMPIRICAL_TAG: &str = "empirical";
pub(crate) const UNIFORM_TAG: &str = "uniform";

#[derive(Serialize)]
struct CategoryCountRef<'a, T> {
    category: &'a T,
    count: u64,
}

#[derive(Deserialize)]
struct CategoryCount<T> {
    category: T,
    count: u64,
}

#[derive(Serialize)]
struct WeightedRef<'a, T> {
    #[serde(rename = "type")]
    kind: &'a str,
    categories: Vec<CategoryCountRef<'a, T>>,
}

#[derive(Deserialize)]
struct Weighted<T> {
    #[serde(rename = "type")]
    kind: String,
    categories: Vec<CategoryCount<T>>,
}

fn serialize_weighted<T, S>(
    distribution: &CategoricalDistribution<T>,
    kind: &str,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    WeightedRef {
        kind,
        categories: distribution
            .categories()
            .map(|(category, count)| CategoryCountRef { category, count })
            .collect(),
    }
    .serialize(serializer)
}

fn deserialize_weighted<'de, T, D>(
    kind: &str,
    deserializer: D,
) -> Result<CategoricalDistribution<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let repr = Weighted::<T>::deserialize(deserializer)?;
    if repr.kind != kind {
        return Err(D::Error::custom(format!(
            "expected type {:?}, found {:?}",
            kind, repr.kind
        )));
    }
    CategoricalDistribution::from_weights(
        repr.categories.into_iter().map(|entry| (entry.category, entry.count)),
    )
    .map_err(D::Error::custom)
}

impl<T: Serialize> Serialize for CategoricalDistribution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_weighted(self, CATEGORICAL_TAG, serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoricalDistribution<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_weighted(CATEGORICAL_TAG, deserializer)
    }
}

impl<T: Serialize> Serialize for EmpiricalDistribution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_weighted(self.as_categorical(), EMPIRICAL_TAG, serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for EmpiricalDistribution<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_weighted(EMPIRICAL_TAG, deserializer).map(Self::from)
    }
}

#[derive(Serialize)]
struct UniformRef<'a, T> {
    #[serde(rename = "type")]
    kind: &'a str,
    categories: &'a [T],
}

#[derive(Deserialize)]
struct Uniform<T> {
    #[serde(rename = "type")]
    kind: String,
    categories: Vec<T>,
}

impl<T: Serialize> Serialize for UniformDistribution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        UniformRef { kind: UNIFORM_TAG, categories: self.values() }.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for UniformDistribution<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Uniform::<T>::deserialize(deserializer)?;
        if repr.kind != UNIFORM_TAG {
            return Err(D::Error::custom(format!(
                "expected type {UNIFORM_TAG:?}, found {:?}",
                repr.kind
            )));
        }
        UniformDistribution::fit(repr.categories).map_err(D::Error::custom)
    }
}

impl<T: Serialize + Ord> Serialize for UniformSketch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values())
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for UniformSketch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<T>::deserialize(deserializer)?.into_iter().collect())
    }
}

impl<T: Serialize + Ord> Serialize for CategoricalSketch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.counts().map(|(category, count)| CategoryCountRef { category, count }),
        )
    }
}

impl<'de, T: Deserialize<'de> + Ord> Deserialize<'de> for CategoricalSketch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<CategoryCount<T>>::deserialize(deserializer)?;
        let mut sketch = CategoricalSketch::new();
        for entry in entries {
            sketch.observe_weighted(entry.category, entry.count);
        }
        Ok(sketch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_json_round_trip() {
        let dist =
            CategoricalDistribution::from_weights([("a", 2), ("b", 3)]).unwrap();
        let json = serde_json::to_string(&dist).unwrap();
        assert!(json.contains("\"type\":\"categorical\""));
        assert!(json.contains("\"category\":\"a\""));

        let restored: CategoricalDistribution<String> =
            serde_json::from_str(&json).unwrap();
        let categories: Vec<_> = restored
            .categories()
            .map(|(category, count)| (category.clone(), count))
            .collect();
        assert_eq!(categories, vec![("a".to_string(), 2), ("b".to_string(), 3)]);
    }

    #[test]
    fn test_empirical_json_round_trip() {
        let dist = EmpiricalDistribution::fit([1u32, 1, 2]).unwrap();
        let json = serde_json::to_string(&dist).unwrap();
        assert!(json.contains("\"type\":\"empirical\""));

        let restored: EmpiricalDistribution<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(dist, restored);
    }

    #[test]
    fn test_uniform_json_round_trip() {
        let dist = UniformDistribution::fit(["b", "a"]).unwrap();
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"type":"uniform","categories":["a","b"]}"#);

        let restored: UniformDistribution<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.values(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_tag_mismatch_is_rejected() {
        let json = r#"{"type":"uniform","categories":[{"category":"a","count":1}]}"#;
        assert!(serde_json::from_str::<CategoricalDistribution<String>>(json).is_err());
    }

    #[test]
    fn test_empty_categories_are_rejected() {
        let json = r#"{"type":"categorical","categories":[]}"#;
        assert!(serde_json::from_str::<CategoricalDistribution<String>>(json).is_err());
    }

    #[test]
    fn test_uniform_sketch_json_round_trip() {
        let sketch: UniformSketch<_> = ["b", "a", "b"].into_iter().collect();
        let json = serde_json::to_string(&sketch).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let restored: UniformSketch<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.size(), 2);
    }

    #[test]
    fn test_sketch_json_round_trip() {
        let sketch: CategoricalSketch<_> =
            ["x", "y", "x"].iter().copied().collect();
        let json = serde_json::to_string(&sketch).unwrap();
        assert_eq!(json, r#"[{"category":"x","count":2},{"category":"y","count":1}]"#);

        let restored: CategoricalSketch<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.total(), 3);
        assert_eq!(restored.size(), 2);
    }
}
