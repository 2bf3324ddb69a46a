// Copyright 2018 The GeoRust Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use geojson::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

use crate::{Error, Ring};

/// Scalar value of a feature property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n.into())
    }
}

impl From<f64> for PropertyValue {
    /// Non-finite numbers have no JSON representation and become `Null`.
    fn from(n: f64) -> Self {
        match serde_json::Number::from_f64(n) {
            Some(n) => PropertyValue::Number(n),
            None => PropertyValue::Null,
        }
    }
}

impl<'a> From<&'a PropertyValue> for JsonValue {
    fn from(value: &'a PropertyValue) -> JsonValue {
        match *value {
            PropertyValue::Null => JsonValue::Null,
            PropertyValue::Bool(b) => JsonValue::Bool(b),
            PropertyValue::Number(ref n) => JsonValue::Number(n.clone()),
            PropertyValue::String(ref s) => JsonValue::String(s.clone()),
        }
    }
}

/// Feature properties, ordered by key.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Geometry of a converted feature.
///
/// [GeoJSON Format Specification § 3.1.6](https://tools.ietf.org/html/rfc7946#section-3.1.6)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
}

impl Geometry {
    /// Rings of the polygon, outer ring first.
    pub fn rings(&self) -> &[Ring] {
        match *self {
            Geometry::Polygon { ref coordinates } => coordinates,
        }
    }
}

/// [GeoJSON Format Specification § 3.2](https://tools.ietf.org/html/rfc7946#section-3.2)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

/// [GeoJSON Format Specification § 3.3](https://tools.ietf.org/html/rfc7946#section-3.3)
///
/// Serializes with `type` first, then `features`; each feature as `type`,
/// `geometry`, `properties`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// JSON with two-space indentation.
    pub fn to_string_pretty(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_writer_pretty<W: Write>(&self, writer: W) -> Result<(), Error> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }
}

impl fmt::Display for FeatureCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        ::serde_json::to_string(self)
            .map_err(|_| fmt::Error)
            .and_then(|s| f.write_str(&s))
    }
}

impl<'a> From<&'a Geometry> for geojson::Geometry {
    fn from(geometry: &'a Geometry) -> geojson::Geometry {
        match *geometry {
            Geometry::Polygon { ref coordinates } => {
                geojson::Geometry::new(geojson::Value::Polygon(coordinates.clone()))
            }
        }
    }
}

impl<'a> From<&'a Feature> for geojson::Feature {
    fn from(feature: &'a Feature) -> geojson::Feature {
        let mut properties = JsonObject::new();
        for (key, value) in &feature.properties {
            properties.insert(key.to_owned(), value.into());
        }
        geojson::Feature {
            bbox: None,
            geometry: Some((&feature.geometry).into()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

impl<'a> From<&'a FeatureCollection> for geojson::FeatureCollection {
    fn from(collection: &'a FeatureCollection) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: collection.features.iter().map(geojson::Feature::from).collect(),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use geojson::GeoJson;

    use super::{Feature, FeatureCollection, Geometry, Properties, PropertyValue};

    fn lot(name: &str, ring: Vec<Vec<f64>>) -> Feature {
        let mut properties = Properties::new();
        properties.insert("name".to_string(), name.into());
        Feature {
            geometry: Geometry::Polygon {
                coordinates: vec![ring],
            },
            properties,
        }
    }

    #[test]
    fn encode_feature_with_stable_member_order() {
        let feature = lot("Lot 12", vec![vec![1.5, 2.0], vec![3.0, 4.0]]);
        assert_eq!(
            serde_json::to_string(&feature).unwrap(),
            "{\"type\":\"Feature\",\"geometry\":{\"type\":\"Polygon\",\"coordinates\":[[[1.5,2.0],[3.0,4.0]]]},\"properties\":{\"name\":\"Lot 12\"}}"
        );
    }

    #[test]
    fn encode_empty_collection() {
        let collection = FeatureCollection::default();
        assert_eq!(
            collection.to_string(),
            "{\"type\":\"FeatureCollection\",\"features\":[]}"
        );
        assert_eq!(
            collection.to_string_pretty().unwrap(),
            "{\n  \"type\": \"FeatureCollection\",\n  \"features\": []\n}"
        );
    }

    #[test]
    fn decode_collection() {
        let json = "{\"type\":\"FeatureCollection\",\"features\":[{\"type\":\"Feature\",\"geometry\":{\"type\":\"Polygon\",\"coordinates\":[[]]},\"properties\":{\"name\":\"B\",\"area\":12,\"public\":true,\"note\":null}}]}";
        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        let feature = &collection.features[0];
        assert_eq!(feature.geometry.rings(), &[Vec::<Vec<f64>>::new()][..]);
        assert_eq!(feature.properties["name"], PropertyValue::from("B"));
        assert_eq!(feature.properties["area"], PropertyValue::from(12i64));
        assert_eq!(feature.properties["public"], PropertyValue::Bool(true));
        assert_eq!(feature.properties["note"], PropertyValue::Null);
    }

    #[test]
    fn non_finite_numbers_become_null() {
        assert_eq!(PropertyValue::from(std::f64::NAN), PropertyValue::Null);
        assert_eq!(
            PropertyValue::from(2.5),
            PropertyValue::Number(serde_json::Number::from_f64(2.5).unwrap())
        );
    }

    #[test]
    fn convert_to_geojson_crate_types() {
        let collection = FeatureCollection {
            features: vec![lot("A", vec![vec![0., 0.], vec![1., 0.], vec![1., 1.], vec![0., 0.]])],
        };
        let fc = geojson::FeatureCollection::from(&collection);
        assert_eq!(fc.features.len(), 1);
        let feature = &fc.features[0];
        assert_eq!(
            feature.properties.as_ref().unwrap().get("name"),
            Some(&serde_json::Value::String("A".to_string()))
        );
        match feature.geometry.as_ref().unwrap().value {
            geojson::Value::Polygon(ref rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 4);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn encoded_collection_is_valid_geojson() {
        let collection = FeatureCollection {
            features: vec![lot("A", vec![vec![0., 0.], vec![1., 0.], vec![1., 1.], vec![0., 0.]])],
        };
        let parsed: GeoJson = collection.to_string_pretty().unwrap().parse().unwrap();
        match parsed {
            GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 1),
            _ => panic!(),
        }
    }
}
