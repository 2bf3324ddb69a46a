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

//! Convert polygon placemarks from [KML](https://developers.google.com/kml/documentation/kmlreference)
//! into a [GeoJSON](https://tools.ietf.org/html/rfc7946) `FeatureCollection`.
//!
//! Each `Placemark` carries its polygon as a single flattened coordinate string
//! (`"lon,lat[,alt] lon,lat[,alt] ..."`). The conversion splits that string into a
//! ring of numeric positions and emits one `Feature` per placemark, in document order.
//!
//! # Example
//!
//! ```
//! use kml2geojson::{to_geojson, KmlDocument};
//!
//! let kml = r#"<kml><Document>
//!   <Placemark>
//!     <name>A</name>
//!     <Polygon><coordinates>0,0 1,0 1,1 0,0</coordinates></Polygon>
//!   </Placemark>
//! </Document></kml>"#;
//!
//! let doc: KmlDocument = kml.parse().unwrap();
//! let collection = to_geojson(&doc);
//!
//! assert_eq!(collection.features.len(), 1);
//! assert_eq!(
//!     collection.to_string(),
//!     r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]},"properties":{"name":"A"}}]}"#
//! );
//! ```
//!
//! Malformed numeric components degrade to zero by default. Pass
//! [`ConvertOptions::strict`] to [`to_geojson_with`] or [`convert`] to reject them
//! instead.

/// A single coordinate tuple: `[longitude, latitude]` or `[longitude, latitude, altitude]`.
///
/// Degenerate tuples (no component at all) are kept as empty positions.
pub type Position = Vec<f64>;

/// An ordered sequence of positions describing a polygon boundary.
pub type Ring = Vec<Position>;

mod coordinates;
mod error;
mod feature;
#[cfg(feature = "feature-service")]
pub mod feature_service;
mod kml;
mod to_geojson;
mod util;

pub use crate::coordinates::{parse_ring, parse_ring_strict, parse_ring_with};
pub use crate::error::Error;
pub use crate::feature::{Feature, FeatureCollection, Geometry, Properties, PropertyValue};
pub use crate::kml::{KmlDocument, Placemark};
pub use crate::to_geojson::{convert, to_geojson, to_geojson_with, ConvertOptions};
