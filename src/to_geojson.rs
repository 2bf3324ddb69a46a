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

use std::convert::Infallible;
use std::io::{BufReader, Read, Write};

use crate::{
    coordinates, Error, Feature, FeatureCollection, Geometry, KmlDocument, Placemark, Properties,
    Ring,
};

/// How malformed coordinate data is handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Reject non-numeric or non-finite components and empty tuples instead of
    /// coercing them.
    pub strict: bool,
}

impl ConvertOptions {
    pub fn strict() -> Self {
        ConvertOptions { strict: true }
    }
}

fn make_feature(placemark: &Placemark, ring: Ring) -> Feature {
    let mut properties = Properties::new();
    properties.insert("name".to_owned(), placemark.name.as_str().into());
    Feature {
        geometry: Geometry::Polygon {
            coordinates: vec![ring],
        },
        properties,
    }
}

/// Build one feature per placemark, in order, with `ring_of` producing each ring.
fn collect_features<E, F>(doc: &KmlDocument, mut ring_of: F) -> Result<FeatureCollection, E>
where
    F: FnMut(usize, &Placemark) -> Result<Ring, E>,
{
    let mut features = Vec::with_capacity(doc.placemarks.len());
    for (index, placemark) in doc.placemarks.iter().enumerate() {
        log::debug!("converting placemark #{} '{}'", index, placemark.name);
        let ring = ring_of(index, placemark)?;
        features.push(make_feature(placemark, ring));
    }
    Ok(FeatureCollection { features })
}

/// Convert every placemark of `doc` to a single-ring polygon feature.
///
/// Never fails: malformed numeric components degrade to zero (see
/// [`parse_ring`](crate::parse_ring)). The output has one feature per placemark,
/// in the same order.
pub fn to_geojson(doc: &KmlDocument) -> FeatureCollection {
    let result = collect_features(doc, |_, placemark| {
        Ok::<_, Infallible>(coordinates::parse_ring(&placemark.raw_coordinates))
    });
    match result {
        Ok(collection) => collection,
        Err(never) => match never {},
    }
}

/// Like [`to_geojson`], but honours `options`. In strict mode the first
/// placemark with malformed coordinates aborts the conversion with
/// [`Error::InvalidPlacemark`].
pub fn to_geojson_with(doc: &KmlDocument, options: &ConvertOptions) -> Result<FeatureCollection, Error> {
    collect_features(doc, |index, placemark| {
        coordinates::parse_ring_with(&placemark.raw_coordinates, options).map_err(|e| {
            Error::InvalidPlacemark {
                index,
                name: placemark.name.clone(),
                cause: Box::new(e),
            }
        })
    })
}

/// Read a KML document from `input` and write it to `output` as pretty-printed
/// GeoJSON. Returns the number of features written.
///
/// Nothing is written unless the whole document was read and converted.
pub fn convert<R: Read, W: Write>(
    input: R,
    mut output: W,
    options: &ConvertOptions,
) -> Result<usize, Error> {
    let doc = KmlDocument::from_reader(BufReader::new(input))?;
    let collection = to_geojson_with(&doc, options)?;
    let mut rendered = Vec::new();
    collection.to_writer_pretty(&mut rendered)?;
    output.write_all(&rendered)?;
    output.flush()?;
    log::info!("converted {} placemarks", collection.features.len());
    Ok(collection.features.len())
}
