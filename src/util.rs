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

use std::borrow::Cow;

use quick_xml::events::{BytesCData, BytesText};
use quick_xml::name::LocalName;

use crate::Error;

/// Element name without its namespace prefix (`kml:Placemark` -> `Placemark`).
pub fn element_name(name: LocalName) -> Result<String, Error> {
    match std::str::from_utf8(name.as_ref()) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(Error::MalformedXml(format!("element name is not UTF-8: {}", e))),
    }
}

/// Character data with entities resolved.
pub fn expect_text<'a>(text: &'a BytesText) -> Result<Cow<'a, str>, Error> {
    Ok(text.unescape()?)
}

/// Character data of a CDATA section, taken literally.
pub fn expect_cdata(cdata: BytesCData) -> Result<String, Error> {
    match String::from_utf8(cdata.into_inner().into_owned()) {
        Ok(s) => Ok(s),
        Err(e) => Err(Error::MalformedXml(format!("CDATA is not UTF-8: {}", e))),
    }
}

/// The document element must be `<kml>`.
pub fn expect_root(name: &str) -> Result<(), Error> {
    if name == "kml" {
        Ok(())
    } else {
        Err(Error::ExpectedRootElement {
            expected: "kml".to_owned(),
            actual: name.to_owned(),
        })
    }
}

/// Whether an element opened under `path` is a placemark we collect:
/// `kml > Document > Placemark`, optionally through nested `Folder`s.
pub fn is_placemark_parent(path: &[String]) -> bool {
    match path {
        [kml, document, folders @ ..] => {
            kml == "kml" && document == "Document" && folders.iter().all(|f| f == "Folder")
        }
        _ => false,
    }
}

/// Whether `rel` (path below a placemark) addresses the outer ring's coordinates.
pub fn is_outer_coordinates(rel: &[String]) -> bool {
    const DIRECT: [&str; 2] = ["Polygon", "coordinates"];
    const NESTED: [&str; 4] = ["Polygon", "outerBoundaryIs", "LinearRing", "coordinates"];
    rel.iter().map(String::as_str).eq(DIRECT.iter().copied())
        || rel.iter().map(String::as_str).eq(NESTED.iter().copied())
}
