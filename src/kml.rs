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

use std::io::BufRead;
use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::{util, Error};

/// A KML document reduced to its polygon placemarks, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KmlDocument {
    pub placemarks: Vec<Placemark>,
}

/// A `<Placemark>` with its name and the untouched text of its polygon's
/// `<coordinates>` element (empty when the placemark has no polygon).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub raw_coordinates: String,
}

impl Placemark {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, raw_coordinates: C) -> Self {
        Placemark {
            name: name.into(),
            raw_coordinates: raw_coordinates.into(),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Capture {
    Pending,
    /// Capturing the element at this path length.
    Active(usize),
    Done,
}

/// Placemark being read, `depth` being the index of `Placemark` in the element path.
struct OpenPlacemark {
    depth: usize,
    placemark: Placemark,
    name: Capture,
    coordinates: Capture,
}

impl OpenPlacemark {
    fn new(depth: usize) -> Self {
        OpenPlacemark {
            depth,
            placemark: Placemark::default(),
            name: Capture::Pending,
            coordinates: Capture::Pending,
        }
    }

    /// Path below the placemark once `name` is opened.
    fn is_name(&self, path: &[String]) -> bool {
        path.len() == self.depth + 2 && path[self.depth + 1] == "name"
    }

    fn is_coordinates(&self, path: &[String]) -> bool {
        util::is_outer_coordinates(&path[self.depth + 1..])
    }

    fn open(&mut self, path: &[String]) {
        if self.name == Capture::Pending && self.is_name(path) {
            self.name = Capture::Active(path.len());
        } else if self.coordinates == Capture::Pending && self.is_coordinates(path) {
            self.coordinates = Capture::Active(path.len());
        }
    }

    /// `depth` is the path length including the element being closed.
    fn close(&mut self, depth: usize) {
        if self.name == Capture::Active(depth) {
            self.name = Capture::Done;
        }
        if self.coordinates == Capture::Active(depth) {
            self.coordinates = Capture::Done;
        }
    }

    /// Only character data directly inside the captured element is kept.
    fn push_text(&mut self, text: &str, depth: usize) {
        if self.name == Capture::Active(depth) {
            self.placemark.name.push_str(text);
        } else if self.coordinates == Capture::Active(depth) {
            self.placemark.raw_coordinates.push_str(text);
        }
    }
}

impl KmlDocument {
    pub fn new(placemarks: Vec<Placemark>) -> Self {
        KmlDocument { placemarks }
    }

    /// Read a whole KML document.
    ///
    /// Only `kml > Document > Placemark` elements (possibly nested in `Folder`s)
    /// are collected; everything else is skipped.
    pub fn from_reader<R: BufRead>(input: R) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut placemarks = Vec::new();
        let mut open: Option<OpenPlacemark> = None;
        let mut has_root = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = util::element_name(e.local_name())?;
                    if !has_root {
                        util::expect_root(&name)?;
                        has_root = true;
                    }
                    if open.is_none() && name == "Placemark" && util::is_placemark_parent(&path) {
                        open = Some(OpenPlacemark::new(path.len()));
                    }
                    path.push(name);
                    if let Some(ref mut pm) = open {
                        pm.open(&path);
                    }
                }
                Event::Empty(e) => {
                    let name = util::element_name(e.local_name())?;
                    if !has_root {
                        util::expect_root(&name)?;
                        has_root = true;
                    }
                    if open.is_none() && name == "Placemark" && util::is_placemark_parent(&path) {
                        placemarks.push(Placemark::default());
                    } else if let Some(ref mut pm) = open {
                        path.push(name);
                        pm.open(&path);
                        pm.close(path.len());
                        path.pop();
                    }
                }
                Event::End(_) => {
                    let depth = path.len();
                    path.pop();
                    let finished = match open {
                        Some(ref pm) => pm.depth == path.len(),
                        None => false,
                    };
                    if finished {
                        if let Some(pm) = open.take() {
                            log::trace!("read placemark '{}'", pm.placemark.name);
                            placemarks.push(pm.placemark);
                        }
                    } else if let Some(ref mut pm) = open {
                        pm.close(depth);
                    }
                }
                Event::Text(e) => {
                    if let Some(ref mut pm) = open {
                        pm.push_text(&util::expect_text(&e)?, path.len());
                    }
                }
                Event::CData(e) => {
                    if let Some(ref mut pm) = open {
                        pm.push_text(&util::expect_cdata(e)?, path.len());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !has_root {
            return Err(Error::MalformedXml("document has no root element".to_owned()));
        }
        if let Some(unclosed) = path.last() {
            return Err(Error::MalformedXml(format!(
                "unexpected end of document inside <{}>",
                unclosed
            )));
        }
        log::debug!("read KML document with {} placemarks", placemarks.len());
        Ok(KmlDocument { placemarks })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        KmlDocument::from_reader(bytes)
    }
}

impl FromStr for KmlDocument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KmlDocument::from_slice(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::{KmlDocument, Placemark};
    use crate::Error;

    fn decode(kml: &str) -> KmlDocument {
        kml.parse().unwrap()
    }

    #[test]
    fn decode_placemarks_in_order() {
        let doc = decode(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <kml xmlns=\"http://www.opengis.net/kml/2.2\"><Document>\
             <Placemark><name>A</name><Polygon><coordinates>0,0 1,0 1,1 0,0</coordinates></Polygon></Placemark>\
             <Placemark><name>B</name><Polygon><coordinates></coordinates></Polygon></Placemark>\
             </Document></kml>",
        );
        assert_eq!(
            doc,
            KmlDocument::new(vec![
                Placemark::new("A", "0,0 1,0 1,1 0,0"),
                Placemark::new("B", ""),
            ])
        );
    }

    #[test]
    fn coordinates_are_kept_untrimmed() {
        let doc = decode(
            "<kml><Document><Placemark><name>Lot 12</name><Polygon><coordinates>\n  1,2   3,4  \n</coordinates></Polygon></Placemark></Document></kml>",
        );
        assert_eq!(doc.placemarks[0].raw_coordinates, "\n  1,2   3,4  \n");
    }

    #[test]
    fn decode_standard_outer_boundary() {
        let doc = decode(
            "<kml><Document><Placemark><name>Park</name><Polygon>\
             <outerBoundaryIs><LinearRing><coordinates>1,2 3,4</coordinates></LinearRing></outerBoundaryIs>\
             <innerBoundaryIs><LinearRing><coordinates>5,6 7,8</coordinates></LinearRing></innerBoundaryIs>\
             </Polygon></Placemark></Document></kml>",
        );
        assert_eq!(doc.placemarks, vec![Placemark::new("Park", "1,2 3,4")]);
    }

    #[test]
    fn decode_namespaced_elements_and_entities() {
        let doc = decode(
            "<kml:kml xmlns:kml=\"http://www.opengis.net/kml/2.2\"><kml:Document><kml:Placemark>\
             <kml:name>Fish &amp; Chips</kml:name>\
             <kml:Polygon><kml:coordinates>1,2</kml:coordinates></kml:Polygon>\
             </kml:Placemark></kml:Document></kml:kml>",
        );
        assert_eq!(doc.placemarks, vec![Placemark::new("Fish & Chips", "1,2")]);
    }

    #[test]
    fn decode_cdata_name() {
        let doc = decode(
            "<kml><Document><Placemark><name><![CDATA[<b>Lot</b>]]></name></Placemark></Document></kml>",
        );
        assert_eq!(doc.placemarks, vec![Placemark::new("<b>Lot</b>", "")]);
    }

    #[test]
    fn decode_placemarks_inside_folders() {
        let doc = decode(
            "<kml><Document>\
             <Placemark><name>first</name></Placemark>\
             <Folder><name>group</name><Folder>\
             <Placemark><name>nested</name><Polygon><coordinates>9,9</coordinates></Polygon></Placemark>\
             </Folder></Folder>\
             <Placemark/>\
             </Document></kml>",
        );
        assert_eq!(
            doc.placemarks,
            vec![
                Placemark::new("first", ""),
                Placemark::new("nested", "9,9"),
                Placemark::default(),
            ]
        );
    }

    #[test]
    fn name_keeps_text_around_child_elements() {
        let doc = decode(
            "<kml><Document><Placemark><name>A<b>x</b>B</name>\
             <Polygon><coordinates>1,2<!-- gap --> 3,4</coordinates></Polygon>\
             </Placemark></Document></kml>",
        );
        assert_eq!(doc.placemarks, vec![Placemark::new("AB", "1,2 3,4")]);
    }

    #[test]
    fn ignore_placemarks_outside_document() {
        let doc = decode("<kml><Placemark><name>loose</name></Placemark></kml>");
        assert!(doc.placemarks.is_empty());
    }

    #[test]
    fn first_polygon_wins() {
        let doc = decode(
            "<kml><Document><Placemark>\
             <Polygon><coordinates/></Polygon>\
             <Polygon><coordinates>1,1</coordinates></Polygon>\
             <name>late</name><name>later</name>\
             </Placemark></Document></kml>",
        );
        assert_eq!(doc.placemarks, vec![Placemark::new("late", "")]);
    }

    #[test]
    fn other_geometries_are_skipped() {
        let doc = decode(
            "<kml><Document><Placemark><name>road</name>\
             <LineString><coordinates>1,2 3,4</coordinates></LineString>\
             </Placemark></Document></kml>",
        );
        assert_eq!(doc.placemarks, vec![Placemark::new("road", "")]);
    }

    #[test]
    fn decode_fails_on_wrong_root() {
        let result = "<gpx><trk/></gpx>".parse::<KmlDocument>();
        assert_eq!(
            result,
            Err(Error::ExpectedRootElement {
                expected: "kml".to_string(),
                actual: "gpx".to_string(),
            })
        );
    }

    #[test]
    fn decode_fails_on_empty_input() {
        match "".parse::<KmlDocument>() {
            Err(Error::MalformedXml(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decode_fails_on_unclosed_document() {
        match "<kml><Document><Placemark>".parse::<KmlDocument>() {
            Err(Error::MalformedXml(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decode_fails_on_mismatched_tags() {
        match "<kml><Document></Placemark></kml>".parse::<KmlDocument>() {
            Err(Error::MalformedXml(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_kml_has_no_placemarks() {
        assert_eq!(decode("<kml/>"), KmlDocument::default());
        assert_eq!(decode("<kml><Document/></kml>"), KmlDocument::default());
    }
}
