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

use std::io;

/// Error when reading KML, converting it, or talking to a feature service
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    MalformedXml(String),
    ExpectedRootElement { expected: String, actual: String },
    MalformedCoordinate { tuple: String, component: String },
    EmptyCoordinateTuple(String),
    InvalidPlacemark {
        index: usize,
        name: String,
        cause: Box<Error>,
    },
    Io { kind: io::ErrorKind, message: String },
    MalformedJson(String),
    FeatureService { status: u16, body: String },
    Transport(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::MalformedXml(ref msg) => write!(f, "Encountered malformed XML: {}", msg),
            Error::ExpectedRootElement {
                ref expected,
                ref actual,
            } => write!(
                f,
                "Expected root element '{}', found '{}'.",
                expected, actual
            ),
            Error::MalformedCoordinate {
                ref tuple,
                ref component,
            } => write!(
                f,
                "Encountered non-numeric component '{}' in coordinate tuple '{}'.",
                component, tuple
            ),
            Error::EmptyCoordinateTuple(ref tuple) => {
                write!(f, "Coordinate tuple '{}' has no components.", tuple)
            }
            Error::InvalidPlacemark {
                index,
                ref name,
                ref cause,
            } => write!(f, "Placemark #{} ('{}'): {}", index, name, cause),
            Error::Io { ref message, .. } => write!(f, "I/O error: {}", message),
            Error::MalformedJson(ref msg) => write!(f, "Encountered malformed JSON: {}", msg),
            Error::FeatureService { status, ref body } => {
                write!(f, "Feature service answered with status {}: {}", status, body)
            }
            Error::Transport(ref msg) => write!(f, "Feature service unreachable: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::InvalidPlacemark { ref cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedXml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedJson(err.to_string())
    }
}
