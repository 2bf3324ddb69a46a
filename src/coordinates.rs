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

use crate::{ConvertOptions, Error, Position, Ring};

fn tuple_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split_whitespace()
}

fn component_tokens(tuple: &str) -> impl Iterator<Item = &str> {
    tuple.split(',').filter(|c| !c.is_empty())
}

/// Length of the longest prefix of `s` that reads as a decimal float literal.
fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Best-effort scan: full literal, else its leading numeric part, else zero.
/// Non-finite results (`nan`, `inf`, `1e999`) also become zero.
fn scan_component(tuple: &str, component: &str) -> f64 {
    if let Ok(v) = component.parse::<f64>() {
        if v.is_finite() {
            return v;
        }
    }
    let len = float_prefix_len(component);
    let value = match component[..len].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.,
    };
    log::warn!(
        "coercing malformed coordinate component '{}' in '{}' to {}",
        component,
        tuple,
        value
    );
    value
}

fn parse_component_strict(tuple: &str, component: &str) -> Result<f64, Error> {
    match component.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::MalformedCoordinate {
            tuple: tuple.to_owned(),
            component: component.to_owned(),
        }),
    }
}

/// Split a flattened KML coordinate string into a ring of positions.
///
/// Tuples are separated by whitespace, components by commas, and empty tokens
/// of either kind are skipped. Components that are not valid numbers never fail:
/// their leading numeric part is used when there is one, zero otherwise.
/// Values that are not finite (`nan`, `inf`, overflowing literals) are zero too.
///
/// ```
/// use kml2geojson::parse_ring;
///
/// assert_eq!(parse_ring("  1,2   3,4  "), vec![vec![1., 2.], vec![3., 4.]]);
/// assert_eq!(parse_ring("1,x 3,4"), vec![vec![1., 0.], vec![3., 4.]]);
/// assert!(parse_ring("").is_empty());
/// ```
pub fn parse_ring(raw: &str) -> Ring {
    let ring: Ring = tuple_tokens(raw)
        .map(|tuple| {
            component_tokens(tuple)
                .map(|c| scan_component(tuple, c))
                .collect::<Position>()
        })
        .collect();
    log::trace!("parsed ring of {} positions", ring.len());
    ring
}

/// Like [`parse_ring`], but every component must be a complete, finite float
/// literal and every tuple must hold at least one component.
pub fn parse_ring_strict(raw: &str) -> Result<Ring, Error> {
    let mut ring = Vec::new();
    for tuple in tuple_tokens(raw) {
        let mut position = Vec::with_capacity(3);
        for component in component_tokens(tuple) {
            position.push(parse_component_strict(tuple, component)?);
        }
        if position.is_empty() {
            return Err(Error::EmptyCoordinateTuple(tuple.to_owned()));
        }
        ring.push(position);
    }
    log::trace!("parsed ring of {} positions", ring.len());
    Ok(ring)
}

/// Parse `raw` leniently or strictly depending on `options.strict`.
pub fn parse_ring_with(raw: &str, options: &ConvertOptions) -> Result<Ring, Error> {
    if options.strict {
        parse_ring_strict(raw)
    } else {
        Ok(parse_ring(raw))
    }
}
