extern crate kml2geojson;
extern crate pretty_env_logger;

use std::env;
use std::fs::{self, File};
use std::process;

use kml2geojson::{convert, ConvertOptions};

// Usage: kml_to_geojson [--strict] [input.kml] [output.geojson]
pub fn main() {
    pretty_env_logger::init();

    let mut options = ConvertOptions::default();
    let mut paths = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--strict" {
            options.strict = true;
        } else {
            paths.push(arg);
        }
    }
    let input = paths.get(0).map(String::as_str).unwrap_or("input.kml");
    let output = paths.get(1).map(String::as_str).unwrap_or("output.geojson");

    let reader = File::open(input).expect("Unable to read KML file");
    let mut rendered = Vec::new();
    match convert(reader, &mut rendered, &options) {
        Ok(count) => {
            fs::write(output, rendered).expect("Unable to write GeoJSON file");
            println!("Converted {} placemarks to {}", count, output);
        }
        Err(e) => {
            eprintln!("Conversion failed: {}", e);
            process::exit(1);
        }
    }
}
