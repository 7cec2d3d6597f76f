//! geo.rs — Point resolution and mission distance
//!
//! Distances use a flat-earth approximation: one degree of latitude or
//! longitude is treated as 69 miles. This is a deliberate simplification
//! for short sorties, not a geodesic calculation.

use std::collections::HashMap;

use drone_types::GeoPoint;

use crate::error::SetupError;

pub const MILES_PER_DEGREE: f64 = 69.0;

pub fn distance_miles(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let dlat = p1.lat - p2.lat;
    let dlon = p1.lon - p2.lon;
    (dlat * dlat + dlon * dlon).sqrt() * MILES_PER_DEGREE
}

/// Turns an operator-supplied identifier into a point.
pub trait Geocoder {
    fn resolve(&self, identifier: &str) -> Option<GeoPoint>;

    /// Like [`Geocoder::resolve`], but a miss becomes a lookup error.
    fn lookup(&self, identifier: &str) -> Result<GeoPoint, SetupError> {
        self.resolve(identifier)
            .ok_or_else(|| SetupError::NotFound(identifier.to_string()))
    }
}

/// Resolves literal `lat,lon` pairs and names from a configured table.
#[derive(Debug, Clone, Default)]
pub struct PlaceBook {
    places: HashMap<String, GeoPoint>,
}

impl PlaceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, [f64; 2])>,
        S: AsRef<str>,
    {
        let places = pairs
            .into_iter()
            .map(|(name, [lat, lon])| (name.as_ref().trim().to_lowercase(), GeoPoint::new(lat, lon)))
            .collect();
        Self { places }
    }

    pub fn insert(&mut self, name: &str, point: GeoPoint) {
        self.places.insert(name.trim().to_lowercase(), point);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

fn parse_lat_lon(identifier: &str) -> Option<GeoPoint> {
    let (lat, lon) = identifier.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
    in_range.then(|| GeoPoint::new(lat, lon))
}

impl Geocoder for PlaceBook {
    fn resolve(&self, identifier: &str) -> Option<GeoPoint> {
        parse_lat_lon(identifier).or_else(|| self.places.get(&identifier.trim().to_lowercase()).copied())
    }
}
