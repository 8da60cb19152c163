use num_traits::Float;
use serde::{Deserialize, Serialize};


/// Mean Earth radius in metres
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;


/// Euclidean distance
pub fn euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Squared Euclidean distance
pub fn squared_euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    (x1 - x2).powi(2) + (y1 - y2).powi(2)
}

/// Great-circle distance in metres between two (longitude, latitude) pairs in degrees
/// https://en.wikipedia.org/wiki/Haversine_formula
pub fn haversine<T>(lon1: T, lat1: T, lon2: T, lat2: T) -> T
where
    T: Float,
    {
    let two = T::one() + T::one();
    let radius = T::from(EARTH_RADIUS_METERS).unwrap_or_else(T::one);

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / two).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / two).sin().powi(2);

    // clamp guards against a > 1 from rounding on antipodal points
    let c = two * a.sqrt().min(T::one()).asin();
    radius * c
}


/// 2D Point
/// For geographic data x is the longitude and y the latitude
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in coordinate units
    pub fn distance(&self, other: &Point) -> f64 {
        euclidean(self.x, self.y, other.x, other.y)
    }

    /// Great-circle distance in metres, treating the point as (lon, lat)
    pub fn haversine_distance(&self, other: &Point) -> f64 {
        haversine(self.x, self.y, other.x, other.y)
    }
}
