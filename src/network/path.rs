//! Track between two stations

use serde::{Deserialize, Serialize};
use std::fmt;

/// An undirected track segment with its length in kilometres
///
/// `A-B` and `B-A` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    /// One end of the track
    pub point_a: String,
    /// The other end of the track
    pub point_b: String,
    /// Track length in km
    pub distance_km: f64,
}

impl Path {
    /// Create a path
    pub fn new(point_a: impl Into<String>, point_b: impl Into<String>, distance_km: f64) -> Self {
        Self {
            point_a: point_a.into(),
            point_b: point_b.into(),
            distance_km,
        }
    }

    /// Check whether this path joins `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.point_a == a && self.point_b == b) || (self.point_a == b && self.point_b == a)
    }

    /// Check whether `station` is one of the ends
    pub fn touches(&self, station: &str) -> bool {
        self.point_a == station || self.point_b == station
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.connects(&other.point_a, &other.point_b)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} km", self.point_a, self.point_b, self.distance_km)
    }
}
