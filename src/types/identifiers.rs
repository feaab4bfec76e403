//! Identifier types for the rail network simulator
//!
//! Trains are identified by their timetable number and cars by a numeric id
//! that is unique across every station pool and every train in the network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timetable number of a train; one connection exists per number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainNumber(pub u32);

impl TrainNumber {
    /// Create a train number
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Get the numeric value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrainNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl FromStr for TrainNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TrainNumber)
    }
}

/// System-wide unique id of a single rail car
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub u32);

impl CarId {
    /// Create a car id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the numeric value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CarId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for CarId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CarId)
    }
}
