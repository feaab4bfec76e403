//! Rail cars and locomotives
//!
//! A [`Vehicle`] is an id plus a [`VehicleKind`] payload. Capabilities such as
//! engine speed or passenger capacity are answered from the payload, so code
//! that only cares about a capability never has to match on the kind itself.

use crate::types::{CarId, CarType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind-specific data of a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VehicleKind {
    /// Passenger coach
    Coach {
        /// Number of seats
        seats: u32,
        /// Whether the coach offers internet access
        internet: bool,
    },
    /// Passenger car with beds
    SleepingCar {
        /// Number of beds
        beds: u32,
    },
    /// Flatbed freight car
    OpenFreightCar {
        /// Cargo capacity in tonnes
        cargo_tons: f64,
        /// Loading floor area in square metres
        floor_area_m2: f64,
    },
    /// Enclosed freight car
    CoveredFreightCar {
        /// Cargo volume in cubic metres
        volume_m3: f64,
    },
    /// Electric engine
    ElectricLocomotive {
        /// Top speed in km/h
        max_speed_kph: f64,
        /// Rated power in kW
        power_kw: f64,
    },
    /// Diesel engine
    DieselLocomotive {
        /// Top speed in km/h
        max_speed_kph: f64,
        /// Fuel consumption in litres per hour
        fuel_lph: f64,
    },
}

impl VehicleKind {
    /// The car type this payload belongs to
    pub fn car_type(&self) -> CarType {
        match self {
            VehicleKind::Coach { .. } => CarType::Coach,
            VehicleKind::SleepingCar { .. } => CarType::SleepingCar,
            VehicleKind::OpenFreightCar { .. } => CarType::OpenFreightCar,
            VehicleKind::CoveredFreightCar { .. } => CarType::CoveredFreightCar,
            VehicleKind::ElectricLocomotive { .. } => CarType::ElectricLocomotive,
            VehicleKind::DieselLocomotive { .. } => CarType::DieselLocomotive,
        }
    }
}

/// A single piece of rolling stock
///
/// Two vehicles are equal when their ids are equal; ids are unique across the
/// whole network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// System-wide unique id
    pub id: CarId,
    /// Kind-specific data
    #[serde(flatten)]
    pub kind: VehicleKind,
}

impl Vehicle {
    /// Create a vehicle from an id and a payload
    pub fn new(id: impl Into<CarId>, kind: VehicleKind) -> Self {
        Self { id: id.into(), kind }
    }

    /// Create a passenger coach
    pub fn coach(id: u32, seats: u32, internet: bool) -> Self {
        Self::new(id, VehicleKind::Coach { seats, internet })
    }

    /// Create a sleeping car
    pub fn sleeping_car(id: u32, beds: u32) -> Self {
        Self::new(id, VehicleKind::SleepingCar { beds })
    }

    /// Create an open freight car
    pub fn open_freight_car(id: u32, cargo_tons: f64, floor_area_m2: f64) -> Self {
        Self::new(
            id,
            VehicleKind::OpenFreightCar {
                cargo_tons,
                floor_area_m2,
            },
        )
    }

    /// Create a covered freight car
    pub fn covered_freight_car(id: u32, volume_m3: f64) -> Self {
        Self::new(id, VehicleKind::CoveredFreightCar { volume_m3 })
    }

    /// Create an electric locomotive
    pub fn electric_locomotive(id: u32, max_speed_kph: f64, power_kw: f64) -> Self {
        Self::new(
            id,
            VehicleKind::ElectricLocomotive {
                max_speed_kph,
                power_kw,
            },
        )
    }

    /// Create a diesel locomotive
    pub fn diesel_locomotive(id: u32, max_speed_kph: f64, fuel_lph: f64) -> Self {
        Self::new(
            id,
            VehicleKind::DieselLocomotive {
                max_speed_kph,
                fuel_lph,
            },
        )
    }

    /// The vehicle's type tag
    pub fn car_type(&self) -> CarType {
        self.kind.car_type()
    }

    /// Check whether the vehicle has an engine
    pub fn has_engine(&self) -> bool {
        self.car_type().is_locomotive()
    }

    /// Top speed of an engine; `None` for unpowered cars
    pub fn max_speed(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::ElectricLocomotive { max_speed_kph, .. }
            | VehicleKind::DieselLocomotive { max_speed_kph, .. } => Some(max_speed_kph),
            _ => None,
        }
    }

    /// Rated power of an electric engine
    pub fn power_kw(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::ElectricLocomotive { power_kw, .. } => Some(power_kw),
            _ => None,
        }
    }

    /// Fuel consumption of a diesel engine
    pub fn fuel_consumption_lph(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::DieselLocomotive { fuel_lph, .. } => Some(fuel_lph),
            _ => None,
        }
    }

    /// Check whether the vehicle carries passengers
    pub fn carries_passengers(&self) -> bool {
        self.passenger_capacity().is_some()
    }

    /// Seats in a coach or beds in a sleeping car
    pub fn passenger_capacity(&self) -> Option<u32> {
        match self.kind {
            VehicleKind::Coach { seats, .. } => Some(seats),
            VehicleKind::SleepingCar { beds } => Some(beds),
            _ => None,
        }
    }

    /// Check whether the vehicle offers internet access
    pub fn has_internet(&self) -> bool {
        matches!(self.kind, VehicleKind::Coach { internet: true, .. })
    }

    /// Check whether the vehicle carries cargo
    pub fn carries_cargo(&self) -> bool {
        matches!(
            self.kind,
            VehicleKind::OpenFreightCar { .. } | VehicleKind::CoveredFreightCar { .. }
        )
    }

    /// Cargo capacity in tonnes, for open freight cars
    pub fn cargo_capacity_tons(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::OpenFreightCar { cargo_tons, .. } => Some(cargo_tons),
            _ => None,
        }
    }

    /// Cargo volume in cubic metres, for covered freight cars
    pub fn cargo_volume_m3(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::CoveredFreightCar { volume_m3 } => Some(volume_m3),
            _ => None,
        }
    }

    /// Floor area in square metres, for open freight cars
    pub fn floor_area_m2(&self) -> Option<f64> {
        match self.kind {
            VehicleKind::OpenFreightCar { floor_area_m2, .. } => Some(floor_area_m2),
            _ => None,
        }
    }
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vehicle {}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] id: {}", self.car_type(), self.id)?;
        match &self.kind {
            VehicleKind::Coach { seats, internet } => {
                write!(f, ", seats: {}, internet: {}", seats, if *internet { "yes" } else { "no" })
            }
            VehicleKind::SleepingCar { beds } => write!(f, ", beds: {}", beds),
            VehicleKind::OpenFreightCar {
                cargo_tons,
                floor_area_m2,
            } => write!(f, ", capacity: {} ton, area: {} m2", cargo_tons, floor_area_m2),
            VehicleKind::CoveredFreightCar { volume_m3 } => {
                write!(f, ", volume: {} m3", volume_m3)
            }
            VehicleKind::ElectricLocomotive {
                max_speed_kph,
                power_kw,
            } => write!(f, ", max speed: {} km/h, power: {} kw", max_speed_kph, power_kw),
            VehicleKind::DieselLocomotive {
                max_speed_kph,
                fuel_lph,
            } => write!(f, ", max speed: {} km/h, fuel: {} l/h", max_speed_kph, fuel_lph),
        }
    }
}
