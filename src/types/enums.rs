//! Enumeration types for the rail network simulator
//!
//! This module contains the enumerations shared across the crate: the train
//! state machine, the kinds of rolling stock and of simulation events, and the
//! run modes offered by the command line front end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational state of a train
///
/// Variants are declared in operational order, so the derived ordering can be
/// used for "has departed" style checks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TrainState {
    /// No cars attached yet, or cars just returned to a station
    #[default]
    NotAssembled,
    /// Some required cars were missing at the last assembly attempt
    Incomplete,
    /// Every slot holds a car
    Assembled,
    /// Waiting at the platform
    Ready,
    /// Travelling between stations
    Running,
    /// Standing at the destination platform
    Arrived,
    /// Disassembled at the destination; done for the day
    Finished,
}

impl TrainState {
    /// All states in operational order
    pub const ALL: [TrainState; 7] = [
        TrainState::NotAssembled,
        TrainState::Incomplete,
        TrainState::Assembled,
        TrainState::Ready,
        TrainState::Running,
        TrainState::Arrived,
        TrainState::Finished,
    ];

    /// Check whether moving from `self` to `next` is a legal transition
    ///
    /// Re-setting the current state is always allowed.
    pub fn can_transition_to(self, next: TrainState) -> bool {
        use TrainState::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (NotAssembled, Incomplete)
                | (NotAssembled, Assembled)
                | (Incomplete, NotAssembled)
                | (Incomplete, Assembled)
                | (Assembled, Ready)
                | (Ready, Running)
                | (Running, Arrived)
                | (Arrived, NotAssembled)
                | (Arrived, Finished)
                | (NotAssembled, Finished)
        )
    }

    /// Check whether a train in this state has left its origin
    pub fn has_departed(self) -> bool {
        self >= TrainState::Running
    }
}

impl fmt::Display for TrainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainState::NotAssembled => write!(f, "NOT ASSEMBLED"),
            TrainState::Incomplete => write!(f, "INCOMPLETE"),
            TrainState::Assembled => write!(f, "ASSEMBLED"),
            TrainState::Ready => write!(f, "READY"),
            TrainState::Running => write!(f, "RUNNING"),
            TrainState::Arrived => write!(f, "ARRIVED"),
            TrainState::Finished => write!(f, "FINISHED"),
        }
    }
}

impl FromStr for TrainState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not assembled" | "notassembled" => Ok(TrainState::NotAssembled),
            "incomplete" => Ok(TrainState::Incomplete),
            "assembled" => Ok(TrainState::Assembled),
            "ready" => Ok(TrainState::Ready),
            "running" => Ok(TrainState::Running),
            "arrived" => Ok(TrainState::Arrived),
            "finished" => Ok(TrainState::Finished),
            _ => Err(format!("Unknown train state: {}", s)),
        }
    }
}

/// The six kinds of rolling stock
///
/// The numeric codes returned by [`CarType::code`] are the ones used in
/// timetable layouts, `0` for a coach through `5` for a diesel locomotive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CarType {
    /// Passenger coach with seats
    Coach,
    /// Passenger car with beds
    SleepingCar,
    /// Flatbed freight car
    OpenFreightCar,
    /// Enclosed freight car
    CoveredFreightCar,
    /// Electric engine
    ElectricLocomotive,
    /// Diesel engine
    DieselLocomotive,
}

impl CarType {
    /// All car types in code order
    pub const ALL: [CarType; 6] = [
        CarType::Coach,
        CarType::SleepingCar,
        CarType::OpenFreightCar,
        CarType::CoveredFreightCar,
        CarType::ElectricLocomotive,
        CarType::DieselLocomotive,
    ];

    /// Numeric layout code
    pub fn code(self) -> u8 {
        match self {
            CarType::Coach => 0,
            CarType::SleepingCar => 1,
            CarType::OpenFreightCar => 2,
            CarType::CoveredFreightCar => 3,
            CarType::ElectricLocomotive => 4,
            CarType::DieselLocomotive => 5,
        }
    }

    /// Look up a car type by its layout code
    pub fn from_code(code: u8) -> Option<CarType> {
        CarType::ALL.get(usize::from(code)).copied()
    }

    /// Check whether this type can pull a train
    pub fn is_locomotive(self) -> bool {
        matches!(self, CarType::ElectricLocomotive | CarType::DieselLocomotive)
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarType::Coach => write!(f, "Coach"),
            CarType::SleepingCar => write!(f, "Sleeping Car"),
            CarType::OpenFreightCar => write!(f, "Open Freight Car"),
            CarType::CoveredFreightCar => write!(f, "Covered Freight Car"),
            CarType::ElectricLocomotive => write!(f, "Electric Locomotive"),
            CarType::DieselLocomotive => write!(f, "Diesel Locomotive"),
        }
    }
}

impl FromStr for CarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return CarType::from_code(code).ok_or_else(|| format!("Unknown car type code: {}", code));
        }
        match trimmed.to_lowercase().as_str() {
            "coach" => Ok(CarType::Coach),
            "sleeping car" | "sleepingcar" | "sleeper" => Ok(CarType::SleepingCar),
            "open freight car" | "openfreightcar" | "open freight" => Ok(CarType::OpenFreightCar),
            "covered freight car" | "coveredfreightcar" | "covered freight" => {
                Ok(CarType::CoveredFreightCar)
            }
            "electric locomotive" | "electriclocomotive" | "electric" => {
                Ok(CarType::ElectricLocomotive)
            }
            "diesel locomotive" | "diesellocomotive" | "diesel" => Ok(CarType::DieselLocomotive),
            _ => Err(format!("Unknown car type: {}", s)),
        }
    }
}

/// Kinds of simulation events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Seeds the first assembly attempt of every train
    Start,
    /// Attempt to fill a train's slots from its origin station
    Assembly,
    /// Train reaches the platform
    Ready,
    /// Train leaves its origin
    Departure,
    /// Train reaches its destination
    Arrival,
    /// Train's cars return to the destination station
    Disassembly,
}

impl EventType {
    /// Check whether events of this kind may run past the simulation end
    pub fn is_high_priority(self) -> bool {
        matches!(self, EventType::Arrival | EventType::Disassembly)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Start => write!(f, "Start"),
            EventType::Assembly => write!(f, "Assembly"),
            EventType::Ready => write!(f, "Ready"),
            EventType::Departure => write!(f, "Departure"),
            EventType::Arrival => write!(f, "Arrival"),
            EventType::Disassembly => write!(f, "Disassembly"),
        }
    }
}

/// How the command line front end drives the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunMode {
    /// Run every event until the simulation is finished
    Complete,
    /// Advance one interval at a time, printing each window
    Interval,
    /// Process one event at a time, printing each step
    Step,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Complete => write!(f, "complete"),
            RunMode::Interval => write!(f, "interval"),
            RunMode::Step => write!(f, "step"),
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" | "full" => Ok(RunMode::Complete),
            "interval" => Ok(RunMode::Interval),
            "step" | "event" => Ok(RunMode::Step),
            _ => Err(format!("Unknown run mode: {}", s)),
        }
    }
}
