//! Rail Network Simulator
//!
//! A discrete-event simulation of one day of operation of a rail network:
//! trains are assembled from cars parked at stations, leave on schedule (or
//! late), travel at a computed speed and are taken apart at their destination.
//!
//! # Overview
//!
//! Every train follows a fixed cascade of events driven by a logical clock:
//!
//! ```text
//! Start ─► Assembly ─┬─► Ready ─► Departure ─► Arrival ─► Disassembly
//!              ▲     │
//!              └─────┘ (missing cars: retry later, departure delayed)
//! ```
//!
//! ## Key Features
//!
//! - **Typed rolling stock**: coaches, sleeping cars, freight cars and
//!   locomotives as one closed enum
//! - **Train state machine**: illegal transitions are rejected
//! - **Dispatcher**: car exchange between stations and trains, delay and speed
//!   computation
//! - **Event queue**: time ordered, FIFO among equal times, with high-priority
//!   arrivals allowed past the end of the day
//! - **History**: train log with value snapshots and per-car arrival records
//! - **Scenarios**: JSON network files or seeded synthetic networks
//!
//! ## Quick Start
//!
//! ```rust
//! use rail_network_simulator::*;
//!
//! let config = SimulationConfig {
//!     seed: Some(1),
//!     ..Default::default()
//! };
//!
//! let mut orchestrator = SimulationOrchestrator::new(config)?;
//! let records = orchestrator.run_to_completion()?;
//! println!("{} train events logged", records.len());
//! println!("{}", orchestrator.statistics()?.generate_compact_summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: time of day, identifiers, enums and configuration
//! - [`rolling_stock`]: vehicles and trains
//! - [`network`]: stations, paths, timetable, dispatcher, scenarios
//! - [`history`]: train and car logs
//! - [`simulation`]: events, simulator, orchestrator, statistics, logging
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod history;
pub mod network;
pub mod rolling_stock;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    CarId, CarType, ConfigError, ConfigValidationError, EventType, LeadTimes, RunMode,
    SimulationConfig, TimeOfDay, TrainNumber, TrainState,
};

// Rolling stock
pub use rolling_stock::{Train, TrainSnapshot, Vehicle, VehicleKind};

// Network
pub use network::{Connection, NetworkGenerator, Path, Scenario, Station, TrainDispatcher};

// History
pub use history::{CarLog, CarRecord, TrainLog, TrainRecord};

// Simulation types and functionality
pub use simulation::{
    Event, EventKind, LoggingConfig, SimulationError, SimulationOrchestrator, SimulationResult,
    SimulationStatistics, Simulator,
};
