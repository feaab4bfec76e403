//! Simulation orchestration and control
//!
//! This module contains the event queue, the train event cascade, the
//! orchestrator that ties configuration to a network, statistics collection
//! and error handling.
//!
//! # Overview
//!
//! - **Event**: one step of a train's day (Start, Assembly, Ready, Departure,
//!   Arrival, Disassembly) processed against an explicit `EventContext`
//! - **Simulator**: time-ordered event queue, logical clock and time bounds
//! - **SimulationOrchestrator**: loads or generates the network and drives the
//!   simulator in complete, interval or single-event steps
//! - **SimulationStatistics**: delays, unfinished trains and car counts of a run
//! - **SimulationError**: error type shared by every simulation operation
//!
//! # Usage Example
//!
//! ```rust
//! use rail_network_simulator::simulation::*;
//! use rail_network_simulator::types::SimulationConfig;
//!
//! let config = SimulationConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
//! orchestrator.run_to_completion().unwrap();
//! assert!(orchestrator.is_finished());
//!
//! let statistics = orchestrator.statistics().unwrap();
//! assert_eq!(statistics.total_trains, 12);
//! ```

pub mod error;
pub mod event;
pub mod logging;
pub mod orchestrator;
pub mod simulator;
pub mod statistics;

// Re-export all public types for convenience
pub use error::*;
pub use event::{Event, EventContext, EventKind};
pub use logging::*;
pub use orchestrator::*;
pub use simulator::*;
pub use statistics::*;
