//! Core types and identifiers for the rail network simulator
//!
//! This module contains fundamental value types and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Time**: [`TimeOfDay`], a minute-resolution clock value with day rollover
//! - **Identifiers**: train numbers and system-wide car ids
//! - **Enums**: the train state machine, car types and run modes
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use rail_network_simulator::types::*;
//!
//! let departure: TimeOfDay = "08:00".parse().unwrap();
//! let mut assembly = departure;
//! assembly.add_minutes(-30);
//! assert_eq!(assembly.to_string(), "07:30");
//!
//! assert!(TrainState::Running.has_departed());
//! assert!(CarType::DieselLocomotive.is_locomotive());
//!
//! let config = SimulationConfig {
//!     train_count: 5,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;
pub mod time;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
pub use time::*;
