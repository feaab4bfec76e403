//! Rail network: stations, tracks, timetable and the dispatcher that owns them
//!
//! # Overview
//!
//! - **Station**: a named pool of parked cars, sorted by car id
//! - **Path**: an undirected track between two stations
//! - **Connection**: the fixed timetable entry of one train
//! - **TrainDispatcher**: owner of all trains, stations and paths; resolves
//!   car exchanges and computes delays and speeds
//! - **Scenario**: the JSON form of a network
//! - **NetworkGenerator**: seeded generation of consistent synthetic networks
//!
//! # Usage Example
//!
//! ```rust
//! use rail_network_simulator::network::*;
//! use rail_network_simulator::rolling_stock::Vehicle;
//! use rail_network_simulator::types::*;
//!
//! let connection = Connection::new(
//!     101,
//!     "A",
//!     "B",
//!     "08:00".parse().unwrap(),
//!     "09:00".parse().unwrap(),
//!     100.0,
//!     vec![CarType::ElectricLocomotive, CarType::Coach],
//! );
//! let stations = vec![
//!     Station::with_cars(
//!         "A",
//!         vec![
//!             Vehicle::electric_locomotive(1, 160.0, 3000.0),
//!             Vehicle::coach(5, 60, true),
//!         ],
//!     ),
//!     Station::new("B"),
//! ];
//! let paths = vec![Path::new("A", "B", 100.0)];
//!
//! let mut dispatcher = TrainDispatcher::new(vec![connection], stations, paths).unwrap();
//! dispatcher.try_assemble_train(TrainNumber(101)).unwrap();
//! assert!(dispatcher.train_is_assembled(TrainNumber(101)).unwrap());
//! ```

pub mod connection;
pub mod dispatcher;
pub mod generator;
pub mod path;
pub mod scenario;
pub mod station;

// Re-export all public types for convenience
pub use connection::Connection;
pub use dispatcher::{calc_speed, calc_travel_time, TrainDispatcher, IN_TRANSIT};
pub use generator::NetworkGenerator;
pub use path::Path;
pub use scenario::Scenario;
pub use station::Station;
