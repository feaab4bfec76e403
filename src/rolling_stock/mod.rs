//! Rolling stock: cars, locomotives and the trains they form
//!
//! # Overview
//!
//! - **Vehicle**: a car or locomotive with a system-wide unique id and a
//!   kind-specific payload
//! - **Train**: an ordered set of typed slots that own the attached cars,
//!   together with the train's state, delays and speed
//! - **TrainSnapshot**: a value copy of a train, used by the event log
//!
//! # Usage Example
//!
//! ```rust
//! use rail_network_simulator::rolling_stock::*;
//! use rail_network_simulator::types::*;
//!
//! let mut train = Train::new(
//!     TrainNumber(101),
//!     "08:00".parse().unwrap(),
//!     &[CarType::ElectricLocomotive, CarType::Coach],
//! );
//! train.attach_car(Vehicle::electric_locomotive(1, 160.0, 3000.0)).unwrap();
//! train.attach_car(Vehicle::coach(5, 60, true)).unwrap();
//! assert!(train.is_assembled());
//! assert_eq!(train.max_speed(), 160.0);
//! ```

pub mod train;
pub mod vehicle;

pub use train::{Slot, Train, TrainSnapshot};
pub use vehicle::{Vehicle, VehicleKind};
