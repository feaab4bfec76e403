//! Append-only simulation history
//!
//! - **TrainLog**: time-ordered train events, each holding a value snapshot of
//!   the train at the moment it was logged
//! - **CarLog**: per-car arrival records

pub mod car_log;
pub mod train_log;

pub use car_log::{CarLog, CarRecord};
pub use train_log::{TrainLog, TrainRecord};
