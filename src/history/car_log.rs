//! Per-car arrival history

use crate::rolling_stock::Train;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{CarId, TimeOfDay, TrainNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One arrival of a car at a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Arrival time
    pub time: TimeOfDay,
    /// Train the car travelled with
    pub train_number: TrainNumber,
    /// Station the car arrived at
    pub destination: String,
}

/// Arrival history of every car that has travelled
#[derive(Debug, Clone, Default)]
pub struct CarLog {
    history: HashMap<CarId, Vec<CarRecord>>,
}

impl CarLog {
    /// Create an empty car log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arrival for every car attached to `train`
    ///
    /// Returns the number of records added.
    pub fn log_arrival(&mut self, time: TimeOfDay, train: &Train, destination: &str) -> usize {
        let mut logged = 0;
        for car in train.attached_cars() {
            self.history.entry(car.id).or_default().push(CarRecord {
                time,
                train_number: train.number(),
                destination: destination.to_string(),
            });
            logged += 1;
        }
        logged
    }

    /// Arrival history of one car
    pub fn view_record_of(&self, id: CarId) -> SimulationResult<&[CarRecord]> {
        self.history
            .get(&id)
            .map(Vec::as_slice)
            .ok_or_else(|| SimulationError::not_found(format!("No such car: {}", id)))
    }

    /// Number of cars with at least one record
    pub fn tracked_cars(&self) -> usize {
        self.history.len()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rolling_stock::Vehicle;
    use crate::types::CarType;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn train() -> Train {
        let mut train = Train::new(
            TrainNumber(101),
            t("08:00"),
            &[CarType::ElectricLocomotive, CarType::Coach],
        );
        train
            .attach_car(Vehicle::electric_locomotive(1, 160.0, 3000.0))
            .unwrap();
        train.attach_car(Vehicle::coach(5, 60, true)).unwrap();
        train
    }

    #[test]
    fn test_log_arrival_fans_out_per_car() {
        let mut log = CarLog::new();
        assert_eq!(log.log_arrival(t("09:00"), &train(), "B"), 2);
        assert_eq!(log.tracked_cars(), 2);

        let records = log.view_record_of(CarId(5)).unwrap();
        assert_eq!(
            records,
            &[CarRecord {
                time: t("09:00"),
                train_number: TrainNumber(101),
                destination: "B".to_string(),
            }]
        );
    }

    #[test]
    fn test_history_accumulates() {
        let mut log = CarLog::new();
        log.log_arrival(t("09:00"), &train(), "B");
        log.log_arrival(t("15:00"), &train(), "C");
        let records = log.view_record_of(CarId(1)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].destination, "C");
    }

    #[test]
    fn test_unknown_car_is_not_found() {
        let mut log = CarLog::new();
        assert!(matches!(
            log.view_record_of(CarId(9)),
            Err(SimulationError::NotFound(_))
        ));
        log.log_arrival(t("09:00"), &train(), "B");
        log.clear();
        assert!(log.view_record_of(CarId(1)).is_err());
    }
}
