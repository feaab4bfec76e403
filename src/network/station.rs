//! Stations and their car pools

use crate::rolling_stock::Vehicle;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{CarId, CarType};
use serde::{Deserialize, Serialize};

/// A station and the cars currently parked there
///
/// The pool is kept sorted by car id, so taking a car by type always yields
/// the lowest-id car of that type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StationData")]
pub struct Station {
    name: String,
    cars: Vec<Vehicle>,
}

#[derive(Deserialize)]
struct StationData {
    name: String,
    #[serde(default)]
    cars: Vec<Vehicle>,
}

impl From<StationData> for Station {
    fn from(data: StationData) -> Self {
        Station::with_cars(data.name, data.cars)
    }
}

impl Station {
    /// Create a station with an empty pool
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            cars: Vec::new(),
        }
    }

    /// Create a station holding `cars`
    pub fn with_cars(name: impl Into<String>, cars: Vec<Vehicle>) -> Self {
        let mut station = Self::new(name);
        for car in cars {
            station.add_car(car);
        }
        station
    }

    /// Station name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether a car of `car_type` is parked here
    pub fn has_car_of_type(&self, car_type: CarType) -> bool {
        self.cars.iter().any(|car| car.car_type() == car_type)
    }

    /// Check whether the car with `id` is parked here
    pub fn has_car(&self, id: CarId) -> bool {
        self.position_of(id).is_ok()
    }

    /// Number of parked cars
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Number of parked cars of `car_type`
    pub fn count_of_type(&self, car_type: CarType) -> usize {
        self.cars.iter().filter(|car| car.car_type() == car_type).count()
    }

    /// Check whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Borrow a parked car by id
    pub fn view_car(&self, id: CarId) -> SimulationResult<&Vehicle> {
        self.position_of(id)
            .map(|index| &self.cars[index])
            .map_err(|_| self.missing_car(id))
    }

    /// All parked cars, sorted by id
    pub fn available_cars(&self) -> &[Vehicle] {
        &self.cars
    }

    /// Park a car, keeping the pool sorted
    pub fn add_car(&mut self, car: Vehicle) {
        let index = self.cars.partition_point(|parked| parked.id < car.id);
        self.cars.insert(index, car);
    }

    /// Remove and return the lowest-id car of `car_type`
    pub fn take_car(&mut self, car_type: CarType) -> SimulationResult<Vehicle> {
        let index = self
            .cars
            .iter()
            .position(|car| car.car_type() == car_type)
            .ok_or_else(|| {
                SimulationError::not_found(format!("No {} available at {}", car_type, self.name))
            })?;
        Ok(self.cars.remove(index))
    }

    /// Remove and return the car with `id`
    pub fn take_car_by_id(&mut self, id: CarId) -> SimulationResult<Vehicle> {
        let index = self.position_of(id).map_err(|_| self.missing_car(id))?;
        Ok(self.cars.remove(index))
    }

    fn position_of(&self, id: CarId) -> Result<usize, usize> {
        self.cars.binary_search_by_key(&id, |car| car.id)
    }

    fn missing_car(&self, id: CarId) -> SimulationError {
        SimulationError::not_found(format!("No car {} at {}", id, self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> Station {
        Station::with_cars(
            "Central",
            vec![
                Vehicle::coach(9, 60, true),
                Vehicle::electric_locomotive(2, 160.0, 3000.0),
                Vehicle::coach(4, 50, false),
            ],
        )
    }

    #[test]
    fn test_pool_is_sorted_by_id() {
        let station = station();
        let ids: Vec<CarId> = station.available_cars().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CarId(2), CarId(4), CarId(9)]);
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(Station::new("  North ").name(), "North");
    }

    #[test]
    fn test_queries() {
        let station = station();
        assert!(station.has_car_of_type(CarType::Coach));
        assert!(!station.has_car_of_type(CarType::SleepingCar));
        assert!(station.has_car(CarId(4)));
        assert!(!station.has_car(CarId(5)));
        assert_eq!(station.car_count(), 3);
        assert_eq!(station.count_of_type(CarType::Coach), 2);
        assert!(!station.is_empty());
        assert_eq!(station.view_car(CarId(9)).unwrap().passenger_capacity(), Some(60));
        assert!(matches!(
            station.view_car(CarId(1)),
            Err(SimulationError::NotFound(_))
        ));
    }

    #[test]
    fn test_take_car_picks_lowest_id() {
        let mut station = station();
        let car = station.take_car(CarType::Coach).unwrap();
        assert_eq!(car.id, CarId(4));
        let car = station.take_car(CarType::Coach).unwrap();
        assert_eq!(car.id, CarId(9));
        assert!(matches!(
            station.take_car(CarType::Coach),
            Err(SimulationError::NotFound(_))
        ));
        assert_eq!(station.car_count(), 1);
    }

    #[test]
    fn test_take_car_by_id() {
        let mut station = station();
        let car = station.take_car_by_id(CarId(2)).unwrap();
        assert!(car.has_engine());
        assert!(station.take_car_by_id(CarId(2)).is_err());
    }

    #[test]
    fn test_add_car_keeps_order() {
        let mut station = station();
        station.add_car(Vehicle::sleeping_car(3, 20));
        station.add_car(Vehicle::sleeping_car(100, 20));
        let ids: Vec<u32> = station.available_cars().iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 4, 9, 100]);
    }

    #[test]
    fn test_deserialization_sorts_pool() {
        let station: Station = serde_json::from_str(
            r#"{"name": "East", "cars": [
                {"id": 8, "type": "SleepingCar", "beds": 10},
                {"id": 3, "type": "CoveredFreightCar", "volume_m3": 80.0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(station.available_cars()[0].id, CarId(3));

        let empty: Station = serde_json::from_str(r#"{"name": "West"}"#).unwrap();
        assert!(empty.is_empty());
    }
}
