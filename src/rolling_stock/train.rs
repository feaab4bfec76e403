//! Trains and their car slots
//!
//! A [`Train`] is built from a layout of required car types. Each layout
//! position becomes a [`Slot`] which starts empty and later owns exactly one
//! matching [`Vehicle`] until the train is disassembled.

use super::Vehicle;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{CarId, CarType, TimeOfDay, TrainNumber, TrainState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One car position in a train's consist
#[derive(Debug, Clone)]
pub struct Slot {
    required: CarType,
    car: Option<Vehicle>,
}

impl Slot {
    fn new(required: CarType) -> Self {
        Self { required, car: None }
    }

    /// Car type this position requires
    pub fn required_type(&self) -> CarType {
        self.required
    }

    /// The car occupying this position, if any
    pub fn car(&self) -> Option<&Vehicle> {
        self.car.as_ref()
    }

    /// Check whether the slot is empty and requires `car_type`
    pub fn accepts(&self, car_type: CarType) -> bool {
        self.car.is_none() && self.required == car_type
    }
}

/// A train and its current consist
#[derive(Debug, Clone)]
pub struct Train {
    number: TrainNumber,
    state: TrainState,
    departure: TimeOfDay,
    departure_delay: TimeOfDay,
    arrival_delay: TimeOfDay,
    current_speed: f64,
    slots: Vec<Slot>,
}

impl Train {
    /// Create an unassembled train with one empty slot per layout entry
    pub fn new(number: TrainNumber, departure: TimeOfDay, layout: &[CarType]) -> Self {
        Self {
            number,
            state: TrainState::default(),
            departure,
            departure_delay: TimeOfDay::default(),
            arrival_delay: TimeOfDay::default(),
            current_speed: 0.0,
            slots: layout.iter().copied().map(Slot::new).collect(),
        }
    }

    /// Timetable number
    pub fn number(&self) -> TrainNumber {
        self.number
    }

    /// Current state
    pub fn state(&self) -> TrainState {
        self.state
    }

    /// Current, delay-adjusted departure time
    pub fn departure(&self) -> TimeOfDay {
        self.departure
    }

    /// All slots in layout order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Check whether every slot holds a car
    pub fn is_assembled(&self) -> bool {
        self.slots.iter().all(|slot| slot.car.is_some())
    }

    /// Check whether the train has left its origin
    pub fn has_departed(&self) -> bool {
        self.state.has_departed()
    }

    /// Required types of every empty slot, in layout order
    pub fn missing_car_types(&self) -> Vec<CarType> {
        self.slots
            .iter()
            .filter(|slot| slot.car.is_none())
            .map(|slot| slot.required)
            .collect()
    }

    /// Check whether an empty slot of `car_type` exists
    pub fn misses_car_of_type(&self, car_type: CarType) -> bool {
        self.slots.iter().any(|slot| slot.accepts(car_type))
    }

    /// Check whether the car with `id` is attached
    pub fn has_car(&self, id: CarId) -> bool {
        self.attached_cars().any(|car| car.id == id)
    }

    /// Move the departure time by `minutes`
    pub fn delay_departure(&mut self, minutes: i32) {
        self.departure.add_minutes(minutes);
    }

    /// Place a car into the first empty slot that requires its type
    ///
    /// On failure the car is handed back inside the error tuple so that it is
    /// never dropped.
    pub fn attach_car(&mut self, car: Vehicle) -> Result<(), (SimulationError, Vehicle)> {
        let car_type = car.car_type();
        match self.slots.iter_mut().find(|slot| slot.accepts(car_type)) {
            Some(slot) => {
                slot.car = Some(car);
                Ok(())
            }
            None => Err((
                SimulationError::invalid_operation(format!(
                    "Train {} has no empty slot for a {}",
                    self.number, car_type
                )),
                car,
            )),
        }
    }

    /// Change state, rejecting transitions the state machine does not allow
    pub fn set_state(&mut self, next: TrainState) -> SimulationResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(SimulationError::invalid_operation(format!(
                "Train {} cannot go from {} to {}",
                self.number, self.state, next
            )));
        }
        self.state = next;
        Ok(())
    }

    /// Borrow an attached car by id
    pub fn view_car(&self, id: CarId) -> SimulationResult<&Vehicle> {
        self.attached_cars().find(|car| car.id == id).ok_or_else(|| {
            SimulationError::invalid_operation(format!(
                "Car {} is not attached to train {}",
                id, self.number
            ))
        })
    }

    /// Iterate over attached cars in layout order
    pub fn attached_cars(&self) -> impl Iterator<Item = &Vehicle> {
        self.slots.iter().filter_map(|slot| slot.car.as_ref())
    }

    /// Number of attached cars
    pub fn car_count(&self) -> usize {
        self.attached_cars().count()
    }

    /// Slowest engine speed, or `0.0` without an engine attached
    pub fn max_speed(&self) -> f64 {
        self.attached_cars()
            .filter_map(Vehicle::max_speed)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Current speed in km/h
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    /// Set the current speed; fails above [`Train::max_speed`]
    pub fn set_speed(&mut self, speed: f64) -> SimulationResult<()> {
        let max = self.max_speed();
        if speed > max {
            return Err(SimulationError::invalid_operation(format!(
                "Train {} cannot run at {:.0} km/h, maximum is {:.0} km/h",
                self.number, speed, max
            )));
        }
        self.current_speed = speed;
        Ok(())
    }

    /// Recorded departure delay
    pub fn departure_delay(&self) -> TimeOfDay {
        self.departure_delay
    }

    /// Record the departure delay
    pub fn set_departure_delay(&mut self, delay: TimeOfDay) {
        self.departure_delay = delay;
    }

    /// Recorded arrival delay
    pub fn arrival_delay(&self) -> TimeOfDay {
        self.arrival_delay
    }

    /// Record the arrival delay
    pub fn set_arrival_delay(&mut self, delay: TimeOfDay) {
        self.arrival_delay = delay;
    }

    /// Remove every attached car and return the train to `NotAssembled`
    pub fn disassemble(&mut self) -> SimulationResult<Vec<Vehicle>> {
        self.set_state(TrainState::NotAssembled)?;
        Ok(self.slots.iter_mut().filter_map(|slot| slot.car.take()).collect())
    }

    /// Capture an immutable copy of the train's current condition
    pub fn snapshot(&self) -> TrainSnapshot {
        TrainSnapshot {
            number: self.number,
            state: self.state,
            departure: self.departure,
            departure_delay: self.departure_delay,
            arrival_delay: self.arrival_delay,
            current_speed: self.current_speed,
            max_speed: self.max_speed(),
            cars: self.attached_cars().cloned().collect(),
            missing: self.missing_car_types(),
        }
    }
}

/// Value copy of a train at one instant, as kept by the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSnapshot {
    /// Timetable number
    pub number: TrainNumber,
    /// State at the time of capture
    pub state: TrainState,
    /// Delay-adjusted departure
    pub departure: TimeOfDay,
    /// Departure delay
    pub departure_delay: TimeOfDay,
    /// Arrival delay
    pub arrival_delay: TimeOfDay,
    /// Speed in km/h
    pub current_speed: f64,
    /// Slowest engine speed in km/h
    pub max_speed: f64,
    /// Attached cars in layout order
    pub cars: Vec<Vehicle>,
    /// Types of the empty slots
    pub missing: Vec<CarType>,
}

impl fmt::Display for TrainSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Train [{}] ({}) departure {} delay {}",
            self.number,
            self.state,
            self.departure,
            self.departure_delay.raw_time()
        )?;
        if !self.cars.is_empty() {
            let ids: Vec<String> = self.cars.iter().map(|car| car.id.to_string()).collect();
            write!(f, " cars [{}]", ids.join(", "))?;
        }
        if !self.missing.is_empty() {
            let types: Vec<String> = self.missing.iter().map(ToString::to_string).collect();
            write!(f, " missing [{}]", types.join(", "))?;
        }
        Ok(())
    }
}
