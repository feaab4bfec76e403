//! Train dispatcher
//!
//! The [`TrainDispatcher`] owns every train, its timetable entry, every
//! station and the track map. All mutation of that state goes through the
//! dispatcher's commands, which keep cars in exactly one place at a time:
//! either a station pool or a train slot.

use super::{Connection, Path, Station};
use crate::rolling_stock::{Train, Vehicle};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{CarId, TimeOfDay, TrainNumber, TrainState, MINUTES_PER_HOUR};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Location reported for a train that is between stations
pub const IN_TRANSIT: &str = "In transit";

/// Travel time in whole minutes for `distance_km` at `speed_kph`
///
/// Fails with `InvalidOperation` for a non-positive or NaN speed. Travel
/// times beyond the `i32` minute range saturate.
pub fn calc_travel_time(distance_km: f64, speed_kph: f64) -> SimulationResult<TimeOfDay> {
    if speed_kph.is_nan() || speed_kph <= 0.0 {
        return Err(SimulationError::invalid_operation(format!(
            "Cannot compute travel time for {} km at {} km/h",
            distance_km, speed_kph
        )));
    }
    Ok(TimeOfDay::from_real_minutes(
        distance_km / speed_kph * f64::from(MINUTES_PER_HOUR),
    ))
}

/// Speed in km/h that covers `distance_km` in `travel_minutes`
pub fn calc_speed(distance_km: f64, travel_minutes: i32) -> f64 {
    distance_km / (f64::from(travel_minutes) / f64::from(MINUTES_PER_HOUR))
}

fn usable_speed(speed_kph: f64) -> bool {
    speed_kph.is_finite() && speed_kph > 0.0
}

/// Owner of all trains, timetable entries, stations and paths
#[derive(Debug, Clone)]
pub struct TrainDispatcher {
    connections: Vec<Connection>,
    trains: Vec<Train>,
    stations: Vec<Station>,
    paths: Vec<Path>,
    /// Lookup from train number to the shared index of `connections` and `trains`
    train_index: HashMap<TrainNumber, usize>,
    /// Lookup from station name to index in `stations`
    station_index: HashMap<String, usize>,
}

impl TrainDispatcher {
    /// Build a dispatcher from a loaded network
    ///
    /// One train is created per connection, in connection order. The network
    /// is checked for duplicate train numbers, station names and car ids,
    /// for connections that refer to unknown stations or unconnected station
    /// pairs, for layouts that could never move, and for engines or tracks
    /// without a usable speed.
    #[instrument(skip_all, fields(connections = connections.len(), stations = stations.len(), paths = paths.len()))]
    pub fn new(
        connections: Vec<Connection>,
        stations: Vec<Station>,
        paths: Vec<Path>,
    ) -> SimulationResult<Self> {
        let mut station_index = HashMap::with_capacity(stations.len());
        let mut car_ids = HashSet::new();
        for (idx, station) in stations.iter().enumerate() {
            if station_index.insert(station.name().to_string(), idx).is_some() {
                return Err(SimulationError::invalid_operation(format!(
                    "Duplicate station: {}",
                    station.name()
                )));
            }
            for car in station.available_cars() {
                if !car_ids.insert(car.id) {
                    return Err(SimulationError::invalid_operation(format!(
                        "Duplicate car id: {}",
                        car.id
                    )));
                }
                if let Some(speed) = car.max_speed() {
                    if !usable_speed(speed) {
                        return Err(SimulationError::invalid_operation(format!(
                            "Locomotive {} has an unusable maximum speed: {} km/h",
                            car.id, speed
                        )));
                    }
                }
            }
        }

        let mut train_index = HashMap::with_capacity(connections.len());
        for (idx, connection) in connections.iter().enumerate() {
            let nbr = connection.train_number;
            if train_index.insert(nbr, idx).is_some() {
                return Err(SimulationError::invalid_operation(format!(
                    "Duplicate train number: {}",
                    nbr
                )));
            }
            for name in [&connection.origin, &connection.destination] {
                if !station_index.contains_key(name) {
                    return Err(SimulationError::not_found(format!(
                        "Station does not exist: {} (train {})",
                        name, nbr
                    )));
                }
            }
            if !paths
                .iter()
                .any(|path| path.connects(&connection.origin, &connection.destination))
            {
                return Err(SimulationError::not_found(format!(
                    "No path between {} and {} (train {})",
                    connection.origin, connection.destination, nbr
                )));
            }
            if !connection.has_locomotive() {
                return Err(SimulationError::invalid_operation(format!(
                    "Train {} has no locomotive in its layout",
                    nbr
                )));
            }
            if !usable_speed(connection.max_speed_kph) {
                return Err(SimulationError::invalid_operation(format!(
                    "Train {} has an unusable track speed limit",
                    nbr
                )));
            }
        }

        let trains = connections
            .iter()
            .map(|c| Train::new(c.train_number, c.departure, &c.layout))
            .collect();

        debug!("Dispatcher built with {} trains", connections.len());

        Ok(Self {
            connections,
            trains,
            stations,
            paths,
            train_index,
            station_index,
        })
    }

    // ----- lookups -----

    fn index_of(&self, nbr: TrainNumber) -> SimulationResult<usize> {
        self.train_index
            .get(&nbr)
            .copied()
            .ok_or_else(|| SimulationError::not_found(format!("Train does not exist: {}", nbr)))
    }

    fn station_index_of(&self, name: &str) -> SimulationResult<usize> {
        self.station_index
            .get(name)
            .copied()
            .ok_or_else(|| SimulationError::not_found(format!("Station does not exist: {}", name)))
    }

    /// Timetable entry of a train
    pub fn connection(&self, nbr: TrainNumber) -> SimulationResult<&Connection> {
        Ok(&self.connections[self.index_of(nbr)?])
    }

    /// All timetable entries, in loading order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// All trains, in connection order
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// All stations, in loading order
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// The track map
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    // ----- timetable queries -----

    /// Current, delay-adjusted departure
    pub fn estimated_departure(&self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        Ok(self.view_train(nbr)?.departure())
    }

    /// Expected arrival on the departure's timeline
    ///
    /// Before departure this is the scheduled arrival shifted by the
    /// departure delay; afterwards it follows from the current speed. An
    /// arrival past midnight is later than any time of the departure day.
    pub fn estimated_arrival(&self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        let idx = self.index_of(nbr)?;
        if self.trains[idx].has_departed() {
            self.running_arrival_of(idx)
        } else {
            Ok(self.connections[idx].timeline_arrival() + self.static_delay_of(idx))
        }
    }

    /// Scheduled departure
    pub fn scheduled_departure(&self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        Ok(self.connection(nbr)?.departure)
    }

    /// Scheduled arrival
    pub fn scheduled_arrival(&self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        Ok(self.connection(nbr)?.arrival)
    }

    /// Current delay: of the departure before the train leaves, of the
    /// arrival afterwards
    pub fn current_delay(&self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        self.delay_of(self.index_of(nbr)?)
    }

    fn delay_of(&self, idx: usize) -> SimulationResult<TimeOfDay> {
        if self.trains[idx].has_departed() {
            self.running_delay_of(idx)
        } else {
            Ok(self.static_delay_of(idx))
        }
    }

    fn static_delay_of(&self, idx: usize) -> TimeOfDay {
        self.trains[idx]
            .departure()
            .offset_from(self.connections[idx].departure)
    }

    fn running_arrival_of(&self, idx: usize) -> SimulationResult<TimeOfDay> {
        let train = &self.trains[idx];
        let travel = calc_travel_time(self.distance_of(idx)?, train.current_speed())?;
        Ok(train.departure() + travel)
    }

    fn running_delay_of(&self, idx: usize) -> SimulationResult<TimeOfDay> {
        Ok(self
            .running_arrival_of(idx)?
            .offset_from(self.connections[idx].timeline_arrival()))
    }

    /// Numbers of every train, in connection order
    pub fn train_numbers(&self) -> Vec<TrainNumber> {
        self.trains.iter().map(Train::number).collect()
    }

    /// Numbers of trains with a positive arrival delay
    pub fn delayed_trains(&self) -> Vec<TrainNumber> {
        self.trains
            .iter()
            .filter(|train| train.arrival_delay().raw_time() > 0)
            .map(Train::number)
            .collect()
    }

    /// Numbers of trains that never got past `Ready`
    pub fn non_departed_trains(&self) -> Vec<TrainNumber> {
        self.trains
            .iter()
            .filter(|train| train.state() <= TrainState::Ready)
            .map(Train::number)
            .collect()
    }

    /// Borrow a train
    pub fn view_train(&self, nbr: TrainNumber) -> SimulationResult<&Train> {
        Ok(&self.trains[self.index_of(nbr)?])
    }

    /// Borrow the train that holds the car with `id`
    pub fn view_train_by_vehicle_id(&self, id: CarId) -> SimulationResult<&Train> {
        self.trains
            .iter()
            .find(|train| train.has_car(id))
            .ok_or_else(|| SimulationError::not_found(format!("Vehicle is not in any train: {}", id)))
    }

    /// Check whether every slot of a train is filled
    pub fn train_is_assembled(&self, nbr: TrainNumber) -> SimulationResult<bool> {
        Ok(self.view_train(nbr)?.is_assembled())
    }

    /// Check whether every train is `Finished`
    pub fn all_trains_finished(&self) -> bool {
        self.trains
            .iter()
            .all(|train| train.state() == TrainState::Finished)
    }

    /// Sum of recorded departure delays
    pub fn total_departure_delay(&self) -> TimeOfDay {
        self.trains.iter().map(Train::departure_delay).sum()
    }

    /// Sum of recorded arrival delays
    pub fn total_arrival_delay(&self) -> TimeOfDay {
        self.trains.iter().map(Train::arrival_delay).sum()
    }

    /// The lower of the track speed limit and the train's slowest engine
    pub fn max_speed(&self, nbr: TrainNumber) -> SimulationResult<f64> {
        let idx = self.index_of(nbr)?;
        Ok(self.connections[idx]
            .max_speed_kph
            .min(self.trains[idx].max_speed()))
    }

    /// Where a train is: its origin before departure, its destination after
    /// arrival, or [`IN_TRANSIT`] while running
    pub fn train_location(&self, nbr: TrainNumber) -> SimulationResult<&str> {
        Ok(self.location_of(self.index_of(nbr)?))
    }

    fn location_of(&self, idx: usize) -> &str {
        match self.trains[idx].state() {
            TrainState::Running => IN_TRANSIT,
            state if state < TrainState::Running => self.connections[idx].origin.as_str(),
            _ => self.connections[idx].destination.as_str(),
        }
    }

    /// Trains currently located at `name`
    pub fn trains_at_station(&self, name: &str) -> Vec<&Train> {
        (0..self.trains.len())
            .filter(|&idx| self.location_of(idx) == name)
            .map(|idx| &self.trains[idx])
            .collect()
    }

    /// Track length of a train's route
    pub fn distance(&self, nbr: TrainNumber) -> SimulationResult<f64> {
        self.distance_of(self.index_of(nbr)?)
    }

    fn distance_of(&self, idx: usize) -> SimulationResult<f64> {
        let connection = &self.connections[idx];
        self.find_distance(&connection.origin, &connection.destination)
    }

    /// Track length between two stations
    pub fn find_distance(&self, a: &str, b: &str) -> SimulationResult<f64> {
        self.paths
            .iter()
            .find(|path| path.connects(a, b))
            .map(|path| path.distance_km)
            .ok_or_else(|| SimulationError::not_found(format!("No path between {} and {}", a, b)))
    }

    /// Origin station of a train
    pub fn origin(&self, nbr: TrainNumber) -> SimulationResult<&str> {
        Ok(&self.connection(nbr)?.origin)
    }

    /// Destination station of a train
    pub fn destination(&self, nbr: TrainNumber) -> SimulationResult<&str> {
        Ok(&self.connection(nbr)?.destination)
    }

    // ----- station and car queries -----

    /// Names of every station, in loading order
    pub fn station_names(&self) -> Vec<&str> {
        self.stations.iter().map(Station::name).collect()
    }

    /// Borrow a station
    pub fn view_station(&self, name: &str) -> SimulationResult<&Station> {
        Ok(&self.stations[self.station_index_of(name)?])
    }

    /// Every car in the network: attached cars first, then parked cars
    pub fn view_all_cars(&self) -> Vec<&Vehicle> {
        self.trains
            .iter()
            .flat_map(|train| train.attached_cars())
            .chain(self.stations.iter().flat_map(|s| s.available_cars().iter()))
            .collect()
    }

    /// Borrow a car wherever it is
    pub fn view_car(&self, id: CarId) -> SimulationResult<&Vehicle> {
        if let Some(train) = self.trains.iter().find(|train| train.has_car(id)) {
            return train.view_car(id);
        }
        if let Some(station) = self.stations.iter().find(|station| station.has_car(id)) {
            return station.view_car(id);
        }
        Err(SimulationError::not_found(format!("Can not find car with id: {}", id)))
    }

    /// `"Train N"` for an attached car, or the station name for a parked one
    pub fn car_location(&self, id: CarId) -> SimulationResult<String> {
        if let Some(train) = self.trains.iter().find(|train| train.has_car(id)) {
            return Ok(format!("Train {}", train.number()));
        }
        if let Some(station) = self.stations.iter().find(|station| station.has_car(id)) {
            return Ok(station.name().to_string());
        }
        Err(SimulationError::not_found(format!("No vehicle exists with id: {}", id)))
    }

    // ----- commands -----

    /// Move matching cars from the origin pool into the train's empty slots
    ///
    /// Returns the number of cars attached by this attempt.
    pub fn try_assemble_train(&mut self, nbr: TrainNumber) -> SimulationResult<usize> {
        let idx = self.index_of(nbr)?;
        let station_idx = self.station_index_of(&self.connections[idx].origin)?;
        let station = &mut self.stations[station_idx];
        let train = &mut self.trains[idx];

        let mut attached = 0;
        for car_type in train.missing_car_types() {
            if !station.has_car_of_type(car_type) {
                continue;
            }
            let car = station.take_car(car_type)?;
            if let Err((err, car)) = train.attach_car(car) {
                station.add_car(car);
                return Err(err);
            }
            attached += 1;
        }
        debug!(
            "Train {} took {} cars from {}, assembled: {}",
            nbr,
            attached,
            station.name(),
            train.is_assembled()
        );
        Ok(attached)
    }

    /// Move every car of a train into its destination pool
    ///
    /// Returns the number of cars moved.
    pub fn disassemble_train(&mut self, nbr: TrainNumber) -> SimulationResult<usize> {
        let idx = self.index_of(nbr)?;
        let station_idx = self.station_index_of(&self.connections[idx].destination)?;
        let cars = self.trains[idx].disassemble()?;
        let moved = cars.len();
        for car in cars {
            self.stations[station_idx].add_car(car);
        }
        if self.trains[idx].car_count() != 0 {
            return Err(SimulationError::invalid_operation(format!(
                "Train {} still holds cars after disassembly",
                nbr
            )));
        }
        Ok(moved)
    }

    /// Change a train's state
    pub fn set_state_of_train(&mut self, nbr: TrainNumber, state: TrainState) -> SimulationResult<()> {
        let idx = self.index_of(nbr)?;
        self.trains[idx].set_state(state)
    }

    /// Push a train's departure back by `minutes`
    pub fn delay_departure(&mut self, nbr: TrainNumber, minutes: i32) -> SimulationResult<()> {
        let idx = self.index_of(nbr)?;
        self.trains[idx].delay_departure(minutes);
        Ok(())
    }

    /// Record the current departure delay on the train
    pub fn set_departure_delay(&mut self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        let idx = self.index_of(nbr)?;
        let delay = self.static_delay_of(idx);
        self.trains[idx].set_departure_delay(delay);
        Ok(delay)
    }

    /// Record the arrival delay implied by the current speed
    pub fn set_arrival_delay(&mut self, nbr: TrainNumber) -> SimulationResult<TimeOfDay> {
        let idx = self.index_of(nbr)?;
        let delay = self.running_delay_of(idx)?;
        self.trains[idx].set_arrival_delay(delay);
        Ok(delay)
    }

    /// Pick the slowest speed that still reaches the destination on time,
    /// or the maximum speed when that is not possible
    ///
    /// Returns the chosen speed.
    pub fn set_optimal_speed_of_train(&mut self, nbr: TrainNumber) -> SimulationResult<f64> {
        let idx = self.index_of(nbr)?;
        let distance = self.distance_of(idx)?;
        let max_speed = self.max_speed(nbr)?;
        let min_travel = calc_travel_time(distance, max_speed)?;

        let scheduled_arrival = self.connections[idx].timeline_arrival();
        let optimal_minutes = scheduled_arrival
            .offset_from(self.trains[idx].departure())
            .raw_time()
            .max(0);

        let speed = if min_travel.raw_time() >= optimal_minutes {
            max_speed
        } else {
            calc_speed(distance, optimal_minutes).min(max_speed)
        };
        self.trains[idx].set_speed(speed)?;
        Ok(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CarType;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn connection(nbr: u32, dep: &str, arr: &str, layout: Vec<CarType>) -> Connection {
        Connection::new(nbr, "A", "B", t(dep), t(arr), 100.0, layout)
    }

    fn dispatcher() -> TrainDispatcher {
        TrainDispatcher::new(
            vec![
                connection(
                    101,
                    "08:00",
                    "09:00",
                    vec![CarType::ElectricLocomotive, CarType::Coach],
                ),
                connection(
                    202,
                    "10:00",
                    "12:00",
                    vec![CarType::DieselLocomotive, CarType::SleepingCar],
                ),
            ],
            vec![
                Station::with_cars(
                    "A",
                    vec![
                        Vehicle::electric_locomotive(1, 200.0, 4000.0),
                        Vehicle::coach(5, 60, true),
                        Vehicle::diesel_locomotive(2, 120.0, 300.0),
                    ],
                ),
                Station::new("B"),
            ],
            vec![Path::new("B", "A", 100.0)],
        )
        .unwrap()
    }

    fn run_to(d: &mut TrainDispatcher, nbr: TrainNumber, state: TrainState) {
        for next in [
            TrainState::Assembled,
            TrainState::Ready,
            TrainState::Running,
            TrainState::Arrived,
        ] {
            d.set_state_of_train(nbr, next).unwrap();
            if next == state {
                break;
            }
        }
    }

    #[test]
    fn test_calc_travel_time() {
        assert_eq!(calc_travel_time(100.0, 100.0).unwrap().raw_time(), 60);
        assert_eq!(calc_travel_time(10.0, 40.0).unwrap().raw_time(), 15);
        assert!(matches!(
            calc_travel_time(10.0, 0.0),
            Err(SimulationError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_calc_speed() {
        assert!((calc_speed(100.0, 60) - 100.0).abs() < 1e-9);
        assert!((calc_speed(50.0, 120) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_construction_rejects_duplicates() {
        let duplicate_train = TrainDispatcher::new(
            vec![
                connection(1, "08:00", "09:00", vec![CarType::DieselLocomotive]),
                connection(1, "10:00", "11:00", vec![CarType::DieselLocomotive]),
            ],
            vec![Station::new("A"), Station::new("B")],
            vec![Path::new("A", "B", 10.0)],
        );
        assert!(matches!(duplicate_train, Err(SimulationError::InvalidOperation(_))));

        let duplicate_car = TrainDispatcher::new(
            vec![],
            vec![
                Station::with_cars("A", vec![Vehicle::coach(1, 10, false)]),
                Station::with_cars("B", vec![Vehicle::coach(1, 10, false)]),
            ],
            vec![],
        );
        assert!(matches!(duplicate_car, Err(SimulationError::InvalidOperation(_))));
    }

    #[test]
    fn test_construction_rejects_unknown_station_and_missing_path() {
        let unknown = TrainDispatcher::new(
            vec![connection(1, "08:00", "09:00", vec![CarType::DieselLocomotive])],
            vec![Station::new("A")],
            vec![Path::new("A", "B", 10.0)],
        );
        assert!(matches!(unknown, Err(SimulationError::NotFound(_))));

        let no_path = TrainDispatcher::new(
            vec![connection(1, "08:00", "09:00", vec![CarType::DieselLocomotive])],
            vec![Station::new("A"), Station::new("B")],
            vec![],
        );
        assert!(matches!(no_path, Err(SimulationError::NotFound(_))));
    }

    #[test]
    fn test_construction_rejects_layout_without_engine() {
        let result = TrainDispatcher::new(
            vec![connection(1, "08:00", "09:00", vec![CarType::Coach])],
            vec![Station::new("A"), Station::new("B")],
            vec![Path::new("A", "B", 10.0)],
        );
        assert!(matches!(result, Err(SimulationError::InvalidOperation(_))));
    }

    #[test]
    fn test_construction_rejects_unusable_speeds() {
        for speed in [0.0, -40.0, f64::NAN, f64::INFINITY] {
            let engine = TrainDispatcher::new(
                vec![],
                vec![Station::with_cars(
                    "A",
                    vec![Vehicle::diesel_locomotive(1, speed, 300.0)],
                )],
                vec![],
            );
            assert!(
                matches!(engine, Err(SimulationError::InvalidOperation(_))),
                "engine at {speed} km/h should be rejected"
            );

            let mut track = connection(1, "08:00", "09:00", vec![CarType::DieselLocomotive]);
            track.max_speed_kph = speed;
            let track = TrainDispatcher::new(
                vec![track],
                vec![Station::new("A"), Station::new("B")],
                vec![Path::new("A", "B", 10.0)],
            );
            assert!(
                matches!(track, Err(SimulationError::InvalidOperation(_))),
                "track at {speed} km/h should be rejected"
            );
        }
        assert!(calc_travel_time(10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_crawling_engine_saturates_travel_time() {
        let mut d = TrainDispatcher::new(
            vec![connection(3, "08:00", "09:00", vec![CarType::DieselLocomotive])],
            vec![
                Station::with_cars("A", vec![Vehicle::diesel_locomotive(1, 1e-6, 300.0)]),
                Station::new("B"),
            ],
            vec![Path::new("A", "B", 100.0)],
        )
        .unwrap();
        let nbr = TrainNumber(3);
        d.try_assemble_train(nbr).unwrap();
        d.set_optimal_speed_of_train(nbr).unwrap();
        run_to(&mut d, nbr, TrainState::Running);

        assert_eq!(d.estimated_arrival(nbr).unwrap().raw_time(), i32::MAX);
        let delay = d.set_arrival_delay(nbr).unwrap();
        assert_eq!(delay.raw_time(), i32::MAX - t("09:00").raw_time());
        assert_eq!(d.total_arrival_delay().raw_time(), delay.raw_time());
    }

    #[test]
    fn test_overnight_estimates_stay_on_the_timeline() {
        let mut d = TrainDispatcher::new(
            vec![connection(
                7,
                "23:00",
                "23:40",
                vec![CarType::DieselLocomotive],
            )],
            vec![
                Station::with_cars("A", vec![Vehicle::diesel_locomotive(1, 80.0, 300.0)]),
                Station::new("B"),
            ],
            vec![Path::new("A", "B", 100.0)],
        )
        .unwrap();
        let nbr = TrainNumber(7);
        d.delay_departure(nbr, 40).unwrap();
        assert_eq!(d.current_delay(nbr).unwrap().raw_time(), 40);
        assert_eq!(d.estimated_arrival(nbr).unwrap().raw_time(), 1460);
        d.delay_departure(nbr, -40).unwrap();

        d.try_assemble_train(nbr).unwrap();
        assert_eq!(d.set_optimal_speed_of_train(nbr).unwrap(), 80.0);
        run_to(&mut d, nbr, TrainState::Running);

        // 100 km at 80 km/h takes 75 minutes
        let arrival = d.estimated_arrival(nbr).unwrap();
        assert_eq!(arrival.raw_time(), 1455);
        assert_eq!(arrival.to_string(), "00:15");
        assert!(arrival > d.estimated_departure(nbr).unwrap());
        assert_eq!(d.set_arrival_delay(nbr).unwrap().raw_time(), 35);
        assert_eq!(d.delayed_trains(), vec![nbr]);
    }

    #[test]
    fn test_optimal_speed_for_overnight_connection() {
        let mut d = TrainDispatcher::new(
            vec![connection(
                8,
                "23:30",
                "00:30",
                vec![CarType::ElectricLocomotive],
            )],
            vec![
                Station::with_cars("A", vec![Vehicle::electric_locomotive(1, 200.0, 4000.0)]),
                Station::new("B"),
            ],
            vec![Path::new("A", "B", 50.0)],
        )
        .unwrap();
        let nbr = TrainNumber(8);
        d.try_assemble_train(nbr).unwrap();
        // 50 km in the scheduled 60 minutes
        let speed = d.set_optimal_speed_of_train(nbr).unwrap();
        assert!((speed - 50.0).abs() < 1e-9);

        run_to(&mut d, nbr, TrainState::Running);
        assert_eq!(d.estimated_arrival(nbr).unwrap().raw_time(), 1470);
        assert_eq!(d.set_arrival_delay(nbr).unwrap().raw_time(), 0);
        assert!(d.delayed_trains().is_empty());
    }

    #[test]
    fn test_unknown_train_is_not_found() {
        let d = dispatcher();
        assert!(matches!(
            d.view_train(TrainNumber(999)),
            Err(SimulationError::NotFound(_))
        ));
        assert!(matches!(
            d.view_station("Nowhere"),
            Err(SimulationError::NotFound(_))
        ));
    }

    #[test]
    fn test_try_assemble_moves_cars_from_origin() {
        let mut d = dispatcher();
        let nbr = TrainNumber(101);
        assert_eq!(d.try_assemble_train(nbr).unwrap(), 2);
        assert!(d.train_is_assembled(nbr).unwrap());
        assert_eq!(d.car_location(CarId(5)).unwrap(), "Train 101");
        assert!(!d.view_station("A").unwrap().has_car(CarId(5)));

        // Nothing left to attach
        assert_eq!(d.try_assemble_train(nbr).unwrap(), 0);
    }

    #[test]
    fn test_try_assemble_partial() {
        let mut d = dispatcher();
        let nbr = TrainNumber(202);
        assert_eq!(d.try_assemble_train(nbr).unwrap(), 1);
        assert!(!d.train_is_assembled(nbr).unwrap());
        assert_eq!(
            d.view_train(nbr).unwrap().missing_car_types(),
            vec![CarType::SleepingCar]
        );
    }

    #[test]
    fn test_disassemble_moves_cars_to_destination() {
        let mut d = dispatcher();
        let nbr = TrainNumber(101);
        d.try_assemble_train(nbr).unwrap();
        run_to(&mut d, nbr, TrainState::Arrived);

        assert_eq!(d.disassemble_train(nbr).unwrap(), 2);
        let b = d.view_station("B").unwrap();
        assert!(b.has_car(CarId(1)));
        assert!(b.has_car(CarId(5)));
        assert_eq!(d.view_train(nbr).unwrap().car_count(), 0);
        assert_eq!(d.car_location(CarId(5)).unwrap(), "B");
    }

    #[test]
    fn test_delays_and_estimates() {
        let mut d = dispatcher();
        let nbr = TrainNumber(101);
        d.delay_departure(nbr, 20).unwrap();
        assert_eq!(d.estimated_departure(nbr).unwrap(), t("08:20"));
        assert_eq!(d.current_delay(nbr).unwrap().raw_time(), 20);
        assert_eq!(d.estimated_arrival(nbr).unwrap(), t("09:20"));
        assert_eq!(d.set_departure_delay(nbr).unwrap().raw_time(), 20);
        assert_eq!(d.total_departure_delay().raw_time(), 20);
    }

    #[test]
    fn test_optimal_speed_on_time() {
        let mut d = dispatcher();
        let nbr = TrainNumber(101);
        d.try_assemble_train(nbr).unwrap();
        // 100 km in 60 minutes, track limit 100
        let speed = d.set_optimal_speed_of_train(nbr).unwrap();
        assert!((speed - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_speed_slows_down_when_early() {
        let mut d = TrainDispatcher::new(
            vec![connection(
                7,
                "08:00",
                "10:00",
                vec![CarType::ElectricLocomotive],
            )],
            vec![
                Station::with_cars("A", vec![Vehicle::electric_locomotive(1, 200.0, 4000.0)]),
                Station::new("B"),
            ],
            vec![Path::new("A", "B", 100.0)],
        )
        .unwrap();
        let nbr = TrainNumber(7);
        d.try_assemble_train(nbr).unwrap();
        let speed = d.set_optimal_speed_of_train(nbr).unwrap();
        assert!((speed - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_speed_when_late_uses_max() {
        let mut d = dispatcher();
        let nbr = TrainNumber(101);
        d.try_assemble_train(nbr).unwrap();
        d.delay_departure(nbr, 30).unwrap();
        assert_eq!(d.set_optimal_speed_of_train(nbr).unwrap(), 100.0);

        run_to(&mut d, nbr, TrainState::Running);
        assert_eq!(d.set_arrival_delay(nbr).unwrap().raw_time(), 30);
        assert_eq!(d.delayed_trains(), vec![nbr]);
    }

    #[test]
    fn test_optimal_speed_without_engine_fails() {
        let mut d = dispatcher();
        assert!(matches!(
            d.set_optimal_speed_of_train(TrainNumber(101)),
            Err(SimulationError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_train_location_follows_state() {
        let mut d = dispatcher();
        let nbr = TrainNumber(101);
        assert_eq!(d.train_location(nbr).unwrap(), "A");
        assert_eq!(d.trains_at_station("A").len(), 2);

        run_to(&mut d, nbr, TrainState::Running);
        assert_eq!(d.train_location(nbr).unwrap(), IN_TRANSIT);

        d.set_state_of_train(nbr, TrainState::Arrived).unwrap();
        assert_eq!(d.train_location(nbr).unwrap(), "B");
        assert_eq!(d.trains_at_station("B").len(), 1);
    }

    #[test]
    fn test_non_departed_and_finished() {
        let mut d = dispatcher();
        assert_eq!(d.non_departed_trains().len(), 2);
        assert!(!d.all_trains_finished());

        for nbr in d.train_numbers() {
            d.set_state_of_train(nbr, TrainState::Finished).unwrap();
        }
        assert!(d.all_trains_finished());
        assert!(d.non_departed_trains().is_empty());
    }

    #[test]
    fn test_car_queries() {
        let mut d = dispatcher();
        d.try_assemble_train(TrainNumber(101)).unwrap();
        assert_eq!(d.view_all_cars().len(), 3);
        assert_eq!(d.view_car(CarId(2)).unwrap().car_type(), CarType::DieselLocomotive);
        assert_eq!(
            d.view_train_by_vehicle_id(CarId(1)).unwrap().number(),
            TrainNumber(101)
        );
        assert!(d.view_train_by_vehicle_id(CarId(2)).is_err());
        assert!(matches!(
            d.car_location(CarId(77)),
            Err(SimulationError::NotFound(_))
        ));
        assert_eq!(d.station_names(), vec!["A", "B"]);
        assert_eq!(d.distance(TrainNumber(202)).unwrap(), 100.0);
        assert_eq!(d.origin(TrainNumber(202)).unwrap(), "A");
        assert_eq!(d.destination(TrainNumber(202)).unwrap(), "B");
    }
}
