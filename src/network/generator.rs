//! Synthetic network generation
//!
//! Builds a consistent [`Scenario`] from generator settings: every station is
//! connected to every other station, every station holds a mix of engines and
//! cars, and every train needs one engine plus one to four cars.

use super::{Connection, Path, Scenario, Station};
use crate::rolling_stock::Vehicle;
use crate::types::{CarType, SimulationConfig, TimeOfDay, MINUTES_PER_HOUR};
use rand::{prelude::*, rngs::StdRng, RngCore, SeedableRng};
use std::fmt;
use tracing::{debug, info};

const STATION_NAMES: [&str; 12] = [
    "Northgate", "Eastbrook", "Southmere", "Westfield", "Highcliff", "Lowmoor",
    "Riverside", "Kingsbridge", "Ashford", "Millbrook", "Stonehaven", "Fairhaven",
];

const TRACK_SPEEDS_KPH: [f64; 4] = [80.0, 120.0, 160.0, 200.0];

/// Share of each station's pool that is engines
const LOCOMOTIVE_SHARE: f64 = 0.25;

/// First train number handed out
const FIRST_TRAIN_NUMBER: u32 = 100;

/// Generator for random but internally consistent rail networks
pub struct NetworkGenerator {
    rng: Box<dyn RngCore>,
}

impl fmt::Debug for NetworkGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkGenerator").finish_non_exhaustive()
    }
}

impl Default for NetworkGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkGenerator {
    /// Create a new network generator
    pub fn new() -> Self {
        Self {
            rng: Box::new(thread_rng()),
        }
    }

    /// Create a new network generator with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Box::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create a generator seeded from the configuration, if it carries a seed
    pub fn from_config(config: &SimulationConfig) -> Self {
        config.seed.map_or_else(Self::new, Self::with_seed)
    }

    /// Generate a full scenario from the configuration's generator settings
    pub fn generate(&mut self, config: &SimulationConfig) -> Scenario {
        let names = self.generate_station_names(config.station_count);
        let paths = self.generate_paths(&names);

        let mut next_car_id = 1;
        let stations: Vec<Station> = names
            .iter()
            .map(|name| self.generate_station(name, config.cars_per_station, &mut next_car_id))
            .collect();

        // A timetable needs two distinct stations
        let connections = if names.len() < 2 {
            Vec::new()
        } else {
            (0..config.train_count)
                .map(|i| self.generate_connection(FIRST_TRAIN_NUMBER + i as u32, &names, &paths))
                .collect()
        };

        let scenario = Scenario::new(connections, stations, paths);
        info!(
            "Generated network: {} stations, {} trains, {} cars",
            scenario.stations.len(),
            scenario.connections.len(),
            scenario.car_count()
        );
        scenario
    }

    /// Station names, suffixed once the built-in list runs out
    fn generate_station_names(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let base = STATION_NAMES[i % STATION_NAMES.len()];
                match i / STATION_NAMES.len() {
                    0 => base.to_string(),
                    round => format!("{}{}", base, round + 1),
                }
            })
            .collect()
    }

    /// One path between every pair of stations
    fn generate_paths(&mut self, names: &[String]) -> Vec<Path> {
        let mut paths = Vec::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let distance = f64::from(self.rng.gen_range(20u32..=400));
                paths.push(Path::new(a.clone(), b.clone(), distance));
            }
        }
        paths
    }

    fn generate_station(&mut self, name: &str, car_count: usize, next_id: &mut u32) -> Station {
        let engines = ((car_count as f64 * LOCOMOTIVE_SHARE).ceil() as usize).min(car_count);
        let mut cars = Vec::with_capacity(car_count);
        for i in 0..car_count {
            let car_type = if i < engines {
                *[CarType::ElectricLocomotive, CarType::DieselLocomotive]
                    .choose(&mut self.rng)
                    .unwrap_or(&CarType::DieselLocomotive)
            } else {
                self.random_wagon_type()
            };
            cars.push(self.generate_vehicle(*next_id, car_type));
            *next_id += 1;
        }
        debug!("Station {} gets {} cars ({} engines)", name, car_count, engines);
        Station::with_cars(name, cars)
    }

    fn random_wagon_type(&mut self) -> CarType {
        CarType::ALL[self.rng.gen_range(0..4)]
    }

    fn generate_vehicle(&mut self, id: u32, car_type: CarType) -> Vehicle {
        match car_type {
            CarType::Coach => Vehicle::coach(id, self.rng.gen_range(40..=80), self.rng.gen_bool(0.5)),
            CarType::SleepingCar => Vehicle::sleeping_car(id, self.rng.gen_range(12..=30)),
            CarType::OpenFreightCar => Vehicle::open_freight_car(
                id,
                f64::from(self.rng.gen_range(20u32..=60)),
                f64::from(self.rng.gen_range(25u32..=45)),
            ),
            CarType::CoveredFreightCar => {
                Vehicle::covered_freight_car(id, f64::from(self.rng.gen_range(60u32..=120)))
            }
            CarType::ElectricLocomotive => Vehicle::electric_locomotive(
                id,
                f64::from(self.rng.gen_range(12u32..=22) * 10),
                f64::from(self.rng.gen_range(30u32..=60) * 100),
            ),
            CarType::DieselLocomotive => Vehicle::diesel_locomotive(
                id,
                f64::from(self.rng.gen_range(10u32..=16) * 10),
                f64::from(self.rng.gen_range(150u32..=400)),
            ),
        }
    }

    fn generate_connection(&mut self, number: u32, names: &[String], paths: &[Path]) -> Connection {
        let origin_idx = self.rng.gen_range(0..names.len());
        let mut dest_idx = self.rng.gen_range(0..names.len() - 1);
        if dest_idx >= origin_idx {
            dest_idx += 1;
        }
        let (origin, destination) = (&names[origin_idx], &names[dest_idx]);

        let distance = paths
            .iter()
            .find(|path| path.connects(origin, destination))
            .map_or(100.0, |path| path.distance_km);
        let track_speed = *TRACK_SPEEDS_KPH
            .choose(&mut self.rng)
            .unwrap_or(&TRACK_SPEEDS_KPH[0]);

        // Departures between 04:00 and 20:00 on five-minute marks
        let departure = TimeOfDay::from_minutes(self.rng.gen_range(48..=240) * 5);

        // Timetable assumes 80% of the track limit, rounded up to five minutes
        let planned_minutes = distance / (track_speed * 0.8) * f64::from(MINUTES_PER_HOUR);
        let planned_minutes = ((planned_minutes / 5.0).ceil() as i32).max(1) * 5;
        let mut arrival = departure;
        arrival.add_minutes(planned_minutes);

        let engine = if self.rng.gen_bool(0.5) {
            CarType::ElectricLocomotive
        } else {
            CarType::DieselLocomotive
        };
        let wagons = self.rng.gen_range(1..=4);
        let mut layout = Vec::with_capacity(wagons + 1);
        layout.push(engine);
        for _ in 0..wagons {
            layout.push(self.random_wagon_type());
        }

        Connection::new(
            number,
            origin.clone(),
            destination.clone(),
            departure,
            arrival,
            track_speed,
            layout,
        )
    }
}
