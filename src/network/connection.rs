//! Timetable entries

use crate::types::{CarType, TimeOfDay, TrainNumber, MINUTES_PER_DAY};
use serde::{Deserialize, Serialize};

/// The fixed timetable entry for one train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Train number, unique in the timetable
    pub train_number: TrainNumber,
    /// Departure station
    pub origin: String,
    /// Arrival station
    pub destination: String,
    /// Scheduled departure
    pub departure: TimeOfDay,
    /// Scheduled arrival
    pub arrival: TimeOfDay,
    /// Track speed limit in km/h
    pub max_speed_kph: f64,
    /// Required car types in consist order
    pub layout: Vec<CarType>,
}

impl Connection {
    /// Create a timetable entry
    pub fn new(
        train_number: impl Into<TrainNumber>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure: TimeOfDay,
        arrival: TimeOfDay,
        max_speed_kph: f64,
        layout: Vec<CarType>,
    ) -> Self {
        Self {
            train_number: train_number.into(),
            origin: origin.into(),
            destination: destination.into(),
            departure,
            arrival,
            max_speed_kph,
            layout,
        }
    }

    /// Check whether the layout includes an engine
    pub fn has_locomotive(&self) -> bool {
        self.layout.iter().any(|car_type| car_type.is_locomotive())
    }

    /// Scheduled minutes from departure to arrival
    ///
    /// An arrival earlier in the day than the departure is on the next day.
    pub fn scheduled_duration(&self) -> i32 {
        (self.arrival.in_minutes() - self.departure.in_minutes()).rem_euclid(MINUTES_PER_DAY)
    }

    /// Scheduled arrival counted from the departure's day
    pub fn timeline_arrival(&self) -> TimeOfDay {
        let mut arrival = self.departure;
        arrival.add_minutes(self.scheduled_duration());
        arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_serialization() {
        let json = r#"{
            "train_number": 101,
            "origin": "A",
            "destination": "B",
            "departure": "08:00",
            "arrival": "09:00",
            "max_speed_kph": 100.0,
            "layout": ["ElectricLocomotive", "Coach"]
        }"#;
        let connection: Connection = serde_json::from_str(json).unwrap();
        assert_eq!(connection.train_number, TrainNumber(101));
        assert_eq!(connection.departure.to_string(), "08:00");
        assert_eq!(connection.layout.len(), 2);
        assert!(connection.has_locomotive());
    }

    #[test]
    fn test_has_locomotive() {
        let connection = Connection::new(
            7,
            "A",
            "B",
            TimeOfDay::from_minutes(60),
            TimeOfDay::from_minutes(120),
            80.0,
            vec![CarType::Coach],
        );
        assert!(!connection.has_locomotive());
    }

    #[test]
    fn test_overnight_arrival_is_on_next_day() {
        let overnight = Connection::new(
            9,
            "A",
            "B",
            "23:30".parse().unwrap(),
            "00:30".parse().unwrap(),
            120.0,
            vec![CarType::DieselLocomotive],
        );
        assert_eq!(overnight.scheduled_duration(), 60);
        assert_eq!(overnight.timeline_arrival().raw_time(), 1470);
        assert_eq!(overnight.timeline_arrival().to_string(), "00:30");

        let same_day = Connection::new(
            10,
            "A",
            "B",
            "08:00".parse().unwrap(),
            "09:15".parse().unwrap(),
            120.0,
            vec![CarType::DieselLocomotive],
        );
        assert_eq!(same_day.scheduled_duration(), 75);
        assert_eq!(same_day.timeline_arrival(), same_day.arrival);
    }
}
