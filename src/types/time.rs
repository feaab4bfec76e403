//! Wraparound clock values for the simulation
//!
//! A [`TimeOfDay`] is a minute of the day plus a day-rollover counter. The
//! pair is always normalized so that the minute of day lies in `0..1440`,
//! while the combined raw minute count may be negative or span several days.

use crate::simulation::{SimulationError, SimulationResult};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Hours in one simulated day
pub const HOURS_PER_DAY: i32 = 24;
/// Minutes in one hour
pub const MINUTES_PER_HOUR: i32 = 60;
/// Minutes in one simulated day
pub const MINUTES_PER_DAY: i32 = HOURS_PER_DAY * MINUTES_PER_HOUR;

const DELIMITER: char = ':';

/// A minute-resolution time of day with day rollover
///
/// Equality and ordering compare the raw minute count, so `00:10` on the
/// following day is later than `23:50` today.
///
/// # Examples
///
/// ```
/// use rail_network_simulator::types::TimeOfDay;
///
/// let mut t: TimeOfDay = "23:50".parse().unwrap();
/// t.add_minutes(20);
/// assert_eq!(t.to_string(), "00:10");
/// assert_eq!(t.raw_time(), 1450);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimeOfDay {
    minutes: i32,
    days: i32,
}

impl TimeOfDay {
    /// Midnight of day zero
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0, days: 0 };

    /// Create a time from a signed minute count relative to midnight of day zero
    pub fn from_minutes(minutes: i32) -> Self {
        Self {
            minutes: minutes.rem_euclid(MINUTES_PER_DAY),
            days: minutes.div_euclid(MINUTES_PER_DAY),
        }
    }

    /// Create a time from a fractional minute count, rounded to the nearest minute
    pub fn from_real_minutes(minutes: f64) -> Self {
        Self::from_minutes(minutes.round() as i32)
    }

    /// Create a time from an hour and minute of day zero
    pub fn from_hm(hour: i32, minute: i32) -> SimulationResult<Self> {
        if !(0..HOURS_PER_DAY).contains(&hour) || !(0..MINUTES_PER_HOUR).contains(&minute) {
            return Err(SimulationError::format_error(format!(
                "{:02}{}{:02}",
                hour, DELIMITER, minute
            )));
        }
        Ok(Self::from_minutes(hour * MINUTES_PER_HOUR + minute))
    }

    /// Parse a `hh:mm` string
    pub fn parse(s: &str) -> SimulationResult<Self> {
        let bad = || SimulationError::format_error(s.to_string());

        let (hours, minutes) = s.trim().split_once(DELIMITER).ok_or_else(bad)?;
        let hours: i32 = hours.trim().parse().map_err(|_| bad())?;
        let minutes: i32 = minutes.trim().parse().map_err(|_| bad())?;

        if !(0..HOURS_PER_DAY).contains(&hours) || !(0..MINUTES_PER_HOUR).contains(&minutes) {
            return Err(bad());
        }
        Ok(Self::from_minutes(hours * MINUTES_PER_HOUR + minutes))
    }

    /// Total minutes including day rollover; may be negative
    pub fn raw_time(&self) -> i32 {
        // Widened: near i32::MIN the day product alone leaves the i32 range
        let raw = i64::from(self.days) * i64::from(MINUTES_PER_DAY) + i64::from(self.minutes);
        raw as i32
    }

    /// Minutes since midnight of the current day; never negative
    pub fn in_minutes(&self) -> i32 {
        self.minutes
    }

    /// Fractional hours since midnight of the current day
    pub fn in_hours(&self) -> f64 {
        f64::from(self.hour()) + f64::from(self.minute()) / f64::from(MINUTES_PER_HOUR)
    }

    /// Number of whole days rolled over; negative before day zero
    pub fn day_rollover(&self) -> i32 {
        self.days
    }

    /// Hour of the current day
    pub fn hour(&self) -> i32 {
        self.minutes / MINUTES_PER_HOUR
    }

    /// Minute of the current hour
    pub fn minute(&self) -> i32 {
        self.minutes % MINUTES_PER_HOUR
    }

    /// Add a signed number of minutes in place, saturating at the `i32` range
    pub fn add_minutes(&mut self, minutes: i32) {
        *self = Self::from_minutes(self.raw_time().saturating_add(minutes));
    }

    /// Signed raw distance from `earlier` to `self`, keeping the day offset
    ///
    /// ```
    /// use rail_network_simulator::types::TimeOfDay;
    ///
    /// let mut arrival: TimeOfDay = "23:40".parse().unwrap();
    /// arrival.add_minutes(35);
    /// assert_eq!(arrival.offset_from("23:40".parse().unwrap()).raw_time(), 35);
    /// ```
    pub fn offset_from(&self, earlier: TimeOfDay) -> TimeOfDay {
        Self::from_minutes(self.raw_time().saturating_sub(earlier.raw_time()))
    }

    /// Render as `hh:mm`
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(self.hour() >= 0 && self.minute() >= 0);
        write!(f, "{:02}{}{:02}", self.hour(), DELIMITER, self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i32> for TimeOfDay {
    fn from(minutes: i32) -> Self {
        Self::from_minutes(minutes)
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw_time().cmp(&other.raw_time())
    }
}

impl Add for TimeOfDay {
    type Output = TimeOfDay;

    fn add(self, rhs: TimeOfDay) -> TimeOfDay {
        TimeOfDay::from_minutes(self.raw_time().saturating_add(rhs.raw_time()))
    }
}

impl AddAssign for TimeOfDay {
    fn add_assign(&mut self, rhs: TimeOfDay) {
        self.add_minutes(rhs.raw_time());
    }
}

/// Difference of the two times within a single day.
///
/// Both operands are wrapped into `0..1440` before subtracting, so any
/// multi-day offset between them is discarded.
impl Sub for TimeOfDay {
    type Output = TimeOfDay;

    fn sub(self, rhs: TimeOfDay) -> TimeOfDay {
        let lhs = self.raw_time().rem_euclid(MINUTES_PER_DAY);
        let rhs = rhs.raw_time().rem_euclid(MINUTES_PER_DAY);
        TimeOfDay::from_minutes(lhs - rhs)
    }
}

/// Raw difference; unlike `-` this keeps the day offset.
impl SubAssign for TimeOfDay {
    fn sub_assign(&mut self, rhs: TimeOfDay) {
        *self = self.offset_from(rhs);
    }
}

impl std::iter::Sum for TimeOfDay {
    fn sum<I: Iterator<Item = TimeOfDay>>(iter: I) -> Self {
        iter.fold(TimeOfDay::MIDNIGHT, |acc, t| acc + t)
    }
}

// Same-day values serialize as "hh:mm"; anything else as a raw minute count.
impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.days == 0 {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_i32(self.raw_time())
        }
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimeOfDayVisitor;

        impl Visitor<'_> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a \"hh:mm\" string or a minute count")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TimeOfDay, E> {
                TimeOfDay::parse(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TimeOfDay, E> {
                i32::try_from(v).map(TimeOfDay::from_minutes).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TimeOfDay, E> {
                i32::try_from(v).map(TimeOfDay::from_minutes).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TimeOfDayVisitor)
    }
}
