//! Simulation events and the cascade that drives a train through its day
//!
//! Each processed event mutates the dispatcher through an explicit
//! [`EventContext`] and hands back the events it wants scheduled next.

use crate::history::{CarLog, TrainLog, TrainRecord};
use crate::network::TrainDispatcher;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{EventType, LeadTimes, TimeOfDay, TrainNumber, TrainState};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// What an event does, and for which train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Schedules the first assembly attempt of every train
    Start,
    /// Tries to fill the train's empty slots from its origin
    Assembly(TrainNumber),
    /// Moves an assembled train to the platform
    Ready(TrainNumber),
    /// Sends the train on its way
    Departure(TrainNumber),
    /// Train reaches its destination
    Arrival(TrainNumber),
    /// Returns the train's cars to the destination pool
    Disassembly(TrainNumber),
}

/// A scheduled simulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Time at which the event fires
    pub time: TimeOfDay,
    /// Action and target train
    pub kind: EventKind,
}

/// Mutable state an event works on while it is processed
#[derive(Debug)]
pub struct EventContext<'a> {
    /// Owner of trains, stations and paths
    pub dispatcher: &'a mut TrainDispatcher,
    /// Train event history
    pub train_log: &'a mut TrainLog,
    /// Per-car arrival history
    pub car_log: &'a mut CarLog,
    /// Events earlier than this are processed but not logged
    pub start_time: TimeOfDay,
    /// Offsets between the stages of the cascade
    pub lead_times: LeadTimes,
}

impl<'a> EventContext<'a> {
    fn should_log(&self, time: TimeOfDay) -> bool {
        time >= self.start_time
    }

    fn log_train(
        &mut self,
        time: TimeOfDay,
        event: EventType,
        nbr: TrainNumber,
        description: String,
    ) -> SimulationResult<()> {
        let record = TrainRecord {
            time,
            event,
            origin: self.dispatcher.origin(nbr)?.to_string(),
            destination: self.dispatcher.destination(nbr)?.to_string(),
            train: self.dispatcher.view_train(nbr)?.snapshot(),
            description,
        };
        self.train_log.log(record);
        Ok(())
    }
}

impl Event {
    /// The Start event, always at midnight
    pub fn start() -> Self {
        Self::new(TimeOfDay::MIDNIGHT, EventKind::Start)
    }

    /// Create an event
    pub fn new(time: TimeOfDay, kind: EventKind) -> Self {
        Self { time, kind }
    }

    /// Event category
    pub fn event_type(&self) -> EventType {
        match self.kind {
            EventKind::Start => EventType::Start,
            EventKind::Assembly(_) => EventType::Assembly,
            EventKind::Ready(_) => EventType::Ready,
            EventKind::Departure(_) => EventType::Departure,
            EventKind::Arrival(_) => EventType::Arrival,
            EventKind::Disassembly(_) => EventType::Disassembly,
        }
    }

    /// High-priority events are kept even past the end of the simulation
    pub fn is_high_priority(&self) -> bool {
        self.event_type().is_high_priority()
    }

    /// Target train, `None` for the Start event
    pub fn train_number(&self) -> Option<TrainNumber> {
        match self.kind {
            EventKind::Start => None,
            EventKind::Assembly(nbr)
            | EventKind::Ready(nbr)
            | EventKind::Departure(nbr)
            | EventKind::Arrival(nbr)
            | EventKind::Disassembly(nbr) => Some(nbr),
        }
    }

    /// Apply the event and return its successors
    pub fn process(&self, ctx: &mut EventContext<'_>) -> SimulationResult<Vec<Event>> {
        debug!("Processing {} at {}", self, self.time);
        match self.kind {
            EventKind::Start => self.process_start(ctx),
            EventKind::Assembly(nbr) => self.process_assembly(ctx, nbr).map(|e| vec![e]),
            EventKind::Ready(nbr) => self.process_ready(ctx, nbr).map(|e| vec![e]),
            EventKind::Departure(nbr) => self.process_departure(ctx, nbr).map(|e| vec![e]),
            EventKind::Arrival(nbr) => self.process_arrival(ctx, nbr).map(|e| vec![e]),
            EventKind::Disassembly(nbr) => {
                self.process_disassembly(ctx, nbr)?;
                Ok(Vec::new())
            }
        }
    }

    fn process_start(&self, ctx: &mut EventContext<'_>) -> SimulationResult<Vec<Event>> {
        let lead = ctx.lead_times.assembly;
        ctx.dispatcher
            .train_numbers()
            .into_iter()
            .map(|nbr| {
                let mut time = ctx.dispatcher.scheduled_departure(nbr)?;
                time.add_minutes(-lead);
                // Early departures assemble as soon as the run starts
                Ok(Event::new(time.max(self.time), EventKind::Assembly(nbr)))
            })
            .collect()
    }

    fn process_assembly(&self, ctx: &mut EventContext<'_>, nbr: TrainNumber) -> SimulationResult<Event> {
        ctx.dispatcher.try_assemble_train(nbr)?;

        if ctx.dispatcher.train_is_assembled(nbr)? {
            ctx.dispatcher.set_state_of_train(nbr, TrainState::Assembled)?;
            let mut ready_at = ctx.dispatcher.estimated_departure(nbr)?;
            ready_at.add_minutes(-ctx.lead_times.ready);
            if ready_at < self.time {
                let late = self.time.offset_from(ready_at).raw_time();
                ctx.dispatcher.delay_departure(nbr, late)?;
                ready_at = self.time;
            }
            if ctx.should_log(self.time) {
                ctx.log_train(
                    self.time,
                    EventType::Assembly,
                    nbr,
                    format!("is now assembled, arriving at the platform at {}", ready_at),
                )?;
            }
            return Ok(Event::new(ready_at, EventKind::Ready(nbr)));
        }

        if ctx.dispatcher.view_train(nbr)?.state() != TrainState::Incomplete {
            ctx.dispatcher.set_state_of_train(nbr, TrainState::Incomplete)?;
        }
        let retry = ctx.lead_times.assembly_retry;
        let mut next_try = self.time;
        next_try.add_minutes(retry);
        ctx.dispatcher.delay_departure(nbr, retry)?;
        warn!(
            "Train {} is incomplete, missing {:?}, next try {}",
            nbr,
            ctx.dispatcher.view_train(nbr)?.missing_car_types(),
            next_try
        );
        if ctx.should_log(self.time) {
            ctx.log_train(
                self.time,
                EventType::Assembly,
                nbr,
                format!("is now incomplete, next try {}", next_try),
            )?;
        }
        Ok(Event::new(next_try, EventKind::Assembly(nbr)))
    }

    fn process_ready(&self, ctx: &mut EventContext<'_>, nbr: TrainNumber) -> SimulationResult<Event> {
        ctx.dispatcher.set_state_of_train(nbr, TrainState::Ready)?;
        let mut departs_at = self.time;
        departs_at.add_minutes(ctx.lead_times.departure);
        if ctx.should_log(self.time) {
            ctx.log_train(
                self.time,
                EventType::Ready,
                nbr,
                format!("is now at the platform, departing at {}", departs_at),
            )?;
        }
        Ok(Event::new(departs_at, EventKind::Departure(nbr)))
    }

    fn process_departure(&self, ctx: &mut EventContext<'_>, nbr: TrainNumber) -> SimulationResult<Event> {
        ctx.dispatcher.set_optimal_speed_of_train(nbr)?;
        ctx.dispatcher.set_departure_delay(nbr)?;
        ctx.dispatcher.set_state_of_train(nbr, TrainState::Running)?;
        if ctx.should_log(self.time) {
            let max_speed = ctx.dispatcher.max_speed(nbr)?;
            let current_speed = ctx.dispatcher.view_train(nbr)?.current_speed();
            ctx.log_train(
                self.time,
                EventType::Departure,
                nbr,
                format!(
                    "has left the platform, travelling at speed {:.0}({:.0})",
                    current_speed, max_speed
                ),
            )?;
        }
        let arrives_at = ctx.dispatcher.estimated_arrival(nbr)?;
        Ok(Event::new(arrives_at, EventKind::Arrival(nbr)))
    }

    fn process_arrival(&self, ctx: &mut EventContext<'_>, nbr: TrainNumber) -> SimulationResult<Event> {
        ctx.dispatcher.set_state_of_train(nbr, TrainState::Arrived)?;
        ctx.dispatcher.set_arrival_delay(nbr)?;
        let mut disassembles_at = self.time;
        disassembles_at.add_minutes(ctx.lead_times.disassembly);
        if ctx.should_log(self.time) {
            ctx.log_train(
                self.time,
                EventType::Arrival,
                nbr,
                format!("Has Arrived at the platform disassembly at {}", disassembles_at),
            )?;
            let destination = ctx.dispatcher.destination(nbr)?;
            let train = ctx.dispatcher.view_train(nbr)?;
            ctx.car_log.log_arrival(self.time, train, destination);
        }
        Ok(Event::new(disassembles_at, EventKind::Disassembly(nbr)))
    }

    fn process_disassembly(&self, ctx: &mut EventContext<'_>, nbr: TrainNumber) -> SimulationResult<()> {
        ctx.dispatcher.disassemble_train(nbr)?;
        if ctx.dispatcher.view_train(nbr)?.car_count() != 0 {
            return Err(SimulationError::invalid_operation(format!(
                "Train {} kept cars after disassembly",
                nbr
            )));
        }
        ctx.dispatcher.set_state_of_train(nbr, TrainState::Finished)?;
        if ctx.should_log(self.time) {
            ctx.log_train(
                self.time,
                EventType::Disassembly,
                nbr,
                "is now disassembled.".to_string(),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.train_number() {
            Some(nbr) => write!(f, "{} event for train {}", self.event_type(), nbr),
            None => write!(f, "{} event", self.event_type()),
        }
    }
}
