//! Discrete-event simulator
//!
//! Keeps the event queue and the logical clock, and owns the network and the
//! logs the events act on.

use crate::history::{CarLog, TrainLog};
use crate::network::TrainDispatcher;
use crate::simulation::event::{Event, EventContext};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{LeadTimes, TimeOfDay, MINUTES_PER_DAY};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, info, instrument, trace, warn};

/// Default first minute of the logged window
pub const DEFAULT_START_TIME: TimeOfDay = TimeOfDay::MIDNIGHT;

/// Default step length of interval runs, in minutes
pub const DEFAULT_INTERVAL: i32 = 10;

/// Default end of the simulated day
pub fn default_end_time() -> TimeOfDay {
    TimeOfDay::from_minutes(MINUTES_PER_DAY - 1)
}

/// Queue entry; the sequence number keeps equal times in scheduling order
#[derive(Debug)]
struct ScheduledEvent {
    seq: u64,
    event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    // Reversed so the BinaryHeap pops the earliest event first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .time
            .cmp(&self.event.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Event-driven simulator for one day of rail traffic
#[derive(Debug)]
pub struct Simulator {
    dispatcher: TrainDispatcher,
    train_log: TrainLog,
    car_log: CarLog,
    lead_times: LeadTimes,
    queue: BinaryHeap<ScheduledEvent>,
    next_seq: u64,
    high_priority_events: usize,
    start: TimeOfDay,
    end: TimeOfDay,
    interval: i32,
    clock: TimeOfDay,
    processed_events: usize,
}

impl Simulator {
    /// Create a simulator over `dispatcher` with default bounds and lead times
    pub fn new(dispatcher: TrainDispatcher) -> Self {
        Self {
            dispatcher,
            train_log: TrainLog::new(),
            car_log: CarLog::new(),
            lead_times: LeadTimes::default(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            high_priority_events: 0,
            start: DEFAULT_START_TIME,
            end: default_end_time(),
            interval: DEFAULT_INTERVAL,
            clock: DEFAULT_START_TIME,
            processed_events: 0,
        }
    }

    /// Replace the lead times used by the event cascade
    pub fn with_lead_times(mut self, lead_times: LeadTimes) -> Self {
        self.lead_times = lead_times;
        self
    }

    // ----- accessors -----

    /// Start of the logged window
    pub fn start_time(&self) -> TimeOfDay {
        self.start
    }

    /// End of the simulated day
    pub fn end_time(&self) -> TimeOfDay {
        self.end
    }

    /// Step length of interval runs, in minutes
    pub fn interval(&self) -> i32 {
        self.interval
    }

    /// Logical clock
    pub fn current_time(&self) -> TimeOfDay {
        self.clock
    }

    /// Where the next interval run will stop
    pub fn next_stop_time(&self) -> TimeOfDay {
        self.clock + TimeOfDay::from_minutes(self.interval)
    }

    /// Lead times used by the event cascade
    pub fn lead_times(&self) -> LeadTimes {
        self.lead_times
    }

    /// Number of queued events
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Number of scheduled high-priority events not yet processed
    pub fn high_priority_events(&self) -> usize {
        self.high_priority_events
    }

    /// Number of events processed since construction
    pub fn processed_events(&self) -> usize {
        self.processed_events
    }

    /// Time of the next queued event
    pub fn peek_next_time(&self) -> Option<TimeOfDay> {
        self.queue.peek().map(|s| s.event.time)
    }

    /// The network being simulated
    pub fn dispatcher(&self) -> &TrainDispatcher {
        &self.dispatcher
    }

    /// Train event history
    pub fn train_log(&self) -> &TrainLog {
        &self.train_log
    }

    /// Per-car arrival history
    pub fn car_log(&self) -> &CarLog {
        &self.car_log
    }

    // ----- bounds -----

    /// Move the start of the logged window
    pub fn set_start_time(&mut self, start: TimeOfDay) -> SimulationResult<()> {
        if start > self.end {
            return Err(SimulationError::out_of_range(format!(
                "Start time {} later than end time {}",
                start, self.end
            )));
        }
        self.start = start;
        Ok(())
    }

    /// Move the end of the simulated day
    pub fn set_end_time(&mut self, end: TimeOfDay) -> SimulationResult<()> {
        if end < self.start {
            return Err(SimulationError::out_of_range(format!(
                "End time {} earlier than start time {}",
                end, self.start
            )));
        }
        self.end = end;
        Ok(())
    }

    /// Change the interval step
    pub fn set_interval(&mut self, minutes: i32) -> SimulationResult<()> {
        if minutes < 0 {
            return Err(SimulationError::out_of_range(format!(
                "Interval must not be negative, got {}",
                minutes
            )));
        }
        self.interval = minutes;
        Ok(())
    }

    // ----- running -----

    /// Queue an event
    ///
    /// Ordinary events at or after the end time are dropped; high-priority
    /// events are always queued. Returns whether the event was queued.
    pub fn schedule_event(&mut self, event: Event) -> bool {
        let high_priority = event.is_high_priority();
        if high_priority {
            self.high_priority_events += 1;
        }
        if event.time >= self.end && !high_priority {
            warn!("Dropping {} at {}: past end time {}", event, event.time, self.end);
            return false;
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        trace!(seq, "Scheduled {} at {}", event, event.time);
        self.queue.push(ScheduledEvent { seq, event });
        true
    }

    /// Schedule the Start event and process it
    #[instrument(skip(self))]
    pub fn start(&mut self) -> SimulationResult<()> {
        info!(
            "Starting simulation of {} trains, window {} - {}",
            self.dispatcher.trains().len(),
            self.start,
            self.end
        );
        self.schedule_event(Event::start());
        self.run_next_event()?;
        Ok(())
    }

    /// Process the earliest queued event
    ///
    /// Returns `false` when the queue is empty.
    pub fn run_next_event(&mut self) -> SimulationResult<bool> {
        let Some(scheduled) = self.queue.pop() else {
            return Ok(false);
        };
        let event = scheduled.event;
        self.clock = event.time;
        if event.is_high_priority() {
            self.high_priority_events = self.high_priority_events.saturating_sub(1);
        }

        let mut ctx = EventContext {
            dispatcher: &mut self.dispatcher,
            train_log: &mut self.train_log,
            car_log: &mut self.car_log,
            start_time: self.start,
            lead_times: self.lead_times,
        };
        let successors = event.process(&mut ctx)?;
        self.processed_events += 1;
        debug!(
            clock = %self.clock,
            successors = successors.len(),
            remaining = self.queue.len(),
            "Processed {}",
            event
        );

        for next in successors {
            self.schedule_event(next);
        }
        Ok(true)
    }

    /// Process every event before `clock + interval`, then move the clock there
    #[instrument(skip(self), fields(from = %self.clock, interval = self.interval))]
    pub fn run_next_interval(&mut self) -> SimulationResult<()> {
        let stop = self.next_stop_time();
        self.run_until(stop)
    }

    /// Process every event before `stop`, then move the clock there
    pub fn run_until(&mut self, stop: TimeOfDay) -> SimulationResult<()> {
        while self.peek_next_time().is_some_and(|time| time < stop) {
            self.run_next_event()?;
        }
        self.clock = stop;
        Ok(())
    }

    /// Process events until the simulation is finished or the queue drains
    ///
    /// Returns the number of events processed.
    #[instrument(skip(self), fields(from = %self.clock))]
    pub fn run_to_completion(&mut self) -> SimulationResult<usize> {
        let mut processed = 0;
        while !self.is_finished() {
            if !self.run_next_event()? {
                break;
            }
            processed += 1;
        }
        if self.clock < self.end {
            self.clock = self.end;
        }
        info!(
            "Simulation complete at {} after {} events, {} still queued",
            self.clock,
            processed,
            self.queue.len()
        );
        Ok(processed)
    }

    /// Every train finished, or time is up with no high-priority work pending
    pub fn is_finished(&self) -> bool {
        self.dispatcher.all_trains_finished()
            || (self.clock >= self.end && self.high_priority_events == 0)
    }

    /// Drop every queued event and rewind the clock to the start time
    ///
    /// The network and logs are left untouched.
    pub fn reset(&mut self) {
        debug!("Resetting simulator, dropping {} queued events", self.queue.len());
        self.queue.clear();
        self.high_priority_events = 0;
        self.clock = self.start;
    }

    /// Swap in a fresh network, clear the logs and reset the queue
    pub fn reload(&mut self, dispatcher: TrainDispatcher) {
        self.dispatcher = dispatcher;
        self.train_log.clear();
        self.car_log.clear();
        self.processed_events = 0;
        self.reset();
    }
}
