//! Time-ordered log of train events

use crate::rolling_stock::TrainSnapshot;
use crate::simulation::SimulationResult;
use crate::types::{EventType, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One logged train event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    /// Simulated time of the event
    pub time: TimeOfDay,
    /// Kind of event that produced the record
    pub event: EventType,
    /// Origin station of the train
    pub origin: String,
    /// Destination station of the train
    pub destination: String,
    /// Copy of the train right after the event was applied
    pub train: TrainSnapshot,
    /// Human-readable description
    pub description: String,
}

impl fmt::Display for TrainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Train [{}] ({}) from {} {} to {} {}",
            self.time,
            self.train.number,
            self.train.state,
            self.origin,
            self.train.departure,
            self.destination,
            self.description
        )
    }
}

/// Append-only train event history kept sorted by time
///
/// Records with equal times stay in the order they were logged. Each record
/// also carries its logging sequence number, so callers can ask for what was
/// logged after a [`checkpoint`](TrainLog::checkpoint) regardless of where
/// the records landed in time.
#[derive(Debug, Clone, Default)]
pub struct TrainLog {
    records: Vec<TrainRecord>,
    /// Logging sequence number of `records[i]`
    sequence: Vec<u64>,
    next_seq: u64,
}

impl TrainLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at its time position
    ///
    /// Returns the index the record was inserted at.
    pub fn log(&mut self, record: TrainRecord) -> usize {
        let index = self.records.partition_point(|r| r.time <= record.time);
        self.records.insert(index, record);
        self.sequence.insert(index, self.next_seq);
        self.next_seq += 1;
        index
    }

    /// Marker for [`logged_since`](TrainLog::logged_since)
    pub fn checkpoint(&self) -> u64 {
        self.next_seq
    }

    /// Records logged after `checkpoint` was taken, in time order
    pub fn logged_since(&self, checkpoint: u64) -> Vec<&TrainRecord> {
        self.records
            .iter()
            .zip(&self.sequence)
            .filter(|(_, &seq)| seq >= checkpoint)
            .map(|(record, _)| record)
            .collect()
    }

    /// Records with `from <= time <= to`
    pub fn view(&self, from: TimeOfDay, to: TimeOfDay) -> &[TrainRecord] {
        let start = self.records.partition_point(|r| r.time < from);
        let end = self.records.partition_point(|r| r.time <= to);
        if start >= end {
            return &[];
        }
        &self.records[start..end]
    }

    /// The latest record, if any
    pub fn view_last(&self) -> Option<&TrainRecord> {
        self.records.last()
    }

    /// Every record in time order
    pub fn records(&self) -> &[TrainRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
        self.sequence.clear();
        self.next_seq = 0;
    }

    /// Write every record as one JSON object per line
    pub fn write_jsonl<W: Write>(&self, writer: W) -> SimulationResult<()> {
        let mut writer = BufWriter::new(writer);
        for record in &self.records {
            let json_line = serde_json::to_string(record)?;
            writeln!(writer, "{}", json_line)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write every record to a JSONL file
    pub fn save_jsonl<P: AsRef<Path>>(&self, path: P) -> SimulationResult<()> {
        let path = path.as_ref();
        self.write_jsonl(File::create(path)?)?;
        info!("Wrote {} train records to {}", self.records.len(), path.display());
        Ok(())
    }
}
