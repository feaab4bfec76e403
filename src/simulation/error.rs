//! Error types and handling
//!
//! This module contains the error type shared by the clock, the dispatcher,
//! the event cascade and the simulator.

use thiserror::Error;

/// Errors that can occur while building or running a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A time string was not in `hh:mm` form or held out-of-range fields
    #[error("Bad time format: {0}")]
    FormatError(String),

    /// A train, station, car, connection or path lookup failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operation was rejected by the current state of the domain
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A time bound or interval was ordered incorrectly
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a format error
    pub fn format_error(msg: impl Into<String>) -> Self {
        Self::FormatError(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid-operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Create an out-of-range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Domain failures leave the simulation in a consistent state, so the
    /// caller may inspect them and carry on. A bad configuration cannot be
    /// recovered from without new input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::FormatError(_) => true,
            SimulationError::NotFound(_) => true,
            SimulationError::InvalidOperation(_) => true,
            SimulationError::OutOfRange(_) => true,
            SimulationError::ConfigurationError(_) => false,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::FormatError(_) => "Format",
            SimulationError::NotFound(_) => "Not Found",
            SimulationError::InvalidOperation(_) => "Invalid Operation",
            SimulationError::OutOfRange(_) => "Out Of Range",
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let format_error = SimulationError::format_error("25:00");
        assert!(matches!(format_error, SimulationError::FormatError(_)));
        assert_eq!(format_error.to_string(), "Bad time format: 25:00");

        let missing = SimulationError::not_found("Train does not exist: 7");
        assert!(matches!(missing, SimulationError::NotFound(_)));
        assert_eq!(missing.to_string(), "Not found: Train does not exist: 7");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let sim_error: SimulationError = io_error.into();
        assert!(matches!(sim_error, SimulationError::IoError(_)));
    }

    #[test]
    fn test_error_from_serde_error() {
        let parse_error = serde_json::from_str::<u32>("not a number").unwrap_err();
        let sim_error: SimulationError = parse_error.into();
        assert_eq!(sim_error.category(), "Serialization");
    }

    #[test]
    fn test_error_recoverability() {
        assert!(!SimulationError::configuration_error("bad").is_recoverable());
        assert!(SimulationError::not_found("station X").is_recoverable());
        assert!(SimulationError::invalid_operation("full slot").is_recoverable());
        assert!(SimulationError::out_of_range("start after end").is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(SimulationError::format_error("x").category(), "Format");
        assert_eq!(SimulationError::not_found("x").category(), "Not Found");
        assert_eq!(SimulationError::invalid_operation("x").category(), "Invalid Operation");
        assert_eq!(SimulationError::out_of_range("x").category(), "Out Of Range");
        assert_eq!(SimulationError::configuration_error("x").category(), "Configuration");
    }

    #[test]
    fn test_simulation_result_type() {
        let success: SimulationResult<i32> = Ok(42);
        assert!(success.is_ok());

        let failure: SimulationResult<i32> = Err(SimulationError::out_of_range("Test"));
        assert!(failure.is_err());
    }
}
