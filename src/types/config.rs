//! Configuration structures for the rail network simulator
//!
//! This module contains the simulation configuration, the command line
//! arguments that override it, and the validation rules applied before a run.

use super::{RunMode, TimeOfDay};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defaults for the synthetic network generator
pub mod generator_defaults {
    /// Number of stations in a generated network
    pub const STATION_COUNT: usize = 4;

    /// Number of trains in a generated timetable
    pub const TRAIN_COUNT: usize = 12;

    /// Cars placed at every generated station
    pub const CARS_PER_STATION: usize = 16;
}

/// Fixed offsets between the stages of a train's daily cycle, in minutes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadTimes {
    /// Minutes before scheduled departure that assembly begins
    pub assembly: i32,
    /// Minutes before estimated departure that an assembled train reaches the platform
    pub ready: i32,
    /// Minutes between two assembly attempts; also the delay added per failed attempt
    pub assembly_retry: i32,
    /// Minutes a ready train waits at the platform before departing
    pub departure: i32,
    /// Minutes after arrival that disassembly happens
    pub disassembly: i32,
}

impl Default for LeadTimes {
    fn default() -> Self {
        Self {
            assembly: 30,
            ready: 10,
            assembly_retry: 10,
            departure: 10,
            disassembly: 20,
        }
    }
}

impl LeadTimes {
    fn fields(&self) -> [(&'static str, i32); 5] {
        [
            ("assembly", self.assembly),
            ("ready", self.ready),
            ("assembly_retry", self.assembly_retry),
            ("departure", self.departure),
            ("disassembly", self.disassembly),
        ]
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "rail-network-simulator",
    version,
    about = "Rail Network Simulator - Simulates a day of train assembly, travel and disassembly",
    long_about = "Runs a discrete-event simulation of a rail network: trains are assembled from cars pooled at stations, depart, travel, arrive and are disassembled at their destination.

EXAMPLES:
    # Run a generated network with default settings
    rail-network-simulator

    # Run a scenario file
    rail-network-simulator --scenario network.json

    # Step through a window of the day one interval at a time
    rail-network-simulator --start-time 06:00 --end-time 12:00 --interval 30 --mode interval

    # Generate configuration template
    rail-network-simulator --print-config > my-config.json

    # Validate configuration without running
    rail-network-simulator --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)

    Without --scenario a network is generated from the seed and generator settings."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Scenario file with connections, stations and paths
    #[arg(
        short,
        long,
        help = "Scenario file path (JSON format)",
        long_help = "Path to a JSON scenario holding connections, stations with their cars, and paths. When omitted a network is generated."
    )]
    pub scenario: Option<String>,

    /// Simulation window start
    #[arg(long, help = "Simulation start time (hh:mm)")]
    pub start_time: Option<TimeOfDay>,

    /// Simulation window end
    #[arg(long, help = "Simulation end time (hh:mm)")]
    pub end_time: Option<TimeOfDay>,

    /// Interval length for interval mode
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Interval length in minutes",
        long_help = "Length of one interval in minutes, used by --mode interval. Must not be negative. Default: 10"
    )]
    pub interval: Option<i32>,

    /// Number of stations to generate
    #[arg(long, help = "Number of stations in a generated network")]
    pub station_count: Option<usize>,

    /// Number of trains to generate
    #[arg(long, help = "Number of trains in a generated network")]
    pub train_count: Option<usize>,

    /// Cars per generated station
    #[arg(long, help = "Number of cars placed at each generated station")]
    pub cars_per_station: Option<usize>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible network generation")]
    pub seed: Option<u64>,

    /// Output path for the statistics report
    #[arg(long, help = "Write the statistics report as JSON to this path")]
    pub report_output: Option<String>,

    /// Output path for the train event log
    #[arg(long, help = "Write the train event log as JSONL to this path")]
    pub train_log_output: Option<String>,

    /// How to drive the simulation
    #[arg(
        short,
        long,
        help = "Run mode (complete, interval or step)",
        long_help = "How the simulation is driven: complete runs every event, interval advances one interval at a time, step processes one event at a time. Default: complete"
    )]
    pub mode: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Simulation window start
    pub start_time: Option<TimeOfDay>,

    /// Simulation window end
    pub end_time: Option<TimeOfDay>,

    /// Interval length in minutes
    pub interval: Option<i32>,

    /// Stage offsets
    pub lead_times: Option<LeadTimes>,

    /// Scenario file path
    pub scenario: Option<String>,

    /// Number of stations to generate
    pub station_count: Option<usize>,

    /// Number of trains to generate
    pub train_count: Option<usize>,

    /// Cars per generated station
    pub cars_per_station: Option<usize>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Output path for the statistics report
    pub report_output: Option<String>,

    /// Output path for the train event log
    pub train_log_output: Option<String>,

    /// Run mode
    pub mode: Option<String>,
}

/// Configuration for a rail network simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation window start
    pub start_time: TimeOfDay,

    /// Simulation window end
    pub end_time: TimeOfDay,

    /// Interval length in minutes
    pub interval: i32,

    /// Stage offsets
    pub lead_times: LeadTimes,

    /// Scenario file path; a network is generated when absent
    pub scenario: Option<String>,

    /// Number of stations to generate
    pub station_count: usize,

    /// Number of trains to generate
    pub train_count: usize,

    /// Cars per generated station
    pub cars_per_station: usize,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Output path for the statistics report
    pub report_output: Option<String>,

    /// Output path for the train event log
    pub train_log_output: Option<String>,

    /// Run mode
    pub mode: String,
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Start time is later than end time
    #[error("Start time {start} must not be later than end time {end}")]
    InvalidTimeWindow {
        /// Configured start
        start: TimeOfDay,
        /// Configured end
        end: TimeOfDay,
    },

    /// Interval is negative
    #[error("Interval must not be negative, got {0}")]
    InvalidInterval(i32),

    /// A lead time is negative
    #[error("Lead time {field} must not be negative, got {value}")]
    InvalidLeadTime {
        /// Name of the offending lead time
        field: String,
        /// The invalid value
        value: i32,
    },

    /// Generated network needs at least two stations
    #[error("Station count must be at least 2, got {0}")]
    InvalidStationCount(usize),

    /// Generated network needs at least one train
    #[error("Train count must be greater than 0, got {0}")]
    InvalidTrainCount(usize),

    /// Generated stations need cars
    #[error("Cars per station must be greater than 0, got {0}")]
    InvalidCarsPerStation(usize),

    /// Run mode is not recognised
    #[error("Unknown run mode: {0} (supported: complete, interval, step)")]
    InvalidMode(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_time: TimeOfDay::MIDNIGHT,
            end_time: TimeOfDay::from_minutes(super::MINUTES_PER_DAY - 1),
            interval: 10,
            lead_times: LeadTimes::default(),
            scenario: None,
            station_count: generator_defaults::STATION_COUNT,
            train_count: generator_defaults::TRAIN_COUNT,
            cars_per_station: generator_defaults::CARS_PER_STATION,
            seed: None,
            report_output: None,
            train_log_output: None,
            mode: RunMode::Complete.to_string(),
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            start_time: config_file.start_time.unwrap_or(defaults.start_time),
            end_time: config_file.end_time.unwrap_or(defaults.end_time),
            interval: config_file.interval.unwrap_or(defaults.interval),
            lead_times: config_file.lead_times.unwrap_or(defaults.lead_times),
            scenario: config_file.scenario.or(defaults.scenario),
            station_count: config_file.station_count.unwrap_or(defaults.station_count),
            train_count: config_file.train_count.unwrap_or(defaults.train_count),
            cars_per_station: config_file
                .cars_per_station
                .unwrap_or(defaults.cars_per_station),
            seed: config_file.seed.or(defaults.seed),
            report_output: config_file.report_output.or(defaults.report_output),
            train_log_output: config_file.train_log_output.or(defaults.train_log_output),
            mode: config_file.mode.unwrap_or(defaults.mode),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.start_time {
            config.start_time = value;
        }
        if let Some(value) = args.end_time {
            config.end_time = value;
        }
        if let Some(value) = args.interval {
            config.interval = value;
        }
        if let Some(value) = args.scenario {
            config.scenario = Some(value);
        }
        if let Some(value) = args.station_count {
            config.station_count = value;
        }
        if let Some(value) = args.train_count {
            config.train_count = value;
        }
        if let Some(value) = args.cars_per_station {
            config.cars_per_station = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.report_output {
            config.report_output = Some(value);
        }
        if let Some(value) = args.train_log_output {
            config.train_log_output = Some(value);
        }
        if let Some(value) = args.mode {
            config.mode = value;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.start_time > self.end_time {
            return Err(ConfigValidationError::InvalidTimeWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }

        if self.interval < 0 {
            return Err(ConfigValidationError::InvalidInterval(self.interval));
        }

        for (field, value) in self.lead_times.fields() {
            if value < 0 {
                return Err(ConfigValidationError::InvalidLeadTime {
                    field: field.to_string(),
                    value,
                });
            }
        }

        // Generator settings only matter when no scenario is given
        if self.scenario.is_none() {
            if self.station_count < 2 {
                return Err(ConfigValidationError::InvalidStationCount(self.station_count));
            }
            if self.train_count == 0 {
                return Err(ConfigValidationError::InvalidTrainCount(self.train_count));
            }
            if self.cars_per_station == 0 {
                return Err(ConfigValidationError::InvalidCarsPerStation(
                    self.cars_per_station,
                ));
            }
        }

        self.get_run_mode()
            .map_err(|_| ConfigValidationError::InvalidMode(self.mode.clone()))?;

        Ok(())
    }

    /// Get the run mode as an enum value
    pub fn get_run_mode(&self) -> Result<RunMode, String> {
        self.mode.parse()
    }

    /// Whether a network should be generated instead of loaded
    pub fn uses_generated_network(&self) -> bool {
        self.scenario.is_none()
    }
}
