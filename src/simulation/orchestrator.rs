//! Main simulation orchestrator
//!
//! Ties a [`SimulationConfig`] to a network [`Scenario`] and the
//! [`Simulator`] running it.

use crate::history::TrainRecord;
use crate::network::{NetworkGenerator, Scenario};
use crate::simulation::{
    SimulationError, SimulationResult, SimulationStatistics, Simulator,
};
use crate::types::{SimulationConfig, TimeOfDay};
use crate::{perf_span, sim_event};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Drives one simulated day from configuration to statistics
#[derive(Debug)]
pub struct SimulationOrchestrator {
    config: SimulationConfig,
    scenario: Scenario,
    simulator: Simulator,
    started: bool,
    elapsed: Duration,
}

impl SimulationOrchestrator {
    /// Load or generate the network described by `config`
    #[instrument(skip(config), fields(scenario = ?config.scenario, seed = ?config.seed))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        let scenario = match &config.scenario {
            Some(path) => Scenario::from_file(path)?,
            None => {
                info!(
                    "Generating network with {} stations and {} trains",
                    config.station_count, config.train_count
                );
                NetworkGenerator::from_config(&config).generate(&config)
            }
        };
        Self::with_scenario(config, scenario)
    }

    /// Use an already loaded scenario
    pub fn with_scenario(config: SimulationConfig, scenario: Scenario) -> SimulationResult<Self> {
        let simulator = Self::build_simulator(&config, &scenario)?;
        info!(
            "Orchestrator ready: {} stations, {} trains, {} cars",
            scenario.stations.len(),
            scenario.connections.len(),
            scenario.car_count()
        );
        Ok(Self {
            config,
            scenario,
            simulator,
            started: false,
            elapsed: Duration::ZERO,
        })
    }

    fn build_simulator(config: &SimulationConfig, scenario: &Scenario) -> SimulationResult<Simulator> {
        let mut simulator = Simulator::new(scenario.to_dispatcher()?).with_lead_times(config.lead_times);
        // End first: the default start of midnight never exceeds it
        simulator.set_end_time(config.end_time)?;
        simulator.set_start_time(config.start_time)?;
        simulator.set_interval(config.interval)?;
        Ok(simulator)
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Network as it was before the run
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The running simulator
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Check whether the Start event has been processed
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Check whether the simulation is over
    pub fn is_finished(&self) -> bool {
        self.started && self.simulator.is_finished()
    }

    /// Simulator clock
    pub fn current_time(&self) -> TimeOfDay {
        self.simulator.current_time()
    }

    /// Process the Start event, scheduling every train's first assembly
    #[instrument(skip(self))]
    pub fn start(&mut self) -> SimulationResult<()> {
        if self.started {
            return Err(SimulationError::invalid_operation(
                "Simulation has already been started",
            ));
        }
        self.timed(Simulator::start)?;
        self.started = true;
        sim_event!(
            info,
            format!(
                "Simulation started, window {} - {}",
                self.simulator.start_time(),
                self.simulator.end_time()
            ),
            trains = self.scenario.connections.len(),
            pending = self.simulator.pending_events(),
        );
        Ok(())
    }

    fn ensure_started(&mut self) -> SimulationResult<()> {
        if !self.started {
            self.start()?;
        }
        Ok(())
    }

    fn timed<T>(
        &mut self,
        run: impl FnOnce(&mut Simulator) -> SimulationResult<T>,
    ) -> SimulationResult<T> {
        let began = Instant::now();
        let result = run(&mut self.simulator);
        self.elapsed += began.elapsed();
        result
    }

    fn records_since(&self, checkpoint: u64) -> Vec<TrainRecord> {
        self.simulator
            .train_log()
            .logged_since(checkpoint)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Process a single event
    ///
    /// Returns the record it logged, if any.
    pub fn run_next_event(&mut self) -> SimulationResult<Option<TrainRecord>> {
        self.ensure_started()?;
        let checkpoint = self.simulator.train_log().checkpoint();
        self.timed(Simulator::run_next_event)?;
        Ok(self.records_since(checkpoint).pop())
    }

    /// Advance the clock by one interval
    ///
    /// Returns the records logged in the window.
    pub fn run_next_interval(&mut self) -> SimulationResult<Vec<TrainRecord>> {
        self.ensure_started()?;
        let checkpoint = self.simulator.train_log().checkpoint();
        let from = self.simulator.current_time();
        self.timed(Simulator::run_next_interval)?;
        let records = self.records_since(checkpoint);
        debug!(
            "Interval {} - {} logged {} records",
            from,
            self.simulator.current_time(),
            records.len()
        );
        Ok(records)
    }

    /// Run until the simulation is finished
    ///
    /// Returns the records logged on the way.
    pub fn run_to_completion(&mut self) -> SimulationResult<Vec<TrainRecord>> {
        self.ensure_started()?;
        let _span = perf_span!(
            "run_to_completion",
            pending = self.simulator.pending_events()
        )
        .entered();
        let checkpoint = self.simulator.train_log().checkpoint();
        let processed = self.timed(Simulator::run_to_completion)?;
        sim_event!(
            info,
            format!("Simulation finished at {}", self.simulator.current_time()),
            events = processed,
            elapsed_ms = self.elapsed.as_millis() as u64,
        );
        Ok(self.records_since(checkpoint))
    }

    /// Rebuild the network from the scenario and clear all history
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> SimulationResult<()> {
        let dispatcher = self.scenario.to_dispatcher()?;
        self.simulator.reload(dispatcher);
        self.started = false;
        self.elapsed = Duration::ZERO;
        info!("Simulation reset to {}", self.simulator.current_time());
        Ok(())
    }

    /// Statistics of the run so far
    pub fn statistics(&self) -> SimulationResult<SimulationStatistics> {
        let mut statistics = SimulationStatistics::collect(&self.scenario.stations, &self.simulator)?;
        statistics.set_simulation_duration(self.elapsed);
        Ok(statistics)
    }

    /// Write the report and train log to the paths named in the configuration
    pub fn write_outputs(&self) -> SimulationResult<()> {
        if let Some(path) = &self.config.report_output {
            self.statistics()?.save_to_file(path)?;
        }
        if let Some(path) = &self.config.train_log_output {
            self.simulator.train_log().save_jsonl(path)?;
        }
        Ok(())
    }
}
