// Rail Network Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/rail-network-simulator --seed 42
// ```
//
// Or with a scenario file and a narrower window:
//
// ```console
// $ ./target/release/rail-network-simulator --scenario network.json --start-time 06:00 --end-time 18:00 --mode interval --interval 30
// ```

use anyhow::{bail, Context};
use clap::Parser;
use rail_network_simulator::history::TrainRecord;
use rail_network_simulator::simulation::{LoggingConfig, SimulationOrchestrator};
use rail_network_simulator::types::config::CliArgs;
use rail_network_simulator::types::{RunMode, SimulationConfig};
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let logging = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };
    let _logging_guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    info!("Starting Rail Network Simulator");
    let dry_run = args.dry_run;

    let config = SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    let mode = config
        .get_run_mode()
        .map_err(anyhow::Error::msg)
        .context("Invalid run mode")?;
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config, mode);
        return Ok(());
    }

    print_startup_banner(&config, mode);

    let mut orchestrator =
        SimulationOrchestrator::new(config.clone()).context("Failed to initialize simulation")?;
    eprintln!(
        "Network: {} stations, {} trains, {} cars\n",
        orchestrator.scenario().stations.len(),
        orchestrator.scenario().connections.len(),
        orchestrator.scenario().car_count()
    );

    orchestrator.start().context("Failed to start simulation")?;
    println!("{}: STARTING SIMULATION", orchestrator.simulator().start_time());

    match mode {
        RunMode::Complete => {
            print_records(&orchestrator.run_to_completion()?);
        }
        RunMode::Interval => {
            if config.interval == 0 {
                bail!("Interval mode needs an interval of at least one minute");
            }
            while !orchestrator.is_finished() {
                print_records(&orchestrator.run_next_interval()?);
                println!("-- Time is now {}", orchestrator.current_time());
            }
        }
        RunMode::Step => {
            while !orchestrator.is_finished() && orchestrator.simulator().pending_events() > 0 {
                if let Some(record) = orchestrator.run_next_event()? {
                    println!("{}", record);
                }
            }
            orchestrator.run_to_completion()?;
        }
    }
    println!("{}: ENDING SIMULATION", orchestrator.current_time());

    let statistics = orchestrator.statistics()?;
    eprintln!();
    eprintln!("{}", statistics.generate_simplified_statistics_output());

    orchestrator
        .write_outputs()
        .context("Failed to write simulation output")?;
    if let Some(path) = &config.report_output {
        eprintln!("Statistics written to: {}", path);
    }
    if let Some(path) = &config.train_log_output {
        eprintln!("Train log written to: {}", path);
    }

    info!("Rail Network Simulator completed successfully");
    Ok(())
}

fn print_records(records: &[TrainRecord]) {
    for record in records {
        println!("{}", record);
    }
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig, mode: RunMode) {
    eprintln!("Rail Network Simulator");
    eprintln!("======================");
    eprintln!("A discrete-event simulation of a day of rail traffic");
    eprintln!();

    print_configuration_summary(config, mode);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig, mode: RunMode) {
    eprintln!("Configuration:");
    eprintln!("  Window: {} - {}", config.start_time, config.end_time);
    eprintln!("  Interval: {} min", config.interval);
    eprintln!("  Mode: {}", mode);
    eprintln!(
        "  Lead times (min): assembly {}, ready {}, retry {}, departure {}, disassembly {}",
        config.lead_times.assembly,
        config.lead_times.ready,
        config.lead_times.assembly_retry,
        config.lead_times.departure,
        config.lead_times.disassembly
    );
    match &config.scenario {
        Some(path) => eprintln!("  Scenario: {}", path),
        None => {
            eprintln!(
                "  Generated network: {} stations, {} trains, {} cars per station",
                config.station_count, config.train_count, config.cars_per_station
            );
            if let Some(seed) = config.seed {
                eprintln!("  Random Seed: {}", seed);
            }
        }
    }
    eprintln!();
}
