//! Agent entry point: CLI wiring and config-driven bootstrap of the
//! managed apartment.

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use parking_lot::Mutex;

use ems_agent::config::AgentConfig;
use ems_agent::mib::{Oid, oid};
use ems_agent::model::SharedApartment;
use ems_agent::notify::{Notification, NotificationBridge};
use ems_agent::registry::MemoryRegistry;
use ems_agent::report::{self, StateReport};
use ems_agent::telemetry;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    solar: Option<i64>,
    table_out: Option<String>,
}

fn print_help() {
    eprintln!("ems-agent — energy-management agent for a managed apartment");
    eprintln!();
    eprintln!("Usage: ems-agent [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>      Load agent config from TOML file");
    eprintln!("  --preset <name>      Use a built-in preset (baseline, highrise)");
    eprintln!("  --solar <i64>        Simulate a manager write of solar generation");
    eprintln!("                       followed by the change notification");
    eprintln!("  --table-out <path>   Export the flat table to CSV");
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        solar: None,
        table_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--solar" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --solar requires an integer argument");
                    process::exit(1);
                }
                if let Ok(v) = args[i].parse::<i64>() {
                    cli.solar = Some(v);
                } else {
                    eprintln!("error: --solar value \"{}\" is not a valid i64", args[i]);
                    process::exit(1);
                }
            }
            "--table-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --table-out requires a path argument");
                    process::exit(1);
                }
                cli.table_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    telemetry::init();
    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then baseline
    let config = if let Some(ref path) = cli.config_path {
        match AgentConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match AgentConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        AgentConfig::baseline()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Bootstrap the apartment and expose it to the registry. A registry
    // failure here is fatal: the agent must not come up half-registered.
    let mut apartment = match config.build_apartment() {
        Ok(apartment) => apartment,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let mut registry = MemoryRegistry::new();
    if let Err(e) = apartment.register(&mut registry) {
        eprintln!("error: registration failed: {e}");
        process::exit(1);
    }

    let shared: SharedApartment = Arc::new(Mutex::new(apartment));

    // One long-lived listener owns the notification channel
    let (events_tx, events_rx) = mpsc::channel::<Notification>();
    let bridge = NotificationBridge::new(Arc::clone(&shared));
    let listener = thread::spawn(move || bridge.run(events_rx));

    // Simulated manager write: update the solar scalar through the
    // ordinary write path, then push the change notification.
    if let Some(solar) = cli.solar {
        let solar_oid = Oid::new(oid::APT_GENERATION_BY_SOLAR);
        if let Err(e) = shared.lock().write_scalar(&solar_oid, solar.to_string()) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        if events_tx
            .send(Notification::new(solar_oid, solar.to_string()))
            .is_err()
        {
            eprintln!("error: notification listener is gone");
            process::exit(1);
        }
    }

    // Close the channel and wait for the listener to drain it
    drop(events_tx);
    if listener.join().is_err() {
        eprintln!("error: notification listener panicked");
        process::exit(1);
    }

    let state = StateReport::from_apartment(&shared.lock());
    println!("{state}");

    if let Some(ref path) = cli.table_out {
        if let Err(e) = report::export_flats_csv(&state, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Flat table written to {path}");
    }
}
