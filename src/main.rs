//! Dataset generator entry point: CLI wiring and pipeline invocation.

use std::path::Path;
use std::process;

use feeder_datagen::config::RunConfig;
use feeder_datagen::engine::TextSocketEngine;
use feeder_datagen::pipeline;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    seed_override: Option<u64>,
    out_dir: Option<String>,
    endpoint: Option<String>,
}

fn print_help() {
    eprintln!("feeder-datagen — synthetic dataset generator for a distribution test feeder");
    eprintln!();
    eprintln!("Usage: feeder-datagen [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>      Load run configuration from TOML file");
    eprintln!("  --seed <u64>         Override the profile-synthesis seed");
    eprintln!("  --out-dir <path>     Override the artifact output directory");
    eprintln!("  --endpoint <addr>    Override the engine TCP endpoint");
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("If no --config is given, the baseline ckt5 run is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        seed_override: None,
        out_dir: None,
        endpoint: None,
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
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--out-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out-dir requires a path argument");
                    process::exit(1);
                }
                cli.out_dir = Some(args[i].clone());
            }
            "--endpoint" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --endpoint requires an address argument");
                    process::exit(1);
                }
                cli.endpoint = Some(args[i].clone());
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
    let cli = parse_args();

    let mut config = if let Some(ref path) = cli.config_path {
        match RunConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        RunConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        config.run.seed = seed;
    }
    if let Some(dir) = cli.out_dir {
        config.output.dir = dir;
    }
    if let Some(endpoint) = cli.endpoint {
        config.engine.endpoint = endpoint;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut engine = match TextSocketEngine::connect(&config.engine.endpoint) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!(
                "error: cannot reach engine at {}: {e}",
                config.engine.endpoint
            );
            process::exit(1);
        }
    };

    if let Err(e) = pipeline::run(&mut engine, &config) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
