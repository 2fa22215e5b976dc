//! Geo Payload developer harness
//!
//! Usage:
//!   geo-payload [OPTIONS] [ENTITIES]
//!
//! Options:
//!   -c, --config <FILE>    Map configuration (TOML format)
//!   -m, --map-id <N>       Fixed map id instead of a random one
//!   --exchange             Print the wire exchange instead of executing it
//!   --receive <FILE>       Validate and execute an exchange file
//!   --lightbox             Run the worldmap lightbox channel
//!   -d, --debug            Log every cycle step
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geo_payload::{
    entity, run_cycle, Configuration, Entity, Exchange, Executor, MapId, PipelineError,
    RecordingRuntime,
};

#[derive(Parser)]
#[command(name = "geo-payload")]
#[command(about = "Compose, validate and execute map payloads built from gallery entities")]
struct Cli {
    /// Entity list as JSON (reads from stdin if not provided)
    entities: Option<PathBuf>,

    /// Map configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map id; picked at random when absent
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(0..=999))]
    map_id: Option<u16>,

    /// Print the wire exchange instead of executing it
    #[arg(long, conflicts_with_all = ["receive", "lightbox"])]
    exchange: bool,

    /// Validate and execute a previously printed exchange
    #[arg(long, value_name = "FILE", conflicts_with = "lightbox")]
    receive: Option<PathBuf>,

    /// Compose and check a worldmap lightbox snippet
    #[arg(long)]
    lightbox: bool,

    /// Log every cycle step
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Some(path) = &cli.receive {
        let content = read_file(path, "exchange");
        let exchange = match Exchange::from_json(&content) {
            Ok(exchange) => exchange,
            Err(e) => {
                eprintln!("Error parsing exchange '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        let mut executor = Executor::awaiting(RecordingRuntime::default());
        match executor.receive(&exchange) {
            Ok(program) => print!("{}", program),
            Err(e) => fail(e, &exchange.body, "body"),
        }
        return;
    }

    let config = match &cli.config {
        Some(path) => match Configuration::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Configuration::default(),
    };
    let entities = read_entities(cli.entities.as_deref());
    let map_id = cli.map_id.map(MapId::new).unwrap_or_else(MapId::random);

    if cli.lightbox {
        let mut executor = Executor::new(RecordingRuntime::default());
        let snippet = match executor.compose_lightbox(&entities, &config, map_id) {
            Ok(snippet) => snippet,
            Err(e) => fail(e, "", "lightbox"),
        };
        match executor.receive_lightbox(&snippet) {
            Ok(()) => print!("{}", snippet),
            Err(e) => fail(e, &snippet, "lightbox"),
        }
        return;
    }

    if cli.exchange {
        match geo_payload::compose_exchange(&entities, &config, map_id) {
            Ok((_, exchange)) => match exchange.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => fail(e.into(), "", "exchange"),
            },
            Err(e) => fail(e, "", "exchange"),
        }
        return;
    }

    let mut runtime = RecordingRuntime::default();
    match run_cycle(&entities, &config, map_id, &mut runtime) {
        Ok(program) => print!("{}", program),
        Err(e) => {
            // Rejections point into the data sections, so recompose them for the report
            let body = geo_payload::compose_exchange(&entities, &config, map_id)
                .map(|(_, exchange)| exchange.body)
                .unwrap_or_default();
            fail(e, &body, "body")
        }
    }
}

fn read_file(path: &Path, what: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {} '{}': {}", what, path.display(), e);
            process::exit(1);
        }
    }
}

fn read_entities(path: Option<&Path>) -> Vec<Entity> {
    let content = match path {
        Some(path) => read_file(path, "entities"),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };
    match entity::from_json(&content) {
        Ok(entities) => entities,
        Err(e) => {
            eprintln!("Error parsing entities: {}", e);
            process::exit(1);
        }
    }
}

fn fail(err: PipelineError, source: &str, name: &str) -> ! {
    match &err {
        PipelineError::Validation(e) => eprint!("{}", e.report(source, name)),
        _ => eprintln!("Error: {}", err),
    }
    process::exit(1);
}
