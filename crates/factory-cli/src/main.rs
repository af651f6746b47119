use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use contracts::{CompressionThresholds, SimConfig};
use factory_api::{serve, FactoryRuntime, HttpMemoryService, MemoryBridge, NullMemoryService};
use factory_core::world::FactoryWorld;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("factory-cli <command>");
    println!("commands:");
    println!("  status");
    println!("  tick [n]");
    println!("  snapshot [n]");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8080");
    println!("set FACTORY_MEMORY_URL to index events into a memory service");
}

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::as_str).unwrap_or("127.0.0.1:8080");
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn parse_tick_count(value: Option<&String>) -> Result<u64, String> {
    match value {
        None => Ok(1),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("invalid tick count: {raw}")),
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

fn offline_world() -> FactoryWorld {
    FactoryWorld::with_default_catalog(SimConfig::default(), epoch_ms())
}

fn memory_bridge(config: &SimConfig) -> MemoryBridge {
    let thresholds = CompressionThresholds::from_config(config);
    match env::var("FACTORY_MEMORY_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
    {
        Some(url) => {
            info!(base_url = %url, "indexing into external memory service");
            MemoryBridge::spawn(HttpMemoryService::new(url), thresholds)
        }
        None => MemoryBridge::spawn(NullMemoryService, thresholds),
    }
}

async fn run_server(addr: SocketAddr) -> Result<(), String> {
    let config = SimConfig::default();
    let bridge = memory_bridge(&config);
    let world = FactoryWorld::with_default_catalog(config, epoch_ms());
    let runtime = Arc::new(FactoryRuntime::new(world, bridge));

    println!("serving factory api on http://{addr}");
    serve(addr, runtime)
        .await
        .map_err(|err| format!("server error: {err}"))
}

/// Step an exclusively owned world and print one line per indexable event.
fn run_ticks(ticks: u64) {
    let mut world = offline_world();
    for _ in 0..ticks {
        let outcome = world.step(epoch_ms());
        for event in outcome.events {
            println!(
                "tick={} agent={} source={} {}",
                outcome.tick, event.agent_id, event.source, event.content
            );
        }
    }
    println!(
        "ticked {} time(s), {} agents at tick {}",
        ticks,
        world.agents().len(),
        world.tick_count()
    );
}

fn run_snapshot(ticks: u64) -> Result<(), String> {
    let mut world = offline_world();
    for _ in 0..ticks {
        world.step(epoch_ms());
    }
    let snapshot = world.snapshot(epoch_ms(), None);
    let rendered = serde_json::to_string_pretty(&snapshot)
        .map_err(|err| format!("failed to serialize snapshot: {err}"))?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("status") => {
            let world = offline_world();
            println!(
                "tick={} agents={} rooms={}",
                world.tick_count(),
                world.agents().len(),
                world.rooms().len()
            );
        }
        Some("tick") => match parse_tick_count(args.get(2)) {
            Ok(ticks) => run_ticks(ticks),
            Err(err) => {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        },
        Some("snapshot") => match parse_tick_count(args.get(2)).and_then(run_snapshot) {
            Ok(()) => {}
            Err(err) => {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        },
        Some("serve") => match parse_socket_addr(args.get(2)) {
            Ok(addr) => {
                if let Err(err) = run_server(addr).await {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
            Err(err) => {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        },
        _ => {
            print_usage();
        }
    }
}
