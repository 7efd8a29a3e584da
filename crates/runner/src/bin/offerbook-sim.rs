use env_logger::Env;
use offerbook_runner::{OrderBookSimulation, SimulationConfig};

fn print_help() {
    eprintln!(
        r#"Offer Book Simulator - order book view against a simulated offer network

USAGE:
    offerbook-sim [OPTIONS]

OPTIONS:
    --config <PATH>     Load simulation configuration from JSON file
    --seed <N>          Seed the offer generator for a reproducible run
    --help              Print this help message

ENVIRONMENT VARIABLES:
    OFFERBOOK_DEFAULT_CURRENCY   Currency requested when no bank account is set
    OFFERBOOK_ORDERING           Sorted view order (price-asc, price-desc, amount-desc)
    RUST_LOG                     Log level filter

EXAMPLES:
    # Run with defaults
    offerbook-sim

    # Reproducible run with config file
    offerbook-sim --config sim.json --seed 42
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--seed" | "-s" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<u64>()) {
                    Some(Ok(value)) => seed = Some(value),
                    _ => {
                        eprintln!("Error: --seed requires a numeric argument");
                        std::process::exit(1);
                    }
                }
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            SimulationConfig::from_file(&path)?
        }
        None => SimulationConfig::default(),
    };
    config.orderbook = config.orderbook.apply_env_overrides()?;
    if seed.is_some() {
        config.seed = seed;
    }

    log::info!(
        "Simulating {} offers for a {} account, sorted by {}",
        config.offer_count,
        config.user.currency,
        config.orderbook.ordering.as_str()
    );

    let results = OrderBookSimulation::with_config(config).run().await?;

    println!(
        "{:<12} {:<5} {:>12} {:>10} {:<4} {:<3}",
        "OFFER", "SIDE", "PRICE", "AMOUNT", "CCY", "CTY"
    );
    for offer in &results.top_offers {
        println!(
            "{:<12} {:<5} {:>12} {:>10} {:<4} {:<3}",
            offer.id,
            offer.direction.as_str(),
            offer.price,
            offer.amount,
            offer.currency,
            offer.country
        );
    }
    println!(
        "{} of {} offers visible ({} published, {} withdrawn, {} view updates)",
        results.visible_count,
        results.store_count,
        results.published,
        results.removal_requests,
        results.view_changes
    );

    if !results.success {
        std::process::exit(2);
    }
    Ok(())
}
