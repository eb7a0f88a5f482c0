use clap::Parser;
use tracing_subscriber::EnvFilter;

use mining_route_scanner::domain::{MiningMode, RouteResult, DEFAULT_TOP_N};
use mining_route_scanner::infra::{EdsmClient, EdtoolsClient};
use mining_route_scanner::scan::{MiningScanner, DEFAULT_MIN_PRICE};
use mining_route_scanner::util::format;

#[derive(Debug, Parser)]
#[command(
    name = "mining-route-scanner",
    version,
    about = "Evaluate and rank Elite Dangerous laser mining routes by realistic credits per hour."
)]
struct Args {
    /// Current system, used as the travel origin.
    #[arg(long, default_value = "Sol")]
    system: String,

    /// How the session is flown; selects the realistic time multiplier.
    #[arg(long, value_enum, default_value_t = MiningMode::Unmapped)]
    mode: MiningMode,

    /// Number of routes to report.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Ignore buyers below this unit price, in credits per ton.
    #[arg(long, default_value_t = DEFAULT_MIN_PRICE)]
    min_price: f64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(error) = run(args).await {
        tracing::error!(%error, "scan aborted");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let scanner = MiningScanner::new(EdsmClient::new()?, EdtoolsClient::new()?)
        .with_mode(args.mode)
        .with_min_price(args.min_price);

    let ship = scanner.ship();
    println!("Ship: {}", ship.name);
    println!(
        "Cargo: {} t | Jump range: {} LY (laden) | Lasers: {}x | Collectors: {}x",
        ship.cargo_tons, ship.jump_range_ly, ship.num_lasers, ship.collector_controllers
    );
    println!(
        "Mode: {} | Origin: {} | Price floor: {}",
        scanner.mode().label(),
        args.system,
        format::credits(args.min_price)
    );

    let routes = scanner.scan(&args.system, args.top).await?;
    if routes.is_empty() {
        println!("\nNo valid routes found.");
        return Ok(());
    }

    render(&routes);
    Ok(())
}

fn render(routes: &[RouteResult]) {
    println!("\nTop {} laser mining routes (realistic Cr/h):", routes.len());
    for (position, route) in routes.iter().enumerate() {
        let Some(m) = route.metrics() else {
            continue;
        };
        println!("\n#{}: {}", position + 1, route.commodity.to_uppercase());
        println!("   Mine at:  {} ({})", route.mine_system, route.mine_ring);
        println!(
            "   Sell at:  {} / {} [pad {}]",
            route.sell_system, route.sell_station, m.pad
        );
        println!(
            "   Price: {}/t | Demand: {} | Tax band: {:.0}%",
            format::credits(m.unit_price),
            m.demand,
            m.sale.tax_rate * 100.0
        );
        println!(
            "   Distance: {:.1} LY to mine + {:.1} LY to sell = {:.1} LY",
            m.plan.dist_to_mine_ly, m.plan.dist_to_sell_ly, m.plan.total_ly
        );
        println!(
            "   Extraction: {} | Realistic mining: {} | Travel: {}",
            format::minutes(m.plan.extraction_min),
            format::minutes(m.plan.realistic_mining_min),
            format::minutes(m.plan.travel_min)
        );
        println!(
            "   Profit: {} -> {} per hour",
            format::credits(m.sale.net_profit),
            format::credits(m.credits_per_hour)
        );
    }
}
