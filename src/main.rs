use anyhow::Result;
use btc_montecarlo::{
    chart::render_histogram,
    coingecko::CoinGeckoClient,
    pipeline,
    report::print_report,
    CompoundingMode, RunConfig, SimulationConfig,
};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "btc-montecarlo")]
#[command(author, version, about = "Monte Carlo forecast of Bitcoin prices from CoinGecko history")]
struct Args {
    /// CoinGecko coin id
    #[arg(long, default_value = "bitcoin")]
    coin: String,

    /// Quote currency
    #[arg(long, default_value = "usd")]
    vs_currency: String,

    /// First day of price history (YYYY-MM-DD, 00:00 UTC)
    #[arg(long, default_value = "2024-11-01")]
    start_date: NaiveDate,

    /// End of price history (YYYY-MM-DD, 00:00 UTC)
    #[arg(long, default_value = "2024-11-10")]
    end_date: NaiveDate,

    /// Date to fetch the current price for (YYYY-MM-DD)
    #[arg(long, default_value = "2024-11-12")]
    current_price_date: NaiveDate,

    /// Use the last historical price instead of fetching a current price
    #[arg(long)]
    no_current_price: bool,

    /// Number of Monte Carlo trials
    #[arg(short = 'n', long, default_value = "10000")]
    simulations: usize,

    /// Days simulated per trial
    #[arg(long, default_value = "3")]
    horizon_days: usize,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// How daily changes combine into a final price
    #[arg(long, value_enum, default_value_t = CompoundingMode::Additive)]
    compounding: CompoundingMode,

    /// Collapse history to one closing price per UTC day
    #[arg(long)]
    resample_daily: bool,

    /// Histogram bin count
    #[arg(long, default_value = "50")]
    bins: usize,

    /// Output path for the histogram PNG
    #[arg(long, default_value = "bitcoin_monte_carlo.png")]
    chart_path: PathBuf,

    /// Skip rendering the histogram
    #[arg(long)]
    no_chart: bool,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            coin_id: args.coin,
            vs_currency: args.vs_currency,
            start_date: args.start_date,
            end_date: args.end_date,
            current_price_date: (!args.no_current_price).then_some(args.current_price_date),
            resample_daily: args.resample_daily,
            simulation: SimulationConfig {
                horizon_days: args.horizon_days,
                simulation_count: args.simulations,
                seed: args.seed,
                compounding: args.compounding,
            },
            bins: args.bins,
            chart_path: (!args.no_chart).then_some(args.chart_path),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("btc_montecarlo={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::from(args);
    info!("Run config: {:?}", config);

    let client = CoinGeckoClient::from_env(&config.coin_id, &config.vs_currency)?;

    let outcome = pipeline::run(&client, &config).await?;

    print_report(&config, &outcome);

    if let Some(ref path) = config.chart_path {
        render_histogram(&outcome.result, config.simulation.horizon_days, config.bins, path)?;
        println!("\nHistogram saved to {}", path.display());
    }

    Ok(())
}
