use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use chrono::Timelike;
use clap::{Parser, Subcommand};
use saferoute::config::{Config, DEFAULT_CONFIG_PATH};
use saferoute::distance::format_distance;
use saferoute::gazetteer::LocationInput;
use saferoute::models::TravelMode;
use saferoute::planner::plan_routes;
use saferoute::reports::ReportStore;
use saferoute::server;
use saferoute::travel::format_duration;

#[derive(Parser)]
#[command(name = "saferoute", about = "Safety-aware route planner")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve,
    /// Plan routes once and print them
    Plan {
        /// Origin as a place name or `lat,lng`
        #[arg(long)]
        from: String,
        /// Destination as a place name or `lat,lng`
        #[arg(long)]
        to: String,
        /// DRIVING, WALKING, BICYCLING or TRANSIT
        #[arg(long, default_value = "DRIVING")]
        mode: String,
        /// Local hour 0-23 (defaults to now)
        #[arg(long)]
        hour: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Serve => server::serve(config).await,
        Commands::Plan {
            from,
            to,
            mode,
            hour,
        } => plan(&config, &from, &to, &mode, hour).await,
    }
}

async fn plan(
    config: &Config,
    from: &str,
    to: &str,
    mode: &str,
    hour: Option<u8>,
) -> anyhow::Result<()> {
    let mode = TravelMode::from_str(mode).with_context(|| format!("unknown travel mode {mode:?}"))?;
    let hour = match hour {
        Some(hour) if hour > 23 => bail!("hour {hour} is outside 0-23"),
        Some(hour) => hour,
        None => u8::try_from(chrono::Local::now().hour())?,
    };

    let gazetteer = config.gazetteer()?;
    let origin = gazetteer.locate(Some(LocationInput::from_str(from)?), "origin")?;
    let destination = gazetteer.locate(Some(LocationInput::from_str(to)?), "destination")?;

    let store = ReportStore::with_reports(config.seed_reports()?);
    let reports = store.active_snapshot().await;
    let routes = plan_routes(&origin, &destination, mode, &reports, hour)?;

    println!(
        "{} -> {} ({mode}, {hour:02}:00)",
        origin.name, destination.name
    );
    for route in &routes {
        println!();
        print!(
            "{}: {} · {} · {}",
            route.name,
            route.description,
            format_distance(route.distance_meters),
            format_duration(route.duration_seconds)
        );
        match route.safety_score {
            Some(score) => println!(" · safety {score}/100"),
            None => println!(),
        }
        for step in &route.steps {
            println!(
                "  {} ({})",
                step.instruction,
                format_distance(step.distance_meters)
            );
        }
    }

    Ok(())
}
