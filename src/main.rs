use std::process::ExitCode;

use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};

use overpass::catalog::{CatalogClient, CatalogError, Satellite, DEFAULT_GP_URL};
use overpass::predict::{find_passes, subpoint, Observer};
use overpass::report::PredictionReport;
use overpass::web::{run_server, Config};

#[derive(Parser)]
#[command(name = "overpass")]
#[command(about = "Satellite pass prediction for a ground observer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TargetArgs {
    /// Exact satellite name as listed in the catalog
    #[arg(long, default_value = "ISS (ZARYA)")]
    satellite: String,
    /// Catalog group the satellite is listed under
    #[arg(long, default_value = "stations")]
    group: String,
    /// GP catalog endpoint
    #[arg(long, default_value = DEFAULT_GP_URL)]
    catalog_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict visible passes for an observer
    Passes {
        #[command(flatten)]
        target: TargetArgs,
        /// Observer coordinates as "lat, lon" in degrees
        #[arg(long)]
        coordinates: String,
        /// Observer altitude above sea level
        #[arg(long, default_value_t = 0.0)]
        altitude_m: f64,
        /// Search window from now, e.g. "24h" or "90m"
        #[arg(long, default_value = "24h")]
        window: String,
        /// Minimum elevation for a pass to count
        #[arg(long, default_value_t = 0.0)]
        min_elevation: f64,
        /// IANA timezone for report times
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Show the satellite's current ground position
    Position {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Run the HTTP API server
    Serve { config: String },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Passes {
            target,
            coordinates,
            altitude_m,
            window,
            min_elevation,
            timezone,
        } => passes(
            &target,
            &coordinates,
            altitude_m,
            &window,
            min_elevation,
            &timezone,
        ),
        Commands::Position { target } => position(&target),
        Commands::Serve { config } => serve(&config),
    }
}

fn passes(
    target: &TargetArgs,
    coordinates: &str,
    altitude_m: f64,
    window: &str,
    min_elevation: f64,
    timezone: &str,
) -> ExitCode {
    let observer = match Observer::from_coordinates(coordinates, Some(altitude_m)) {
        Some(o) => o,
        None => {
            eprintln!("Invalid coordinates: expected \"lat, lon\" in degrees");
            return ExitCode::FAILURE;
        }
    };

    let horizon = match humantime::parse_duration(window.trim()) {
        Ok(d) => match Duration::from_std(d) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Window too large: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Err(e) => {
            eprintln!("Invalid window: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let timezone: chrono_tz::Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(e) => {
            eprintln!("Invalid timezone: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let satellite = match fetch_satellite(target) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let start = Utc::now();
    let end = start + horizon;
    let found = match find_passes(
        &satellite.elements,
        &satellite.constants,
        &observer,
        start,
        end,
        min_elevation,
    ) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Prediction failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if found.is_empty() {
        println!(
            "No complete passes of {} above {}° in the next {}",
            satellite.name, min_elevation, window
        );
        return ExitCode::SUCCESS;
    }

    println!("{} passes of {}:", found.len(), satellite.name);
    for pass in &found {
        let report = PredictionReport::build(&satellite.name, pass, timezone);
        println!();
        println!(
            "  rise {}  az {:6.1}° {:<3}  el {:5.1}°",
            report.rise.time.format("%Y-%m-%d %H:%M:%S %:z"),
            report.rise.azimuth_deg,
            report.rise.direction,
            report.rise.elevation_deg,
        );
        println!(
            "  peak {}  az {:6.1}° {:<3}  el {:5.1}°  range {:.0} km",
            report.culmination.time.format("%Y-%m-%d %H:%M:%S %:z"),
            report.culmination.azimuth_deg,
            report.culmination.direction,
            report.culmination.elevation_deg,
            report.culmination.range_km,
        );
        println!(
            "  set  {}  az {:6.1}° {:<3}  el {:5.1}°",
            report.set.time.format("%Y-%m-%d %H:%M:%S %:z"),
            report.set.azimuth_deg,
            report.set.direction,
            report.set.elevation_deg,
        );
        println!("  visible for {}", report.duration_min_sec());
    }

    ExitCode::SUCCESS
}

fn position(target: &TargetArgs) -> ExitCode {
    let satellite = match fetch_satellite(target) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match subpoint(&satellite.elements, &satellite.constants, Utc::now()) {
        Ok(sp) => {
            println!(
                "{} is over {:.2}°, {:.2}° at {:.0} km altitude",
                satellite.name, sp.latitude_deg, sp.longitude_deg, sp.altitude_km
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Prediction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn fetch_satellite(target: &TargetArgs) -> Result<Satellite, ExitCode> {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let client = CatalogClient::new(target.catalog_url.clone());
    match runtime.block_on(client.fetch_satellite(&target.group, &target.satellite)) {
        Ok(satellite) => Ok(satellite),
        Err(CatalogError::NotFound(name)) => {
            eprintln!("Satellite {:?} is not in group {:?}", name, target.group);
            Err(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("Catalog fetch failed: {}", e);
            Err(ExitCode::FAILURE)
        }
    }
}
