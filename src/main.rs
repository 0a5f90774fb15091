use catch_locator::config::{Overrides, Settings};
use catch_locator::location::{
    log_result, outcome_from_json, resolve, Coordinate, GeocodeProvider, GoogleGeocoder,
    PlaceNameResult,
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catch Locator — readable place names for logged catches
///
/// Reverse-geocodes a coordinate and picks a short name, preferring lakes,
/// rivers and parks over street addresses.
///
/// Examples:
///   catchloc resolve --lat 58.5035 --lon 13.1570
///   catchloc replay --lat 58.5035 --lon 13.1570 --file response.json
///   catchloc serve --port 8080
#[derive(Parser)]
#[command(name = "catchloc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Google Geocoding API key.
    #[arg(long, global = true, env = "GOOGLE_GEOCODING_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Result language requested from the provider (e.g. sv, en).
    #[arg(long, global = true)]
    language: Option<String>,

    /// Provider request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Config file. Defaults to ~/.catch-locator/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a coordinate with the geocoding provider.
    Resolve {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Resolve a saved provider response without network access.
    Replay {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Provider JSON body, or "-" for stdin.
        #[arg(long)]
        file: PathBuf,
    },
    /// Serve GET /api/geocode over HTTP.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catch_locator=info,catchloc=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (host, port) = match &cli.command {
        Command::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };

    let settings = Settings::load(cli.config.as_deref())
        .unwrap_or_else(|e| fail(&e.to_string()))
        .with_overrides(Overrides {
            api_key: cli.api_key.clone(),
            language: cli.language.clone(),
            timeout_secs: cli.timeout_secs,
            host,
            port,
        });

    match cli.command {
        Command::Resolve { lat, lon } => {
            let coord = checked_coordinate(lat, lon);
            let outcome = GoogleGeocoder::new(&settings).reverse_geocode(coord);
            print_result(coord, &resolve(coord, &outcome));
        }
        Command::Replay { lat, lon, file } => {
            let coord = checked_coordinate(lat, lon);
            let body = read_body(&file).unwrap_or_else(|e| {
                fail(&format!("Cannot read {}: {}", file.display(), e))
            });
            print_result(coord, &resolve(coord, &outcome_from_json(&body)));
        }
        Command::Serve { .. } => {
            let runtime = tokio::runtime::Runtime::new()
                .unwrap_or_else(|e| fail(&format!("Cannot start runtime: {}", e)));
            if let Err(e) = runtime.block_on(catch_locator::server::start(&settings)) {
                fail(&format!("Server error on {}: {}", settings.bind_addr(), e));
            }
        }
    }
}

fn checked_coordinate(lat: f64, lon: f64) -> Coordinate {
    let coord = Coordinate::new(lat, lon);
    if !coord.is_valid() {
        fail("Invalid coordinates. Lat: -90..90, Lon: -180..180");
    }
    coord
}

fn read_body(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        std::fs::read_to_string(path)
    }
}

fn print_result(coord: Coordinate, result: &PlaceNameResult) {
    log_result(coord, result);
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Cannot encode result: {}", e)),
    }
}

fn fail(msg: &str) -> ! {
    tracing::error!("{}", msg);
    std::process::exit(1);
}
