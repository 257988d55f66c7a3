use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use terezinha_core::{AppConfig, MapProvider};
use terezinha_map::logging::setup_logging;
use terezinha_transit::{Coordinate, StopProvider};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "stop-router",
    author,
    version,
    about = "Route to a transit stop and render the map layers",
    long_about = "Locates the user (or uses the configured fallback origin), computes a \
                  route to a stop through the routing service and renders the result the \
                  way the map front-end would.\n\n\
                  When the routing service cannot be reached the route is approximated; \
                  distance and walking time are always the direct great-circle estimate."
)]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every stop in the catalog
    Stops,

    /// Compute a route to one stop and print the panel and layers
    Route {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        origin: Origin,

        /// Map provider to render for (overrides the configuration)
        #[arg(long)]
        provider: Option<MapProvider>,

        /// Write the GeoJSON layers (open-data) or image URL (primary) here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute a route and serve the layers over HTTP until Ctrl-C
    Serve {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        origin: Origin,

        /// Port to listen on (0 picks a free one)
        #[arg(short, long, default_value_t = 8787)]
        port: u16,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Target {
    /// Stop id (e.g. "gruta")
    #[arg(long)]
    stop: Option<String>,

    /// Exact stop name (e.g. "Gruta")
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct Origin {
    /// Current position as LAT,LNG; without it the fallback origin is used
    #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
    position: Option<Coordinate>,
}

fn parse_position(value: &str) -> Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {value:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    Coordinate::new(lat, lng).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let catalog: Arc<dyn StopProvider> =
        Arc::new(config.load_catalog().context("failed to load stop catalog")?);
    tracing::debug!("{} stops loaded", catalog.list().len());

    match cli.command {
        Command::Stops => commands::list_stops(catalog.as_ref()),
        Command::Route {
            target,
            origin,
            provider,
            output,
        } => {
            let provider = provider.unwrap_or(config.map.provider);
            commands::route(&config, catalog, &target, origin.position, provider, output).await
        }
        Command::Serve {
            target,
            origin,
            port,
        } => commands::serve(&config, catalog, &target, origin.position, port).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        let position = parse_position("-27.0210, -50.9150").unwrap();
        assert_eq!(position, Coordinate::new(-27.0210, -50.9150).unwrap());

        assert!(parse_position("-27.0210").is_err());
        assert!(parse_position("north,-50").is_err());
        assert!(parse_position("-127.0,-50.0").is_err());
    }

    #[test]
    fn test_cli_requires_one_target() {
        assert!(Cli::try_parse_from(["stop-router", "route"]).is_err());
        assert!(
            Cli::try_parse_from(["stop-router", "route", "--stop", "gruta", "--name", "Gruta"])
                .is_err()
        );

        let cli = Cli::try_parse_from([
            "stop-router",
            "route",
            "--name",
            "Gruta",
            "--position",
            "-27.0210,-50.9150",
            "--provider",
            "primary",
        ])
        .unwrap();
        let Command::Route { target, origin, provider, .. } = cli.command else {
            panic!("expected the route command");
        };
        assert_eq!(target.name.as_deref(), Some("Gruta"));
        assert!(origin.position.is_some());
        assert_eq!(provider, Some(MapProvider::Primary));
    }
}
