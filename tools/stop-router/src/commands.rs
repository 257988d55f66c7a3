use anyhow::{Context, Result, anyhow, bail};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use terezinha_core::{AppConfig, FixedGeolocator, Geolocator, MapProvider, RoutePlan};
use terezinha_map::{
    GeoJsonSurface, LayerServer, LayerSnapshot, MapController, MapSurface, StaticMapSurface,
};
use terezinha_transit::{Coordinate, StopProvider};

use crate::Target;

const STATIC_MAP_SIZE: (u32, u32) = (640, 480);

pub fn list_stops(catalog: &dyn StopProvider) -> Result<()> {
    println!(
        "{:<18} {:<16} {:<22} {:>5}  {}",
        "ID", "NAME", "LINE", "NEXT", "FARE"
    );
    for stop in catalog.list() {
        println!(
            "{:<18} {:<16} {:<22} {:>5}  {}",
            stop.id.as_str(),
            stop.name,
            stop.line_label,
            stop.next_arrival.to_string(),
            stop.fare
        );
    }
    Ok(())
}

pub async fn route(
    config: &AppConfig,
    catalog: Arc<dyn StopProvider>,
    target: &Target,
    position: Option<Coordinate>,
    provider: MapProvider,
    output: Option<PathBuf>,
) -> Result<()> {
    let geolocator = geolocator(position);

    let rendered = match provider {
        MapProvider::OpenData => {
            let surface = GeoJsonSurface::new(config.map.container_id.as_str());
            let mut controller = MapController::from_config(config, catalog, geolocator, surface);
            let plan = locate_and_route(&mut controller, target).await?;
            print_plan(&controller, &plan)?;

            let layers = controller.layers().surface().to_feature_collection();
            serde_json::to_string_pretty(&layers).context("failed to encode layers")?
        }
        MapProvider::Primary => {
            let (width, height) = STATIC_MAP_SIZE;
            let surface = StaticMapSurface::new(config.map.container_id.as_str(), width, height);
            let mut controller = MapController::from_config(config, catalog, geolocator, surface);
            let plan = locate_and_route(&mut controller, target).await?;
            print_plan(&controller, &plan)?;

            controller.layers().surface().image_url()
        }
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, rendered)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("{provider} layers written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

pub async fn serve(
    config: &AppConfig,
    catalog: Arc<dyn StopProvider>,
    target: &Target,
    position: Option<Coordinate>,
    port: u16,
) -> Result<()> {
    let snapshot = LayerSnapshot::new();
    let surface = GeoJsonSurface::new(config.map.container_id.as_str());
    let mut controller = MapController::from_config(config, catalog, geolocator(position), surface)
        .with_snapshot(snapshot.clone());

    let plan = locate_and_route(&mut controller, target).await?;
    print_plan(&controller, &plan)?;

    let server = LayerServer::bind(SocketAddr::from(([127, 0, 0, 1], port)), snapshot)
        .await
        .map_err(|e| anyhow!("{e:?}"))?;
    println!("serving layers at {}", server.layers_url());

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for Ctrl-C")?;
    tracing::info!("shutting down");
    server.shutdown().await.map_err(|e| anyhow!("{e:?}"))
}

fn geolocator(position: Option<Coordinate>) -> Option<Arc<dyn Geolocator>> {
    position.map(|p| Arc::new(FixedGeolocator::at(p)) as Arc<dyn Geolocator>)
}

async fn locate_and_route<S: MapSurface>(
    controller: &mut MapController<S>,
    target: &Target,
) -> Result<RoutePlan> {
    controller.locate().await;

    let plan = match (&target.stop, &target.name) {
        (Some(id), _) => controller.route_to(&id.as_str().into()).await,
        (None, Some(name)) => controller.route_to_named(name).await,
        (None, None) => bail!("either --stop or --name is required"),
    };
    plan.context("no route computed")
}

fn print_plan<S: MapSurface>(controller: &MapController<S>, plan: &RoutePlan) -> Result<()> {
    println!("{}", controller.layers().panel());
    println!();
    println!("directions: {}", controller.directions_url(&plan.stop.id)?);
    println!("{}", controller.share_message(&plan.stop.id)?);
    println!();
    Ok(())
}
