//! The route panel next to the map, and the links offered from it.

use std::fmt;
use std::sync::Arc;

use terezinha_core::{RouteResult, RouteSource};
use terezinha_transit::{Coordinate, Fare, NextArrival, Stop, StopIdentifier};

const APP_NAME: &str = "Santa Terezinha";

#[derive(Clone, Debug, PartialEq)]
pub struct RouteSummary {
    pub stop_id: StopIdentifier,
    pub stop_name: Arc<str>,
    pub line_label: Arc<str>,
    pub description: Arc<str>,
    pub distance_km: f64,
    pub eta_minutes: u32,
    pub next_arrival: NextArrival,
    pub fare: Fare,
    pub source: RouteSource,
}

impl RouteSummary {
    pub fn new(stop: &Stop, result: &RouteResult) -> Self {
        Self {
            stop_id: stop.id.clone(),
            stop_name: stop.name.clone(),
            line_label: stop.line_label.clone(),
            description: stop.description.clone(),
            distance_km: result.distance_km,
            eta_minutes: result.eta_minutes,
            next_arrival: stop.next_arrival,
            fare: stop.fare,
            source: result.source,
        }
    }
}

/// Content of the route panel
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RoutePanel {
    #[default]
    Empty,
    Loading {
        stop_name: Arc<str>,
    },
    Summary(RouteSummary),
}

impl RoutePanel {
    pub fn is_loading(&self) -> bool {
        matches!(self, RoutePanel::Loading { .. })
    }
}

impl fmt::Display for RoutePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePanel::Empty => Ok(()),
            RoutePanel::Loading { stop_name } => write!(f, "Computing route to {stop_name}..."),
            RoutePanel::Summary(summary) => {
                writeln!(f, "Route to {} ({})", summary.stop_name, summary.line_label)?;
                if !summary.description.is_empty() {
                    writeln!(f, "{}", summary.description)?;
                }
                writeln!(f, "  distance      {:.1} km", summary.distance_km)?;
                writeln!(f, "  walking time  {} min", summary.eta_minutes)?;
                writeln!(f, "  next bus      {}", summary.next_arrival)?;
                writeln!(f, "  fare          {}", summary.fare)?;
                write!(f, "  route         {}", summary.source)
            }
        }
    }
}

/// Turn-by-turn link in the external directions service.
pub fn directions_url(origin: Coordinate, stop: &Stop) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={origin}&destination={}&travelmode=driving",
        stop.coordinate
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareMessage {
    pub title: String,
    pub text: String,
}

impl fmt::Display for ShareMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.text)
    }
}

pub fn share_message(stop: &Stop) -> ShareMessage {
    ShareMessage {
        title: format!("Route to {} - {APP_NAME}", stop.name),
        text: format!("Check out the route to the {} stop on {APP_NAME}", stop.name),
    }
}
