//! The stop record shown on the map and targeted by route requests.

use std::sync::Arc;

use crate::identifiers::StopIdentifier;
use crate::models::types::{Coordinate, Fare, NextArrival};

/// A fixed pickup/drop-off point with its line and schedule.
///
/// Stops are created once when the catalog loads and never mutated;
/// everything downstream holds them behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
    /// Display label of the serving line (e.g. "101 - São Miguel")
    pub line_label: Arc<str>,
    pub next_arrival: NextArrival,
    pub fare: Fare,
    /// Hex RGB marker colour (e.g. "#3b82f6")
    pub color_tag: Arc<str>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Arc<str>,
    /// Timetable code printed on the operator's schedule
    #[cfg_attr(feature = "serde", serde(default))]
    pub code: Option<Arc<str>>,
}

impl Stop {
    pub fn is_reference_point(&self) -> bool {
        self.fare.is_free() && self.next_arrival == NextArrival::AllDay
    }
}
