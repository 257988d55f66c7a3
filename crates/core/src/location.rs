//! Resolving the user's position.
//!
//! The platform capability is a one-shot [`Geolocator`]; [`LocationProvider`]
//! wraps it so callers always get *an* origin, falling back to a configured
//! coordinate when positioning is denied, fails, or is not available at all.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use terezinha_transit::Coordinate;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PositionError {
    #[error("permission to read the position was denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("positioning is not supported on this platform")]
    Unsupported,
}

/// One-shot "get current position" capability.
///
/// Implementations complete through their own success/error path; no
/// timeout is layered on top.
pub trait Geolocator: Send + Sync {
    fn current_position(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Coordinate, PositionError>> + Send + '_>>;
}

/// A geolocator that always answers the same way (CLI `--position`, tests).
#[derive(Clone, Debug)]
pub struct FixedGeolocator(Result<Coordinate, PositionError>);

impl FixedGeolocator {
    pub fn at(coordinate: Coordinate) -> Self {
        Self(Ok(coordinate))
    }

    pub fn failing(error: PositionError) -> Self {
        Self(Err(error))
    }
}

impl Geolocator for FixedGeolocator {
    fn current_position(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Coordinate, PositionError>> + Send + '_>> {
        let answer = self.0.clone();
        Box::pin(async move { answer })
    }
}

/// Where an acquired origin came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum OriginSource {
    Device,
    Fallback,
}

pub struct LocationProvider {
    geolocator: Option<Arc<dyn Geolocator>>,
    fallback: Coordinate,
}

impl LocationProvider {
    pub fn new(geolocator: Option<Arc<dyn Geolocator>>, fallback: Coordinate) -> Self {
        Self {
            geolocator,
            fallback,
        }
    }

    /// A provider for platforms without a positioning capability.
    pub fn fallback_only(fallback: Coordinate) -> Self {
        Self::new(None, fallback)
    }

    /// Single attempt, no retry. Never fails: any positioning error yields
    /// the fallback coordinate.
    pub async fn acquire(&self) -> Coordinate {
        self.acquire_with_source().await.0
    }

    pub async fn acquire_with_source(&self) -> (Coordinate, OriginSource) {
        let Some(geolocator) = &self.geolocator else {
            tracing::info!("no positioning capability, using fallback origin {}", self.fallback);
            return (self.fallback, OriginSource::Fallback);
        };

        match geolocator.current_position().await {
            Ok(position) => {
                tracing::info!("acquired position {position}");
                (position, OriginSource::Device)
            }
            Err(error) => {
                tracing::warn!("{error}; using fallback origin {}", self.fallback);
                (self.fallback, OriginSource::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Coordinate = Coordinate::new_unchecked(-27.0233, -50.9185);

    #[tokio::test]
    async fn test_device_position_used() {
        let here = Coordinate::new(-27.0210, -50.9150).unwrap();
        let provider = LocationProvider::new(Some(Arc::new(FixedGeolocator::at(here))), CENTER);

        assert_eq!(provider.acquire_with_source().await, (here, OriginSource::Device));
    }

    #[tokio::test]
    async fn test_denied_falls_back() {
        let provider = LocationProvider::new(
            Some(Arc::new(FixedGeolocator::failing(PositionError::PermissionDenied))),
            CENTER,
        );

        assert_eq!(provider.acquire_with_source().await, (CENTER, OriginSource::Fallback));
    }

    #[tokio::test]
    async fn test_missing_capability_falls_back() {
        let provider = LocationProvider::fallback_only(CENTER);
        assert_eq!(provider.acquire().await, CENTER);
    }
}
