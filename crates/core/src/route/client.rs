use std::future::Future;
use std::pin::Pin;

use geojson::GeoJson;
use terezinha_transit::Coordinate;

use crate::config::RoutingConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    #[error("network error: {0}")]
    Network(String),

    #[error("routing service answered HTTP {0}")]
    Status(u16),

    #[error("malformed routing payload: {0}")]
    Malformed(String),
}

/// Fetch a path between two coordinates from an external routing service.
///
/// One request per call, no retry. Every failure comes back as a
/// [`RoutingError`]; nothing panics or escapes past this boundary.
pub trait RoutingClient: Send + Sync {
    fn request_path<'a>(
        &'a self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Coordinate>, RoutingError>> + Send + 'a>>;
}

/// Client for the openrouteservice directions API.
///
/// `GET {base}/v2/directions/{profile}?start=LNG,LAT&end=LNG,LAT` answering a
/// GeoJSON feature collection whose first feature is the route line.
pub struct OpenRouteServiceClient {
    base_url: String,
    profile: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenRouteServiceClient {
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            profile: config.profile.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Query values are form-encoded, so keys with reserved characters
    /// reach the service intact.
    fn directions_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<reqwest::Url, RoutingError> {
        let lng_lat = |c: Coordinate| format!("{},{}", c.longitude(), c.latitude());

        let mut params = vec![("start", lng_lat(origin)), ("end", lng_lat(destination))];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let endpoint = format!("{}/v2/directions/{}", self.base_url, self.profile);
        reqwest::Url::parse_with_params(&endpoint, &params)
            .map_err(|e| RoutingError::Network(format!("invalid routing url {endpoint}: {e}")))
    }

    async fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, RoutingError> {
        let url = self.directions_url(origin, destination)?;
        tracing::debug!("requesting {} route {origin} -> {destination}", self.profile);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RoutingError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RoutingError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Network(e.to_string()))?;

        parse_route_geometry(&body)
    }
}

impl RoutingClient for OpenRouteServiceClient {
    fn request_path<'a>(
        &'a self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Coordinate>, RoutingError>> + Send + 'a>> {
        Box::pin(self.fetch(origin, destination))
    }
}

/// Extract `features[0].geometry.coordinates` (a `[lng, lat]` line string).
pub fn parse_route_geometry(body: &str) -> Result<Vec<Coordinate>, RoutingError> {
    let malformed = |msg: String| RoutingError::Malformed(msg);

    let geojson: GeoJson = body.parse().map_err(|e| malformed(format!("{e}")))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(malformed("expected a FeatureCollection".to_owned()));
    };

    let geometry = collection
        .features
        .into_iter()
        .next()
        .and_then(|feature| feature.geometry)
        .ok_or_else(|| malformed("missing features[0].geometry".to_owned()))?;

    let geojson::Value::LineString(positions) = geometry.value else {
        return Err(malformed("route geometry is not a LineString".to_owned()));
    };
    if positions.is_empty() {
        return Err(malformed("route geometry has no coordinates".to_owned()));
    }

    positions
        .iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Coordinate::new(*lat, *lng).map_err(|e| malformed(e.to_string())),
            _ => Err(malformed(format!("position {position:?} has fewer than 2 values"))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coordinates: &str) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","properties":{{}},
            "geometry":{{"type":"LineString","coordinates":{coordinates}}}}}]}}"#
        )
    }

    #[test]
    fn test_parse_line_string() {
        let path = parse_route_geometry(&line("[[-50.9185,-27.0233],[-50.9190,-27.0228,812.4]]"))
            .unwrap();
        assert_eq!(
            path,
            vec![
                Coordinate::new(-27.0233, -50.9185).unwrap(),
                Coordinate::new(-27.0228, -50.9190).unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let cases = [
            "not json".to_owned(),
            r#"{"type":"Feature","properties":{},"geometry":null}"#.to_owned(),
            r#"{"type":"FeatureCollection","features":[]}"#.to_owned(),
            line("[]"),
            line("[[-50.9]]"),
            line("[[-50.9,-127.0]]"),
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},
               "geometry":{"type":"Point","coordinates":[-50.9,-27.0]}}]}"#
                .to_owned(),
        ];

        for body in cases {
            assert!(
                matches!(parse_route_geometry(&body), Err(RoutingError::Malformed(_))),
                "accepted {body}"
            );
        }
    }

    fn client(api_key: Option<&str>) -> OpenRouteServiceClient {
        OpenRouteServiceClient::new(&RoutingConfig {
            base_url: "http://localhost:8080/".to_owned(),
            profile: "foot-walking".to_owned(),
            api_key: api_key.map(str::to_owned),
        })
    }

    #[test]
    fn test_directions_url() {
        let origin = Coordinate::new(-27.5, -50.25).unwrap();
        let destination = Coordinate::new(-27.0, -50.0).unwrap();

        let url = client(Some("k3y")).directions_url(origin, destination).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v2/directions/foot-walking?start=-50.25%2C-27.5&end=-50%2C-27&api_key=k3y"
        );

        let url = client(None).directions_url(origin, destination).unwrap();
        assert!(url.query_pairs().all(|(name, _)| name != "api_key"));
    }

    #[test]
    fn test_directions_url_encodes_api_key() {
        let url = client(Some("a&b+c#d=e"))
            .directions_url(Coordinate::new(-27.5, -50.25).unwrap(), Coordinate::new(-27.0, -50.0).unwrap())
            .unwrap();

        assert_eq!(url.fragment(), None);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], ("api_key".to_owned(), "a&b+c#d=e".to_owned()));
        assert_eq!(pairs[0], ("start".to_owned(), "-50.25,-27.5".to_owned()));
    }
}
