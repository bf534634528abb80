use geojson::{Feature, GeoJson};
use tracing::warn;

/// Fetch a GeoJSON feature collection from `url`.
///
/// Fetch errors are non-fatal by design: a network failure, non-success
/// status, or unparseable body yields an empty feature list so the caller
/// can still produce the manual hotspot set. Each failure is logged as a
/// warning.
pub async fn fetch_features(client: &reqwest::Client, url: &str) -> Vec<Feature> {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("failed to fetch {}: {}", url, e);
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        warn!("fetch of {} returned status {}", url, response.status());
        return Vec::new();
    }

    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            warn!("failed to read body of {}: {}", url, e);
            return Vec::new();
        }
    };

    parse_features(&body, url)
}

fn parse_features(body: &str, url: &str) -> Vec<Feature> {
    match body.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(fc)) => fc.features,
        Ok(_) => {
            warn!("{} is valid GeoJSON but not a FeatureCollection", url);
            Vec::new()
        }
        Err(e) => {
            warn!("failed to parse GeoJSON from {}: {}", url, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collection() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [80.0, 13.0] },
                    "properties": { "name": "Test" }
                }
            ]
        }"#;
        let features = parse_features(body, "test://payload");
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn malformed_body_yields_empty_list() {
        assert!(parse_features("not geojson at all", "test://bad").is_empty());
        assert!(parse_features("", "test://empty").is_empty());
    }

    #[test]
    fn bare_geometry_yields_empty_list() {
        // Valid GeoJSON but not a FeatureCollection.
        let body = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(parse_features(body, "test://point").is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_empty_list() {
        let client = reqwest::Client::new();
        // Port 1 is unassigned; the connection is refused immediately.
        let features = fetch_features(&client, "http://127.0.0.1:1/hazards.geojson").await;
        assert!(features.is_empty());
    }
}
