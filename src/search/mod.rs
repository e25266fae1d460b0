use serde_json::Value;

use crate::{
    config::SearchConfig,
    error::{EditorError, Result},
    models::{Channel, Thumbnail, VideoResult},
};

/// SerpAPI YouTube search passthrough. The key always comes from
/// configuration; calls without one fail with a configuration error.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Self {
        if config.api_key.is_none() {
            log::warn!("⚠️  No search API key configured, video search will fail with 401");
        }

        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key,
        }
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| EditorError::Configuration("Search API key not configured".into()))
    }

    pub async fn search_videos(&self, query: &str) -> Result<Vec<VideoResult>> {
        let key = self.key()?;
        log::info!("Searching videos: {:?}", query);

        let response = self
            .http
            .get(format!("{}/search.json", self.api_base))
            .query(&[("engine", "youtube"), ("search_query", query), ("api_key", key)])
            .send()
            .await
            .map_err(|e| EditorError::UpstreamFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EditorError::UpstreamFetch(format!(
                "search upstream returned status {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| EditorError::UpstreamFetch(format!("unreadable search response: {}", e)))?;

        Ok(transform_results(&payload))
    }
}

/// Reduce the raw search payload to the fields the editor consumes. A missing
/// result list maps to an empty vec; the thumbnail may arrive as an object
/// with a `static` field or as a bare URL string.
pub fn transform_results(payload: &Value) -> Vec<VideoResult> {
    let Some(items) = payload.get("video_results").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|video| {
            let thumbnail = video
                .get("thumbnail")
                .and_then(|t| t.get("static").and_then(Value::as_str).or_else(|| t.as_str()))?;
            Some(VideoResult {
                title: video.get("title")?.as_str()?.to_string(),
                thumbnail: Thumbnail {
                    static_url: thumbnail.to_string(),
                },
                link: video.get("link")?.as_str()?.to_string(),
                channel: Channel {
                    name: video
                        .get("channel")
                        .and_then(|c| c.get("name"))
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string(),
                },
                views: video.get("views").and_then(Value::as_u64).unwrap_or(0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_maps_nested_thumbnail() {
        let payload = json!({
            "video_results": [{
                "title": "Studio lighting basics",
                "thumbnail": { "static": "https://i.ytimg.com/vi/xyz/hq.jpg" },
                "link": "https://www.youtube.com/watch?v=xyz",
                "channel": { "name": "Film Riot" },
                "views": 12345
            }]
        });
        let results = transform_results(&payload);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].thumbnail.static_url, "https://i.ytimg.com/vi/xyz/hq.jpg");
        assert_eq!(results[0].views, 12345);
    }

    #[test]
    fn test_transform_accepts_bare_thumbnail_string_and_missing_views() {
        let payload = json!({
            "video_results": [{
                "title": "Untitled",
                "thumbnail": "https://i.ytimg.com/vi/abc/hq.jpg",
                "link": "https://www.youtube.com/watch?v=abc",
                "channel": { "name": "Someone" }
            }]
        });
        let results = transform_results(&payload);
        assert_eq!(results[0].views, 0);
        assert_eq!(results[0].thumbnail.static_url, "https://i.ytimg.com/vi/abc/hq.jpg");
    }

    #[test]
    fn test_missing_result_list_is_empty() {
        assert!(transform_results(&json!({})).is_empty());
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        let client = SearchClient::new(SearchConfig::new());
        let err = client.key().unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
