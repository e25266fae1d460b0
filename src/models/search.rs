use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(rename = "static")]
    pub static_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
}

/// One video hit, reduced to the fields the editor surface consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResult {
    pub title: String,
    pub thumbnail: Thumbnail,
    pub link: String,
    pub channel: Channel,
    #[serde(default)]
    pub views: u64,
}
