pub mod canvas;
pub mod config;
pub mod error;
pub mod history;
pub mod imageops;
pub mod logger;
pub mod models;
pub mod replicate;
pub mod search;
#[cfg(feature = "server")]
pub mod server;

pub use canvas::{DisplaySize, MaskCanvas, PixelRect, ScaleMap, Selection};
pub use config::{Config, DimensionBounds, ReplicateConfig, SearchConfig};
pub use error::{EditorError, Result};
pub use history::{ImageVersion, VersionHistory};
pub use models::{GenerateRequest, InpaintRequest, Prediction, PredictionStatus, VideoResult};
pub use replicate::{GenerationClient, PredictionClient, ReplicateClient};
pub use search::SearchClient;
