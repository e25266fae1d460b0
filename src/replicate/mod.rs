pub mod generation_client;
pub mod prediction_client;

pub use generation_client::{classify_upstream_error, first_output_url, GenerationClient};
pub use prediction_client::PredictionClient;

use crate::config::ReplicateConfig;

/// Entry point to the Replicate API, built once at process start and injected
/// into request handlers. A missing credential is tolerated here; each call
/// fails fast with a configuration error before touching the network.
#[derive(Clone)]
pub struct ReplicateClient {
    generation_client: GenerationClient,
    prediction_client: PredictionClient,
}

impl ReplicateClient {
    pub fn new(config: ReplicateConfig) -> Self {
        if config.api_token.is_none() {
            log::warn!("⚠️  No Replicate API token configured, generation calls will fail with 401");
        }

        let http = reqwest::Client::new();

        Self {
            generation_client: GenerationClient::new(http.clone(), &config),
            prediction_client: PredictionClient::new(http, &config),
        }
    }

    /// Single-shot "run" mode: one synchronous upstream call per generation.
    pub fn generation(&self) -> &GenerationClient {
        &self.generation_client
    }

    /// Deferred mode: create a prediction job and poll it to completion.
    pub fn predictions(&self) -> &PredictionClient {
        &self.prediction_client
    }
}
