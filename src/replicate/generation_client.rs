use serde_json::{json, Value};

use crate::{
    config::ReplicateConfig,
    error::{EditorError, Result},
    models::{GenerateRequest, InpaintRequest},
};

/// Pinned SDXL release for text-to-image.
const TEXT_TO_IMAGE_VERSION: &str =
    "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";
/// Official model path for mask-guided inpainting.
const INPAINT_MODEL: &str = "ideogram-ai/ideogram-v2-turbo";

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

/// Single-shot generation calls (`Prefer: wait`): the upstream holds the
/// connection until the prediction settles, no client-side polling involved.
#[derive(Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    api_base: String,
    api_token: Option<String>,
}

impl GenerationClient {
    pub(crate) fn new(http: reqwest::Client, config: &ReplicateConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            api_token: config.api_token.clone(),
        }
    }

    fn token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .ok_or_else(|| EditorError::Configuration("Replicate API token not configured".into()))
    }

    /// Text-to-image. Returns the URL of the generated image.
    pub async fn generate(&self, request: GenerateRequest) -> Result<String> {
        let input = json!({
            "prompt": request.prompt,
            "width": request.width.unwrap_or(DEFAULT_WIDTH),
            "height": request.height.unwrap_or(DEFAULT_HEIGHT),
        });
        log::info!("Generating image, prompt: {:?}", request.prompt);
        let url = format!("{}/predictions", self.api_base);
        self.run(&url, json!({ "version": TEXT_TO_IMAGE_VERSION, "input": input }))
            .await
    }

    /// Mask-guided edit. `image` and `mask` are same-size PNG data URIs;
    /// white mask pixels mark the region to regenerate.
    pub async fn inpaint(&self, request: InpaintRequest) -> Result<String> {
        let input = json!({
            "prompt": request.prompt,
            "image": request.image,
            "mask": request.mask,
            "num_outputs": 1,
            "guidance_scale": 7.5,
            "num_inference_steps": 50,
            "safety_checker": true,
        });
        log::info!("Inpainting image, prompt: {:?}", request.prompt);
        let url = format!("{}/models/{}/predictions", self.api_base, INPAINT_MODEL);
        self.run(&url, json!({ "input": input })).await
    }

    async fn run(&self, url: &str, body: Value) -> Result<String> {
        let token = self.token()?;

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Token {}", token))
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| EditorError::Generation(e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| EditorError::Generation(format!("unreadable upstream response: {}", e)))?;

        if !status.is_success() {
            let detail = payload
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("upstream request failed")
                .to_string();
            log::error!("Generation call failed ({}): {}", status, detail);
            return Err(classify_upstream_error(detail));
        }

        if let Some(error) = payload.get("error").and_then(Value::as_str) {
            log::error!("Prediction reported error: {}", error);
            return Err(classify_upstream_error(error.to_string()));
        }

        first_output_url(payload.get("output"))
    }
}

/// Re-signal content-policy rejections distinctly from generic upstream
/// failures. The marker is case-sensitive, matching the upstream wording.
pub fn classify_upstream_error(detail: String) -> EditorError {
    if detail.contains("NSFW") {
        log::warn!("NSFW content detected by upstream");
        EditorError::ContentPolicy(detail)
    } else {
        EditorError::Generation(detail)
    }
}

/// Normalize the heterogeneous output field: a bare URL string or an array
/// of URLs, of which the first is taken.
pub fn first_output_url(output: Option<&Value>) -> Result<String> {
    match output {
        Some(Value::String(url)) if !url.is_empty() => Ok(url.clone()),
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(EditorError::EmptyOutput),
        _ => Err(EditorError::EmptyOutput),
    }
}
