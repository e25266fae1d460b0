use actix_web::{get, post, web, HttpResponse};
use image::DynamicImage;
use serde_json::json;

use crate::{
    canvas::{rect_mask, DisplaySize, ScaleMap, Selection},
    config::DimensionBounds,
    error::{EditorError, Result},
    history::ImageVersion,
    imageops::{self, Normalized},
    models::{
        DataUrlResponse, EditImageRequest, EnhanceImageRequest, GenerateImageRequest,
        GenerateRequest, ImageResponse, InpaintRequest, ProxyImageRequest, SearchRequest,
    },
    server::AppState,
};

/// Pinned img2img release used by the enhance route.
const ENHANCE_VERSION: &str = "2b017d9b67edd2ee1401238df49d75da53c523f36e363881e057f5dc3ed3c5b2";
const ENHANCE_DEFAULT_PROMPT: &str = "enhance this image, make it high quality";
const ENHANCE_NEGATIVE_PROMPT: &str =
    "blurry, low quality, watermark, text, bad anatomy, distorted";

/// The two accepted ways to describe the edit region.
#[derive(Debug)]
enum MaskInput<'a> {
    DataUrl(&'a str),
    Selection(Selection, DisplaySize),
}

/// Resolve which mask input the request carries. Exactly one is required;
/// both present, neither present, or a selection without its display size
/// are all invalid requests.
fn mask_input(request: &EditImageRequest) -> Result<MaskInput<'_>> {
    match (&request.mask_data_url, request.selection) {
        (Some(_), Some(_)) => Err(EditorError::InvalidRequest(
            "maskDataUrl and selection are mutually exclusive".into(),
        )),
        (Some(mask_url), None) => Ok(MaskInput::DataUrl(mask_url)),
        (None, Some(selection)) => {
            let display = request.display.ok_or_else(|| {
                EditorError::InvalidRequest(
                    "selection requires the display size it was drawn against".into(),
                )
            })?;
            Ok(MaskInput::Selection(selection, display))
        }
        (None, None) => Err(EditorError::InvalidRequest(
            "either maskDataUrl or selection is required".into(),
        )),
    }
}

fn record_version(state: &AppState, version: ImageVersion) {
    if let Ok(mut history) = state.history.lock() {
        history.append(version);
    }
}

/// The inpainting models only require the minimum-dimension clamp; output is
/// not forced back down to a maximum.
fn min_bounds(state: &AppState) -> DimensionBounds {
    DimensionBounds {
        min: state.config.bounds.min,
        max: None,
    }
}

/// Run the inpainting model against a normalized image. The mask is brought
/// to the image dimensions only when they actually differ. Returns the
/// output as a data URI together with the mask URI that produced it.
async fn run_inpaint(
    state: &AppState,
    normalized: Normalized,
    mask: image::GrayImage,
    prompt: &str,
) -> Result<(String, String)> {
    let mask = if mask.dimensions() != normalized.dimensions() {
        imageops::resize_mask_to(&mask, normalized.dimensions())
    } else {
        mask
    };

    let image_uri = imageops::encode_data_uri(&normalized.image)?;
    let mask_uri = imageops::encode_data_uri(&DynamicImage::ImageLuma8(mask))?;

    let output_url = state
        .replicate
        .generation()
        .inpaint(InpaintRequest {
            prompt: prompt.to_string(),
            image: image_uri,
            mask: mask_uri.clone(),
        })
        .await?;

    // Output keeps the model's dimensions; it is only re-encoded for embedding.
    let final_uri = imageops::fetch_as_data_uri(&output_url, &state.http).await?;
    Ok((final_uri, mask_uri))
}

#[post("/api/replicate/generate-image")]
pub async fn generate_image(
    state: web::Data<AppState>,
    body: web::Json<GenerateImageRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    if request.prompt.is_empty() {
        return Err(EditorError::InvalidRequest("Prompt is required".into()));
    }

    // Image plus mask switches the route to inpainting.
    let image_url = match (request.image, request.mask) {
        (Some(image_source), Some(mask_url)) => {
            let image = imageops::load_image(&image_source, &state.http).await?;
            let normalized = imageops::normalize(image, &min_bounds(&state));
            let mask = imageops::load_mask(&mask_url)?.to_luma8();

            let (final_uri, mask_uri) =
                run_inpaint(&state, normalized, mask, &request.prompt).await?;
            record_version(
                &state,
                ImageVersion::new(final_uri.clone())
                    .with_prompt(&request.prompt)
                    .with_edited_region(mask_uri),
            );
            final_uri
        }
        _ => {
            let output_url = state
                .replicate
                .generation()
                .generate(GenerateRequest::new(&request.prompt))
                .await?;
            record_version(
                &state,
                ImageVersion::new(output_url.clone()).with_prompt(&request.prompt),
            );
            output_url
        }
    };

    Ok(HttpResponse::Ok().json(ImageResponse { image_url }))
}

#[post("/api/replicate/edit-image")]
pub async fn edit_image(
    state: web::Data<AppState>,
    body: web::Json<EditImageRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    log::info!("Processing image edit request, prompt: {:?}", request.prompt);

    let input = mask_input(&request)?;
    let image = imageops::load_image(&request.image_url, &state.http).await?;
    let normalized = imageops::normalize(image, &min_bounds(&state));

    // The mask arrives pre-rendered or as a display-space selection that we
    // map to pixel space and rasterize here.
    let mask = match input {
        MaskInput::DataUrl(mask_url) => imageops::load_mask(mask_url)?.to_luma8(),
        MaskInput::Selection(selection, display) => {
            let mut map = ScaleMap::new(display, normalized.original);
            if normalized.resized {
                map = map.then_resize(normalized.dimensions());
            }
            let rect = map.to_pixels(&selection);
            let (width, height) = normalized.dimensions();
            rect_mask(width, height, &rect)
        }
    };

    let (final_uri, mask_uri) = run_inpaint(&state, normalized, mask, &request.prompt).await?;

    record_version(
        &state,
        ImageVersion::new(final_uri.clone())
            .with_prompt(&request.prompt)
            .with_edited_region(mask_uri),
    );

    log::info!("Image edit completed successfully");
    Ok(HttpResponse::Ok().json(ImageResponse {
        image_url: final_uri,
    }))
}

#[post("/api/replicate/enhance-image")]
pub async fn enhance_image(
    state: web::Data<AppState>,
    body: web::Json<EnhanceImageRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    if request.image_url.is_empty() {
        return Err(EditorError::InvalidRequest("Image URL is required".into()));
    }

    let seed = chrono::Utc::now().timestamp_micros().rem_euclid(1_000_000);
    let input = json!({
        "prompt": request.prompt.as_deref().unwrap_or(ENHANCE_DEFAULT_PROMPT),
        "image": request.image_url,
        "negative_prompt": ENHANCE_NEGATIVE_PROMPT,
        "scheduler": "K_EULER_ANCESTRAL",
        "num_inference_steps": 30,
        "guidance_scale": 7.5,
        "strength": 0.7,
        "seed": seed,
    });

    let output = state
        .replicate
        .predictions()
        .create_and_wait(ENHANCE_VERSION, input)
        .await?;

    Ok(HttpResponse::Ok().json(output))
}

#[post("/api/proxy/image")]
pub async fn proxy_image(
    state: web::Data<AppState>,
    body: web::Json<ProxyImageRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let data_url = imageops::fetch_as_data_uri(&request.image_url, &state.http).await?;

    record_version(&state, ImageVersion::new(data_url.clone()));

    Ok(HttpResponse::Ok().json(DataUrlResponse { data_url }))
}

#[post("/api/youtube/search")]
pub async fn youtube_search(
    state: web::Data<AppState>,
    body: web::Json<SearchRequest>,
) -> Result<HttpResponse> {
    let results = state.search.search_videos(&body.query).await?;
    Ok(HttpResponse::Ok().json(results))
}

#[get("/api/history")]
pub async fn get_history(state: web::Data<AppState>) -> Result<HttpResponse> {
    let history = state
        .history
        .lock()
        .map_err(|_| EditorError::Generation("history unavailable".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "versions": history.versions(),
        "current": history.current().map(|v| v.id.clone()),
    })))
}
