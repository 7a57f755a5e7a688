use base64::Engine;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::ImageGenConfig;
use crate::error::{AppError, AppResult};

const BASE_PROMPT: &str = "Generate a high-quality, photorealistic image of the first person wearing the clothing/accessories shown in the other reference images. \
Maintain the exact facial features, skin tone, hairstyle, and body type of the first person. \
Only change their outfit to match the provided catalog items while keeping their identity intact. \
The image should look natural and realistic, with appropriate lighting and background.";

/// Everything needed for one "generate" action
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub user_photo: PathBuf,
    /// Full-resolution source images, never thumbnails
    pub items: Vec<PathBuf>,
    pub prompt_addon: String,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

/// The base prompt, with the user's extra instructions on their own line
pub fn build_prompt(addon: &str) -> String {
    let addon = addon.trim();
    if addon.is_empty() {
        BASE_PROMPT.to_string()
    } else {
        format!("{}\n{}", BASE_PROMPT, addon)
    }
}

/// Image-edits endpoint for the configured deployment
pub fn edits_url(config: &ImageGenConfig) -> String {
    let base = if config.endpoint.trim().is_empty() {
        format!("https://{}.openai.azure.com", config.resource)
    } else {
        config.endpoint.trim().trim_end_matches('/').to_string()
    };
    format!(
        "{}/openai/deployments/{}/images/edits?api-version={}",
        base, config.deployment, config.api_version
    )
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

async fn image_part(path: &Path) -> AppResult<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    Ok(Part::bytes(bytes).file_name(name).mime_str(mime_for(path))?)
}

/// Send the user photo and selected items to the image-edits API and save
/// the returned picture in `output_dir`. No retries.
pub async fn generate_try_on(
    config: ImageGenConfig,
    request: TryOnRequest,
    output_dir: PathBuf,
) -> AppResult<PathBuf> {
    config.validate()?;

    let mut form = Form::new().part("image[]", image_part(&request.user_photo).await?);
    for item in &request.items {
        form = form.part("image[]", image_part(item).await?);
    }
    form = form
        .text("prompt", build_prompt(&request.prompt_addon))
        .text("n", "1")
        .text("size", config.image_size.clone())
        .text("quality", config.quality.clone());

    let url = edits_url(&config);
    info!("🎨 Requesting try-on image with {} items", request.items.len());
    debug!("POST {}", url);

    let response = reqwest::Client::new()
        .post(&url)
        .header("api-key", &config.api_key)
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AppError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let image_bytes = decode_response(&body)?;

    // Decoding and re-encoding is CPU bound
    tokio::task::spawn_blocking(move || save_generated_image(&image_bytes, &output_dir))
        .await
        .map_err(|e| AppError::Join(e.to_string()))?
}

/// Pull the first base64 image out of an image-edits response body
pub fn decode_response(body: &str) -> AppResult<Vec<u8>> {
    let response: ImagesResponse =
        serde_json::from_str(body).map_err(|e| AppError::Response(e.to_string()))?;
    let b64 = response
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .ok_or_else(|| AppError::Response("no image data in response".to_string()))?;

    base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| AppError::Response(format!("invalid base64 image: {}", e)))
}

/// Validate the bytes as an image and store it as `generated_<id>.png`
pub fn save_generated_image(bytes: &[u8], output_dir: &Path) -> AppResult<PathBuf> {
    let img = image::load_from_memory(bytes)?;

    std::fs::create_dir_all(output_dir).map_err(|e| AppError::io(output_dir, e))?;
    let id = Uuid::new_v4().simple().to_string();
    let path = output_dir.join(format!("generated_{}.png", &id[..8]));
    img.save_with_format(&path, image::ImageFormat::Png)?;

    info!("✅ Saved try-on image: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::from_pixel(4, 6, Rgb([1, 2, 3]))
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_build_prompt() {
        assert_eq!(build_prompt(""), BASE_PROMPT);
        assert_eq!(build_prompt("   "), BASE_PROMPT);
        assert_eq!(
            build_prompt("Add a beach background"),
            format!("{}\nAdd a beach background", BASE_PROMPT)
        );
    }

    #[test]
    fn test_edits_url() {
        let mut config = ImageGenConfig {
            resource: "myres".to_string(),
            deployment: "gpt-image-1".to_string(),
            ..ImageGenConfig::default()
        };
        assert_eq!(
            edits_url(&config),
            "https://myres.openai.azure.com/openai/deployments/gpt-image-1/images/edits?api-version=2025-04-01-preview"
        );

        config.endpoint = "https://custom.example.com/".to_string();
        assert_eq!(
            edits_url(&config),
            "https://custom.example.com/openai/deployments/gpt-image-1/images/edits?api-version=2025-04-01-preview"
        );
    }

    #[test]
    fn test_decode_response() {
        let bytes = png_bytes();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let body = format!(r#"{{"created": 1, "data": [{{"b64_json": "{}"}}]}}"#, b64);

        assert_eq!(decode_response(&body).unwrap(), bytes);
    }

    #[test]
    fn test_decode_response_errors() {
        assert!(matches!(decode_response("{}"), Err(AppError::Response(_))));
        assert!(matches!(
            decode_response(r#"{"data": []}"#),
            Err(AppError::Response(_))
        ));
        assert!(matches!(
            decode_response(r#"{"data": [{"b64_json": "%%%"}]}"#),
            Err(AppError::Response(_))
        ));
    }

    #[test]
    fn test_save_generated_image() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated_images");

        let path = save_generated_image(&png_bytes(), &out).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("generated_") && name.ends_with(".png"));
        assert_eq!(image::open(&path).unwrap().width(), 4);

        assert!(matches!(
            save_generated_image(b"garbage", &out),
            Err(AppError::Image(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_requires_credentials() {
        let request = TryOnRequest {
            user_photo: PathBuf::from("me.png"),
            items: vec![PathBuf::from("catalog/clothing/red_dress.png")],
            prompt_addon: String::new(),
        };
        let result = generate_try_on(ImageGenConfig::default(), request, PathBuf::from("out")).await;
        assert!(matches!(result, Err(AppError::MissingSetting(_))));
    }
}
