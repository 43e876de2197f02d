pub mod client;
pub mod error;
pub mod prompts;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use self::client::GenerationClient;
use self::error::GenerateError;

/// Document body used when the text step fails. Creation still succeeds.
pub const PRD_FALLBACK: &str = "Failed to generate the PRD document. Please try again.";

pub const PRD_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResult {
    pub prd: String,
    pub image_url: Option<String>,
}

/// Runs the two generation steps in sequence: PRD text, then app icon.
///
/// Neither step aborts the workflow. A failed text step substitutes
/// [`PRD_FALLBACK`] and still runs the icon step; a failed or empty icon
/// step simply leaves the icon absent.
pub async fn generate_app_project(
    client: &dyn GenerationClient,
    text_model: &str,
    image_model: &str,
    name: &str,
    description: &str,
) -> GenerateResult {
    let prd = match client
        .generate_text(text_model, &prompts::prd_prompt(name, description), PRD_TEMPERATURE)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            log_step_failure("prd", &e);
            PRD_FALLBACK.to_string()
        }
    };

    let image_url = match client
        .generate_image(image_model, &prompts::icon_prompt(name, description))
        .await
    {
        Ok(parts) => first_inline_image(&parts),
        Err(e) => {
            log_step_failure("icon", &e);
            None
        }
    };

    GenerateResult { prd, image_url }
}

/// Builds a data URI from the first part carrying a decodable inline
/// payload. Media type defaults to image/png when the service omits it.
fn first_inline_image(parts: &[client::MediaPart]) -> Option<String> {
    for part in parts {
        let Some(data) = part.data.as_deref() else {
            continue;
        };
        match BASE64.decode(data) {
            Ok(bytes) => {
                let mime = part.mime_type.as_deref().unwrap_or("image/png");
                tracing::debug!(mime, bytes = bytes.len(), "Decoded generated icon");
                return Some(format!("data:{mime};base64,{data}"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable inline image payload");
            }
        }
    }
    None
}

// Transport problems are worth a warning; the service declining to answer
// is expected often enough to stay at info.
fn log_step_failure(step: &str, error: &GenerateError) {
    match error {
        GenerateError::EmptyResponse => {
            tracing::info!(step, "Generation service returned no content");
        }
        _ => {
            tracing::warn!(step, error = %error, "Generation step failed");
        }
    }
}
