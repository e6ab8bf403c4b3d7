use crate::error::ExtractError;
use crate::image_prep::EmbeddableImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Client for the OCR provider's `images:annotate` endpoint.
pub struct VisionClient {
    api_key: Option<String>,
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateEntry<'a>>,
}

#[derive(Serialize)]
struct AnnotateEntry<'a> {
    image: ImageContent<'a>,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize, Default)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
}

#[derive(Deserialize, Default)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

impl VisionClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run text detection on a prepared image.
    ///
    /// Returns the detected text, which may be empty; the caller decides
    /// what an empty detection means.
    pub async fn detect_text(&self, image: &EmbeddableImage) -> Result<String, ExtractError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ExtractError::NotConfigured("OCR provider key"))?;

        let request = AnnotateRequest {
            requests: vec![AnnotateEntry {
                image: ImageContent {
                    content: &image.base64_payload,
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "OCR provider returned an error");
            return Err(ExtractError::upstream(
                "OCR provider",
                status.as_u16(),
                body,
            ));
        }

        let annotate: AnnotateResponse = response.json().await?;
        let text = first_annotation(annotate);
        debug!(chars = text.len(), "OCR provider returned text");
        Ok(text)
    }
}

/// The first annotation of the first response carries the full detected
/// text; an absent or empty annotation array means nothing was detected.
fn first_annotation(response: AnnotateResponse) -> String {
    response
        .responses
        .into_iter()
        .next()
        .and_then(|r| r.text_annotations.into_iter().next())
        .map(|a| a.description)
        .unwrap_or_default()
}
