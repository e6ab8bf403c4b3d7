//! Two-stage extraction: OCR first, then the workflow run over the detected
//! text. The stages are strictly sequential because the workflow's only
//! input is the OCR output.

use crate::config::Config;
use crate::error::ExtractError;
use crate::image_prep::EmbeddableImage;
use crate::providers::vision::VisionClient;
use crate::providers::workflow::WorkflowClient;
use tracing::info;

/// Instruction sent to the workflow when the client does not supply one.
pub const DEFAULT_INSTRUCTION: &str = "抽出してください";

pub struct Orchestrator {
    ocr: VisionClient,
    workflow: WorkflowClient,
}

impl Orchestrator {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            ocr: VisionClient::new(
                http.clone(),
                config.ocr_api_key.clone(),
                config.ocr_endpoint.clone(),
            ),
            workflow: WorkflowClient::new(
                http,
                config.workflow_api_key.clone(),
                config.workflow_base_url.clone(),
            ),
        }
    }

    pub fn ocr_configured(&self) -> bool {
        self.ocr.is_configured()
    }

    pub fn workflow_configured(&self) -> bool {
        self.workflow.is_configured()
    }

    pub fn workflow_base_url(&self) -> &str {
        self.workflow.base_url()
    }

    /// Run the full extraction over a prepared image.
    ///
    /// Credentials for both providers are checked before the first network
    /// call. An empty detection stops the chain; the workflow is only
    /// called with non-empty text.
    pub async fn extract(
        &self,
        image: &EmbeddableImage,
        instruction: Option<&str>,
    ) -> Result<String, ExtractError> {
        if image.base64_payload.is_empty() {
            return Err(ExtractError::MissingImage);
        }
        if !self.ocr.is_configured() {
            return Err(ExtractError::NotConfigured("OCR provider key"));
        }
        if !self.workflow.is_configured() {
            return Err(ExtractError::NotConfigured("workflow provider key"));
        }

        let text = self.ocr.detect_text(image).await?;
        if text.trim().is_empty() {
            return Err(ExtractError::NoTextDetected);
        }
        info!(chars = text.len(), "text detected, running workflow");

        let instruction = match instruction {
            Some(prompt) if !prompt.trim().is_empty() => prompt,
            _ => DEFAULT_INSTRUCTION,
        };
        self.workflow.run(&text, instruction).await
    }
}
