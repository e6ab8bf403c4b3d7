use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// End-user identifier sent with every workflow run. The workflow provider
/// requires one per request; this server acts as a single logical user.
const WORKFLOW_USER: &str = "ocr-extract-server";

/// Client for the workflow provider's `workflows/run` endpoint.
pub struct WorkflowClient {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    inputs: RunInputs<'a>,
    response_mode: &'static str,
    user: &'static str,
}

#[derive(Serialize)]
struct RunInputs<'a> {
    ocr_text: &'a str,
    user_prompt: &'a str,
}

#[derive(Deserialize, Default)]
struct RunResponse {
    #[serde(default)]
    data: RunData,
}

#[derive(Deserialize, Default)]
struct RunData {
    #[serde(default)]
    outputs: Map<String, Value>,
}

impl WorkflowClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run the extraction workflow over detected text and return the
    /// normalized answer string.
    pub async fn run(&self, ocr_text: &str, user_prompt: &str) -> Result<String, ExtractError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ExtractError::NotConfigured("workflow provider key"))?;

        let url = format!("{}/workflows/run", self.base_url);
        let request = RunRequest {
            inputs: RunInputs {
                ocr_text,
                user_prompt,
            },
            response_mode: "blocking",
            user: WORKFLOW_USER,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "workflow provider returned an error");
            return Err(ExtractError::upstream(
                "workflow provider",
                status.as_u16(),
                body,
            ));
        }

        let run: RunResponse = response.json().await?;
        let answer = normalize_outputs(&run.data.outputs)?;
        debug!(chars = answer.len(), "workflow provider returned an answer");
        Ok(answer)
    }
}

/// `outputs.result` is the contractual answer field. Anything else, a
/// missing field included, is surfaced by serializing the whole outputs
/// mapping so the caller still sees what the workflow produced.
fn normalize_outputs(outputs: &Map<String, Value>) -> Result<String, ExtractError> {
    match outputs.get("result") {
        Some(Value::String(result)) => Ok(result.clone()),
        _ => serde_json::to_string(outputs)
            .map_err(|e| ExtractError::Internal(format!("unserializable workflow outputs: {e}"))),
    }
}
