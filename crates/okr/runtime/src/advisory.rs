//! Key result advisory
//!
//! An external language model judges whether a key result reads as a
//! measurable outcome. The verdict is advice only: it never blocks a save,
//! and every failure degrades to [`AdvisoryOutcome::Unavailable`].

use std::sync::Arc;

use async_trait::async_trait;
use okr_types::{AdvisoryConfig, OkrError, OkrResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SKIPPED_FEEDBACK: &str = "AI validation skipped. API key not configured.";

const SYSTEM_INSTRUCTION: &str = "You are an expert OKR (Objectives and Key Results) coach. \
Analyze a user-provided Key Result description. A good Key Result is a measurable OUTCOME, \
not a task or activity. It must be quantifiable and verifiable. \
Respond ONLY with a JSON object of the form {\"isValid\": boolean, \"feedback\": string}, \
where feedback is one concise sentence explaining the verdict and, for a weak Key Result, \
what outcome it should focus on instead. Do not include any other text or markdown.";

/// The model's judgement of one key result description
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryVerdict {
    pub is_valid: bool,
    pub feedback: String,
}

impl AdvisoryVerdict {
    pub fn skipped() -> Self {
        Self {
            is_valid: true,
            feedback: SKIPPED_FEEDBACK.to_string(),
        }
    }
}

/// What the editor shows next to a key result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvisoryOutcome {
    Verdict(AdvisoryVerdict),
    /// The advisor could not be reached or answered nonsense
    Unavailable(String),
}

impl AdvisoryOutcome {
    pub fn verdict(&self) -> Option<&AdvisoryVerdict> {
        match self {
            AdvisoryOutcome::Verdict(verdict) => Some(verdict),
            AdvisoryOutcome::Unavailable(_) => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, AdvisoryOutcome::Unavailable(_))
    }
}

/// Anything that can assess a key result description
#[async_trait]
pub trait KeyResultAdvisor: Send + Sync {
    async fn assess(&self, description: &str) -> OkrResult<AdvisoryVerdict>;
}

/// Request handed to the model transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
    pub response_mime_type: String,
    pub temperature: f32,
}

/// Raw model output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub output_text: String,
}

/// Wire-level access to the model
#[async_trait]
pub trait AdvisoryTransport: Send + Sync {
    async fn complete(&self, request: &AdvisoryRequest, api_key: &str) -> OkrResult<AdvisoryResponse>;
}

/// Transport that is never reachable. Plug a real one in with
/// [`ModelAdvisor::with_transport`].
#[derive(Debug, Default)]
pub struct NoopTransport;

#[async_trait]
impl AdvisoryTransport for NoopTransport {
    async fn complete(&self, _request: &AdvisoryRequest, _api_key: &str) -> OkrResult<AdvisoryResponse> {
        Err(OkrError::ValidationUnavailable(
            "advisory transport not configured".into(),
        ))
    }
}

/// Advisor backed by a hosted language model
#[derive(Clone)]
pub struct ModelAdvisor {
    config: AdvisoryConfig,
    api_key: Option<String>,
    transport: Arc<dyn AdvisoryTransport>,
}

impl std::fmt::Debug for ModelAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdvisor")
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ModelAdvisor {
    /// Read the API key from the configured environment variable
    pub fn from_env(config: AdvisoryConfig) -> Self {
        let api_key = config.api_key();
        Self::with_transport(config, api_key, Arc::new(NoopTransport))
    }

    pub fn with_transport(
        config: AdvisoryConfig,
        api_key: Option<String>,
        transport: Arc<dyn AdvisoryTransport>,
    ) -> Self {
        Self {
            config,
            api_key,
            transport,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_for(&self, description: &str) -> AdvisoryRequest {
        AdvisoryRequest {
            model: self.config.model.clone(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: format!("Analyze this Key Result: \"{}\"", description),
            response_mime_type: "application/json".to_string(),
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl KeyResultAdvisor for ModelAdvisor {
    async fn assess(&self, description: &str) -> OkrResult<AdvisoryVerdict> {
        let Some(api_key) = &self.api_key else {
            debug!("No advisory API key; skipping");
            return Ok(AdvisoryVerdict::skipped());
        };

        let request = self.request_for(description);
        let response = self.transport.complete(&request, api_key).await?;
        parse_verdict(&response.output_text)
    }
}

/// Parse model output, tolerating a surrounding Markdown code fence
pub fn parse_verdict(output: &str) -> OkrResult<AdvisoryVerdict> {
    let body = strip_code_fence(output.trim());
    serde_json::from_str(body)
        .map_err(|e| OkrError::ValidationUnavailable(format!("unreadable advisory response: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening line
    let inner = match inner.find('\n') {
        Some(newline) if inner[..newline].chars().all(|c| c.is_alphanumeric()) => &inner[newline + 1..],
        _ => inner,
    };
    inner.trim()
}

/// Ask the advisor, turning every failure into `Unavailable`
pub async fn advise(advisor: Option<&dyn KeyResultAdvisor>, description: &str) -> AdvisoryOutcome {
    let description = description.trim();
    if description.is_empty() {
        return AdvisoryOutcome::Unavailable("nothing to assess".into());
    }
    let Some(advisor) = advisor else {
        return AdvisoryOutcome::Unavailable("no advisor configured".into());
    };

    match advisor.assess(description).await {
        Ok(verdict) => AdvisoryOutcome::Verdict(verdict),
        Err(e) => {
            warn!(error = %e, "Key result advisory failed");
            AdvisoryOutcome::Unavailable(e.to_string())
        }
    }
}
