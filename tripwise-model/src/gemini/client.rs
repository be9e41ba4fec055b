use super::wire::{
    GenerateContentBody, GenerateContentResponse, WireContent, WireErrorEnvelope,
    WireFunctionCall, WireFunctionResponse, WireGenerationConfig, WirePart, WireTool,
};
use crate::retry::{RetryPolicy, execute_with_retry};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tripwise_core::{
    Content, FinishReason, GroundingChunk, GroundingMetadata, Llm, LlmRequest, LlmResponse, Part,
    Result, TripwiseError, UsageMetadata,
};
use tripwise_telemetry::Instrument;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini over the public REST API, with every call wrapped in a [`RetryPolicy`].
pub struct GeminiModel {
    http: reqwest::Client,
    api_key: String,
    model_name: String,
    base_url: String,
    retry_policy: Arc<RetryPolicy>,
}

impl std::fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiModel")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TripwiseError::Config("Gemini API key is empty".into()));
        }
        Ok(Self {
            http: build_client(DEFAULT_TIMEOUT)?,
            api_key,
            model_name: model.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            retry_policy: Arc::new(RetryPolicy::default()),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, policy: Arc<RetryPolicy>) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_client(timeout)?;
        Ok(self)
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model.trim_start_matches("models/"))
    }

    async fn send_once(&self, url: &str, body: &GenerateContentBody) -> Result<LlmResponse> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| TripwiseError::Model(format!("request to Gemini failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(TripwiseError::Http {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TripwiseError::Model(format!("invalid Gemini response: {e}")))?;
        Ok(convert_response(parsed))
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TripwiseError::Config(format!("failed to build HTTP client: {e}")))
}

fn error_message(raw: &str) -> String {
    match serde_json::from_str::<WireErrorEnvelope>(raw) {
        Ok(envelope) => match (envelope.error.status, envelope.error.message) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => raw.to_string(),
        },
        Err(_) if raw.is_empty() => "no response body".to_string(),
        Err(_) => raw.to_string(),
    }
}

fn to_wire_content(content: &Content) -> WireContent {
    let parts = content
        .parts
        .iter()
        .map(|part| match part {
            Part::Text { text } => WirePart { text: Some(text.clone()), ..Default::default() },
            Part::FunctionCall { name, args } => WirePart {
                function_call: Some(WireFunctionCall { name: name.clone(), args: args.clone() }),
                ..Default::default()
            },
            Part::FunctionResponse { function_response } => WirePart {
                function_response: Some(WireFunctionResponse {
                    name: function_response.name.clone(),
                    response: function_response.response.clone(),
                }),
                ..Default::default()
            },
        })
        .collect();
    WireContent { role: Some(content.role.clone()), parts }
}

fn build_body(req: &LlmRequest) -> GenerateContentBody {
    let generation_config = req.config.as_ref().map(|c| WireGenerationConfig {
        temperature: c.temperature,
        top_p: c.top_p,
        top_k: c.top_k,
        max_output_tokens: c.max_output_tokens,
        response_mime_type: c.response_mime_type.clone(),
        response_schema: c.response_schema.clone(),
    });

    let mut tools = Vec::new();
    if req.uses_google_search() {
        tools.push(WireTool::GoogleSearch(serde_json::json!({})));
    }
    let mut declarations: Vec<_> = req
        .tools
        .iter()
        .filter(|(name, _)| name.as_str() != tripwise_core::GOOGLE_SEARCH_TOOL)
        .map(|(_, decl)| decl.clone())
        .collect();
    if !declarations.is_empty() {
        declarations.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        tools.push(WireTool::FunctionDeclarations(declarations));
    }

    GenerateContentBody {
        contents: req.contents.iter().map(to_wire_content).collect(),
        system_instruction: req.system_instruction.as_ref().map(|text| WireContent {
            role: None,
            parts: vec![WirePart { text: Some(text.clone()), ..Default::default() }],
        }),
        generation_config,
        tools,
    }
}

fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        _ => FinishReason::Other,
    }
}

fn convert_response(resp: GenerateContentResponse) -> LlmResponse {
    let candidate = resp.candidates.into_iter().next();

    let (content, finish_reason, grounding_metadata) = match candidate {
        Some(c) => {
            let content = c.content.map(|wire| Content {
                role: wire.role.unwrap_or_else(|| tripwise_core::ROLE_MODEL.to_string()),
                parts: wire
                    .parts
                    .into_iter()
                    .filter_map(|p| {
                        if let Some(call) = p.function_call {
                            Some(Part::FunctionCall { name: call.name, args: call.args })
                        } else {
                            p.text.map(|text| Part::Text { text })
                        }
                    })
                    .collect(),
            });
            let grounding = c.grounding_metadata.map(|g| GroundingMetadata {
                web_search_queries: g.web_search_queries,
                grounding_chunks: g
                    .grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .map(|web| GroundingChunk { uri: web.uri, title: web.title })
                    .collect(),
            });
            (content, c.finish_reason.as_deref().map(convert_finish_reason), grounding)
        }
        None => (None, None, None),
    };

    let usage_metadata = resp.usage_metadata.map(|u| UsageMetadata {
        prompt_token_count: u.prompt_token_count.unwrap_or(0),
        candidates_token_count: u.candidates_token_count.unwrap_or(0),
        total_token_count: u.total_token_count.unwrap_or(0),
    });

    LlmResponse {
        content,
        usage_metadata,
        finish_reason,
        grounding_metadata,
        partial: false,
        turn_complete: true,
        error_code: None,
        error_message: None,
    }
}

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn generate_content(&self, req: LlmRequest) -> Result<LlmResponse> {
        let model = if req.model.is_empty() { self.model_name.clone() } else { req.model.clone() };
        let url = self.endpoint(&model);
        let body = build_body(&req);

        let span = tripwise_telemetry::model_call_span(&model);
        execute_with_retry(&self.retry_policy, || self.send_once(&url, &body))
            .instrument(span)
            .await
    }
}
