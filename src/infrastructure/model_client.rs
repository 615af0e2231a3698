//! HTTP chat-completions backend adapter.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint, instructs
//! the model to answer with a strict JSON document, and converts that
//! document into a [`CompatibilityReport`]. Every failure mode maps to
//! a [`BackendError`]; the orchestrator turns those into local
//! fallbacks.

use serde::{Deserialize, Serialize};

use crate::application::ports::{AnalysisBackend, BackendError};
use crate::domain::compat::{
    clamp_score, CompatibilityLevel, CompatibilityReport, MatchInput, Zodiac,
};
use crate::domain::fallback::{default_tips, pick_fun_tags};

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ModelClientConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token, sent when present.
    pub api_key: Option<String>,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request timeout.
    pub timeout: std::time::Duration,
}

impl Default for ModelClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"
                .to_string(),
            api_key: None,
            model: "qwen-plus".to_string(),
            temperature: 0.8,
            timeout: std::time::Duration::from_secs(60),
        }
    }
}

/// Chat-completions client implementing [`AnalysisBackend`].
#[derive(Debug, Clone)]
pub struct ModelClient {
    http: reqwest::Client,
    config: ModelClientConfig,
}

impl ModelClient {
    /// Create a client with the given settings.
    pub fn new(config: ModelClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client with a caller-supplied reqwest client, for
    /// connection pooling or proxy setups.
    pub fn with_http(http: reqwest::Client, config: ModelClientConfig) -> Self {
        Self { http, config }
    }
}

impl AnalysisBackend for ModelClient {
    async fn analyze(&self, input: &MatchInput) -> Result<CompatibilityReport, BackendError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(input),
            }],
            temperature: self.config.temperature,
        };

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .timeout(self.config.timeout)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.config.timeout)
            } else {
                BackendError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: status_message(status.as_u16()),
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| BackendError::Malformed("no choices in response".to_string()))?;

        parse_report(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Lenient shape of the model's JSON answer. Everything is optional;
/// required fields are enforced after deserialization so one bad field
/// produces a precise error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportPayload {
    pet_zodiac: Option<String>,
    compatibility_score: Option<i64>,
    compatibility_level: Option<String>,
    analysis: Option<String>,
    tips: Option<serde_json::Value>,
    story: Option<String>,
    fun_tags: Option<serde_json::Value>,
}

fn build_prompt(input: &MatchInput) -> String {
    let traits = if input.pet_traits.is_empty() {
        "none given".to_string()
    } else {
        input
            .pet_traits
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "You are a playful pet astrology expert. The owner's zodiac sign is \
         {owner}, the pet is a {pet_type}, and its traits are: {traits}.\n\
         Analyze the astrological compatibility between owner and pet.\n\
         Answer with STRICT JSON only, no markdown, no commentary, using \
         exactly these keys:\n\
         {{\n\
           \"petZodiac\": one of aries, taurus, gemini, cancer, leo, virgo, \
         libra, scorpio, sagittarius, capricorn, aquarius, pisces,\n\
           \"compatibilityScore\": integer 0-100,\n\
           \"compatibilityLevel\": one of \"Perfect Match\", \"High \
         Match\", \"Good Match\", \"Fair Match\", \"Needs Work\",\n\
           \"analysis\": 2-3 sentences on why the pair works,\n\
           \"tips\": array of 3 short care suggestions,\n\
           \"story\": a short warm vignette about the pair,\n\
           \"funTags\": array of 2-3 playful labels for the pet\n\
         }}",
        owner = input.owner_zodiac,
        pet_type = input.pet_type,
    )
}

/// Human-readable description per HTTP failure class.
fn status_message(status: u16) -> String {
    match status {
        400 => "invalid request, please check the input".to_string(),
        401 => "invalid API key".to_string(),
        403 => "access denied, please check API key permissions".to_string(),
        429 => "too many requests to the model service, please slow down".to_string(),
        500..=599 => "model service temporarily unavailable".to_string(),
        other => format!("unexpected response status {other}"),
    }
}

/// Strip a leading/trailing markdown code fence, if present.
fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Convert the model's JSON answer into a report.
///
/// `petZodiac`, `compatibilityScore` and `analysis` are required; the
/// remaining fields degrade to sensible local values when missing or
/// malformed.
fn parse_report(content: &str) -> Result<CompatibilityReport, BackendError> {
    let payload: ReportPayload = serde_json::from_str(strip_fences(content))
        .map_err(|e| BackendError::Malformed(format!("invalid JSON payload: {e}")))?;

    let pet_zodiac = payload
        .pet_zodiac
        .as_deref()
        .ok_or_else(|| BackendError::Malformed("missing petZodiac".to_string()))
        .and_then(|key| {
            Zodiac::from_key(key)
                .ok_or_else(|| BackendError::Malformed(format!("unknown zodiac sign: {key}")))
        })?;

    let score = payload
        .compatibility_score
        .ok_or_else(|| BackendError::Malformed("missing compatibilityScore".to_string()))?;
    let compatibility_score = clamp_score(score);

    let analysis = payload
        .analysis
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| BackendError::Malformed("missing analysis".to_string()))?;

    let compatibility_level = payload
        .compatibility_level
        .as_deref()
        .and_then(CompatibilityLevel::from_label)
        .unwrap_or_else(|| CompatibilityLevel::from_score(compatibility_score));

    let tips = match string_array(payload.tips.as_ref()) {
        Some(tips) if !tips.is_empty() => tips,
        _ => default_tips(),
    };

    let fun_tags = match string_array(payload.fun_tags.as_ref()) {
        Some(tags) if !tags.is_empty() => tags,
        _ => pick_fun_tags(pet_zodiac, &mut rand::thread_rng()),
    };

    Ok(CompatibilityReport {
        pet_zodiac,
        compatibility_score,
        compatibility_level,
        analysis,
        tips,
        story: payload.story.unwrap_or_default(),
        fun_tags,
    })
}

/// Extract an all-strings array from a loose JSON value.
fn string_array(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
