//! LLM categorization client for MarkWarden.
//!
//! Sends one classification prompt per batch to the configured provider
//! (Gemini, OpenAI-compatible chat, or a custom endpoint) and funnels the
//! returned free text through JSON extraction and repair. Retry and fallback
//! policy live one level up in the orchestrator; this component reports
//! failures and never retries internally.

use std::time::Duration;

use serde_json::{json, Value};

use crate::services::json_extract::extract_json_candidate;
use crate::services::json_repair::parse_resilient;
use crate::services::precategorize;
use crate::types::bookmark::Bookmark;
use crate::types::category::{BookmarkRef, CategorizationSettings, CategoryMap, Provider};
use crate::types::errors::CategorizationError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(5);

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Trait defining categorization client operations. The orchestrator is
/// generic over this so tests can substitute a scripted client.
#[allow(async_fn_in_trait)]
pub trait CategorizationClient {
    /// Fast checks before a run starts: key shape, endpoint reachability.
    async fn preflight(
        &self,
        settings: &CategorizationSettings,
    ) -> Result<(), CategorizationError>;

    /// Classifies one batch of bookmarks into a raw category map.
    async fn categorize(
        &self,
        batch: &[Bookmark],
        settings: &CategorizationSettings,
    ) -> Result<CategoryMap, CategorizationError>;
}

/// HTTP-backed categorization client.
pub struct HttpCategorizationClient {
    http: reqwest::Client,
}

impl HttpCategorizationClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(settings: &CategorizationSettings) -> Result<String, CategorizationError> {
        match settings.provider {
            Provider::Gemini => Ok(format!(
                "{}/{}:generateContent",
                GEMINI_BASE_URL, settings.model
            )),
            Provider::OpenAi => Ok(OPENAI_CHAT_URL.to_string()),
            Provider::Custom => settings.custom_api_url.clone().ok_or_else(|| {
                CategorizationError::ApiError {
                    message: "custom provider selected but no endpoint configured".to_string(),
                    retryable: false,
                }
            }),
        }
    }

    async fn send_prompt(
        &self,
        prompt: &str,
        settings: &CategorizationSettings,
    ) -> Result<String, CategorizationError> {
        let endpoint = Self::endpoint(settings)?;
        let response = match settings.provider {
            Provider::Gemini => {
                let body = json!({
                    "contents": [{ "parts": [{ "text": prompt }] }]
                });
                self.http
                    .post(&endpoint)
                    .query(&[("key", settings.api_key.as_str())])
                    .json(&body)
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await
            }
            Provider::OpenAi | Provider::Custom => {
                let body = json!({
                    "model": settings.model,
                    "messages": [{ "role": "user", "content": prompt }],
                    "temperature": 0.2
                });
                self.http
                    .post(&endpoint)
                    .bearer_auth(&settings.api_key)
                    .json(&body)
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await
            }
        }
        .map_err(|e| CategorizationError::ApiError {
            message: e.to_string(),
            retryable: true,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CategorizationError::ApiError {
                message: format!("HTTP {}", status),
                retryable: true,
            });
        }

        let envelope: Value =
            response
                .json()
                .await
                .map_err(|e| CategorizationError::ApiError {
                    message: e.to_string(),
                    retryable: true,
                })?;

        extract_reply_text(&envelope, settings.provider).ok_or_else(|| {
            CategorizationError::ApiError {
                message: "response contained no candidates/choices text".to_string(),
                retryable: false,
            }
        })
    }
}

impl Default for HttpCategorizationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CategorizationClient for HttpCategorizationClient {
    async fn preflight(
        &self,
        settings: &CategorizationSettings,
    ) -> Result<(), CategorizationError> {
        let key = settings.api_key.trim();
        if key.is_empty() {
            return Err(CategorizationError::InvalidApiKey(
                "API key is empty".to_string(),
            ));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(CategorizationError::InvalidApiKey(
                "API key contains whitespace".to_string(),
            ));
        }

        // Connectivity only; an HTTP error status still proves reachability
        let endpoint = Self::endpoint(settings)?;
        if let Err(e) = self
            .http
            .head(&endpoint)
            .timeout(PREFLIGHT_TIMEOUT)
            .send()
            .await
        {
            if e.is_connect() || e.is_timeout() {
                return Err(CategorizationError::NetworkUnavailable(e.to_string()));
            }
        }
        Ok(())
    }

    async fn categorize(
        &self,
        batch: &[Bookmark],
        settings: &CategorizationSettings,
    ) -> Result<CategoryMap, CategorizationError> {
        let hint = precategorize::categorize_by_rules(batch);
        let prompt = build_prompt(batch, &hint);
        let reply = self.send_prompt(&prompt, settings).await?;
        let candidate = extract_json_candidate(&reply);
        let value = parse_resilient(&candidate)?;
        Ok(value_to_category_map(&value))
    }
}

/// Pulls the assistant's free-text reply out of a provider response envelope.
fn extract_reply_text(envelope: &Value, provider: Provider) -> Option<String> {
    let text = match provider {
        Provider::Gemini => envelope
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?,
        Provider::OpenAi | Provider::Custom => envelope
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?,
    };
    text.as_str().map(str::to_string)
}

/// Builds the classification prompt for one batch.
pub fn build_prompt(batch: &[Bookmark], hint: &CategoryMap) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Classify the following bookmarks into categories.\n\
         Rules:\n\
         - Use between 10 and 25 categories (fewer is fine for small lists).\n\
         - Category names are short natural-language phrases in any language.\n\
         - Never use purely numeric or symbolic category names.\n\
         - Assign every bookmark to exactly one category.\n\
         - Respond with strict JSON only, no prose and no code fences, shaped as\n\
           {\"Category\": [{\"title\": \"...\", \"url\": \"...\"}, ...], ...}\n\n\
         Bookmarks (title | url | domain):\n",
    );
    for bookmark in batch {
        prompt.push_str(&format!(
            "- {} | {} | {}\n",
            bookmark.title,
            bookmark.url,
            precategorize::domain_of(&bookmark.url)
        ));
    }
    if !hint.is_empty() {
        prompt.push_str(
            "\nHere is a reasonable starting partition from deterministic rules; refine it:\n",
        );
        for (category, entries) in hint {
            for entry in entries {
                prompt.push_str(&format!("- {} -> {}\n", entry.title, category));
            }
        }
    }
    prompt
}

/// Converts a parsed JSON object into a category map, tolerating partially
/// malformed entries. Array members missing a title fall back to the URL;
/// members without a URL are skipped.
pub fn value_to_category_map(value: &Value) -> CategoryMap {
    let mut map = CategoryMap::new();
    let Some(object) = value.as_object() else {
        return map;
    };
    for (name, members) in object {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let Some(array) = members.as_array() else {
            continue;
        };
        let mut entries = Vec::new();
        for member in array {
            let url = match member.get("url").and_then(Value::as_str) {
                Some(url) if !url.trim().is_empty() => url.trim().to_string(),
                _ => continue,
            };
            let title = member
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| url.clone());
            entries.push(BookmarkRef { title, url });
        }
        if !entries.is_empty() {
            map.entry(name.to_string()).or_default().extend(entries);
        }
    }
    map
}
