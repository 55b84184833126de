// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request and response types for the Straico API.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One completion request, independent of the wire format.
#[derive(Clone, PartialEq)]
pub struct CompletionRequest {
    pub api_key: String,
    /// Fully built message text, context already injected.
    pub message: String,
    pub model: String,
    pub file_urls: Vec<String>,
    pub youtube_urls: Vec<String>,
    pub max_tokens: Option<u32>,
}

// Hand-written so the key and the prompt stay out of logs.
impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("model", &self.model)
            .field("message_len", &self.message.len())
            .field("file_urls", &self.file_urls.len())
            .field("youtube_urls", &self.youtube_urls.len())
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

/// A successful completion: assistant text and coins billed.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub cost: f64,
}

/// A chat model offered by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModel {
    pub name: String,
    #[serde(rename = "model")]
    pub id: String,
    #[serde(default)]
    pub word_limit: u64,
    #[serde(default)]
    pub pricing: ChatPricing,
    #[serde(default)]
    pub max_output: u64,
}

/// Coins charged per block of words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPricing {
    #[serde(default)]
    pub coins: f64,
    #[serde(default)]
    pub words: u64,
}

// ============================================================================
// Wire types
// ============================================================================

/// Body of `POST /v1/prompt/completion`.
#[derive(Debug, Serialize)]
pub(crate) struct PromptRequest<'a> {
    pub message: &'a str,
    pub models: [&'a str; 1],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub file_urls: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub youtube_urls: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl<'a> From<&'a CompletionRequest> for PromptRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            message: &request.message,
            models: [&request.model],
            file_urls: &request.file_urls,
            youtube_urls: &request.youtube_urls,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    pub data: CompletionData,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionData {
    #[serde(default)]
    pub overall_price: Price,
    #[serde(default)]
    pub completions: HashMap<String, ModelCompletion>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Price {
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelCompletion {
    pub completion: ChoiceList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceList {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

impl CompletionResponse {
    /// First choice for `model` and the overall price, if present.
    pub fn into_completion(self, model: &str) -> Option<Completion> {
        let cost = self.data.overall_price.total;
        let mut completions = self.data.completions;
        let text = completions
            .remove(model)?
            .completion
            .choices
            .into_iter()
            .next()?
            .message
            .content;
        Some(Completion { text, cost })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    pub data: ModelsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelsData {
    #[serde(default)]
    pub chat: Vec<ChatModel>,
}

/// Error body some failures carry.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(alias = "message")]
    pub error: String,
}
