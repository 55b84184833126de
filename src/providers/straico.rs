// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Straico completion API provider.
//!
//! One request per call, no retry and no timeout.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::ProviderError;

use super::types::{
    ChatModel, Completion, CompletionRequest, CompletionResponse, ErrorBody, ModelsResponse,
    PromptRequest,
};
use super::CompletionProvider;

/// Path of the completion endpoint.
pub const COMPLETION_PATH: &str = "/v1/prompt/completion";

/// Path of the model catalogue.
pub const MODELS_PATH: &str = "/v1/models";

/// HTTP client for the Straico API.
#[derive(Debug, Clone)]
pub struct StraicoProvider {
    client: Client,
    base_url: String,
}

impl StraicoProvider {
    /// Create a provider talking to `base_url` (e.g. `https://api.straico.com`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("straico-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success status and its body to an error.
    fn handle_error_response(status: StatusCode, body: &str) -> ProviderError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.to_string());

        match status.as_u16() {
            401 | 403 => ProviderError::AuthError(message),
            404 => ProviderError::ModelNotFound(message),
            429 => ProviderError::RateLimited(message),
            code => ProviderError::api(message, code),
        }
    }

    async fn read_body(response: reqwest::Response) -> Result<(StatusCode, String), ProviderError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(format!("unable to read body: {}", e)))?;
        Ok((status, body))
    }
}

#[async_trait]
impl CompletionProvider for StraicoProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        debug!(
            model = %request.model,
            message_len = request.message.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(self.url(COMPLETION_PATH))
            .bearer_auth(&request.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&PromptRequest::from(&request))
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let (status, body) = Self::read_body(response).await?;
        if !status.is_success() {
            return Err(Self::handle_error_response(status, &body));
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if !parsed.success {
            return Err(ProviderError::api(
                "the API reported an unsuccessful request",
                status.as_u16(),
            ));
        }

        let completion = parsed
            .into_completion(&request.model)
            .ok_or_else(|| ProviderError::EmptyCompletion(request.model.clone()))?;

        debug!(model = %request.model, cost = completion.cost, "Completion received");
        Ok(completion)
    }

    async fn list_models(&self, api_key: String) -> Result<Vec<ChatModel>, ProviderError> {
        let response = self
            .client
            .get(self.url(MODELS_PATH))
            .bearer_auth(&api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let (status, body) = Self::read_body(response).await?;
        if !status.is_success() {
            return Err(Self::handle_error_response(status, &body));
        }

        let parsed: ModelsResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(parsed.data.chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = StraicoProvider::new("https://api.straico.com/").unwrap();
        assert_eq!(provider.base_url(), "https://api.straico.com");
        assert_eq!(
            provider.url(COMPLETION_PATH),
            "https://api.straico.com/v1/prompt/completion"
        );
    }

    #[test]
    fn test_error_mapping_by_status() {
        let err = StraicoProvider::handle_error_response(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, ProviderError::AuthError(_)));

        let err = StraicoProvider::handle_error_response(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, ProviderError::AuthError(_)));

        let err = StraicoProvider::handle_error_response(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, ProviderError::ModelNotFound(_)));

        let err = StraicoProvider::handle_error_response(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, ProviderError::RateLimited(_)));

        let err = StraicoProvider::handle_error_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.status_code(), Some(502));
    }

    #[test]
    fn test_error_message_from_body() {
        let err = StraicoProvider::handle_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Insufficient coins"}"#,
        );
        assert_eq!(err.to_string(), "Request failed: Insufficient coins");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let err =
            StraicoProvider::handle_error_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>");
        assert_eq!(err.to_string(), "Request failed: 500 Internal Server Error");
    }
}
