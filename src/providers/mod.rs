// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Completion providers.
//!
//! The session controller only talks to the [`CompletionProvider`] trait, so
//! tests can swap the HTTP client for a mock.
//!
//! ```rust,ignore
//! use straico::providers::{CompletionProvider, CompletionRequest, StraicoProvider};
//!
//! let provider = StraicoProvider::new("https://api.straico.com")?;
//! let completion = provider.complete(request).await?;
//! println!("{} ({} coins)", completion.text, completion.cost);
//! ```

pub mod straico;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ResolvedConfig;
use crate::error::ProviderError;

pub use straico::StraicoProvider;
pub use types::{ChatModel, ChatPricing, Completion, CompletionRequest};

/// A remote endpoint that turns a message into a completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one completion request. Never retried.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

    /// List the chat models the endpoint offers.
    async fn list_models(&self, api_key: String) -> Result<Vec<ChatModel>, ProviderError>;
}

/// A provider shared between the controller and its request tasks.
pub type SharedProvider = Arc<dyn CompletionProvider>;

/// Create the Straico provider for a resolved configuration.
pub fn create_provider(config: &ResolvedConfig) -> Result<SharedProvider, ProviderError> {
    Ok(Arc::new(StraicoProvider::new(config.base_url.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_uses_base_url() {
        let config = ResolvedConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            ..Default::default()
        };
        assert!(create_provider(&config).is_ok());
    }

    #[tokio::test]
    async fn test_mock_provider() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .withf(|req| req.message == "hi")
            .returning(|_| {
                Ok(Completion {
                    text: "hello".to_string(),
                    cost: 0.5,
                })
            });

        let provider: SharedProvider = Arc::new(mock);
        let completion = provider
            .complete(CompletionRequest {
                api_key: "k".to_string(),
                message: "hi".to_string(),
                model: "m".to_string(),
                file_urls: Vec::new(),
                youtube_urls: Vec::new(),
                max_tokens: None,
            })
            .await
            .unwrap();
        assert_eq!(completion.text, "hello");
    }
}
