// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Asynchronous completion requests.
//!
//! The dispatcher runs each request on its own task and reports the outcome
//! back into the event queue as an [`Event::Completion`]. It never touches
//! slot state itself.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{require_api_key, ResolvedConfig};
use crate::error::ConfigError;
use crate::providers::{CompletionProvider, CompletionRequest, SharedProvider};
use crate::tui::events::Event;

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;

/// Stable identity of a slot's contents.
///
/// Travels with a request so the result lands on the same conversation even
/// if that conversation was moved to another position in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey(pub u64);

/// Outcome of one round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    Success { text: String, cost: f64 },
    Failure { description: String },
}

impl CompletionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A finished request, addressed to the slot that submitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEvent {
    pub slot_key: SlotKey,
    /// Position of the slot at submission time.
    pub submitted_from: usize,
    pub result: CompletionResult,
}

/// Read-only request parameters fixed for the whole session.
#[derive(Clone)]
pub struct DispatchSettings {
    pub api_key: String,
    pub model: String,
    pub file_urls: Vec<String>,
    pub youtube_urls: Vec<String>,
    pub max_tokens: Option<u32>,
}

impl DispatchSettings {
    /// Take the request parameters from a resolved config. The key is required.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: require_api_key(config)?.to_string(),
            model: config.model.clone(),
            file_urls: config.file_urls.clone(),
            youtube_urls: config.youtube_urls.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn request(&self, message: String) -> CompletionRequest {
        CompletionRequest {
            api_key: self.api_key.clone(),
            message,
            model: self.model.clone(),
            file_urls: self.file_urls.clone(),
            youtube_urls: self.youtube_urls.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

impl fmt::Debug for DispatchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchSettings")
            .field("model", &self.model)
            .field("file_urls", &self.file_urls)
            .field("youtube_urls", &self.youtube_urls)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

/// Send one message and fold every failure into a [`CompletionResult`].
pub async fn request_completion(
    provider: &dyn CompletionProvider,
    settings: &DispatchSettings,
    message: String,
) -> CompletionResult {
    let start = Instant::now();
    let outcome = provider.complete(settings.request(message)).await;
    let elapsed = start.elapsed();

    #[cfg(feature = "telemetry")]
    GLOBAL_METRICS.record_request(&settings.model, elapsed, outcome.is_ok());

    match outcome {
        Ok(completion) => {
            debug!(model = %settings.model, cost = completion.cost, ?elapsed, "Request succeeded");
            #[cfg(feature = "telemetry")]
            GLOBAL_METRICS.record_usage(completion.cost);
            CompletionResult::Success {
                text: completion.text,
                cost: completion.cost,
            }
        }
        Err(e) => {
            warn!(model = %settings.model, error = %e, ?elapsed, "Request failed");
            CompletionResult::Failure {
                description: e.to_string(),
            }
        }
    }
}

/// Issues completion requests on background tasks.
#[derive(Clone)]
pub struct RequestDispatcher {
    provider: SharedProvider,
    settings: Arc<DispatchSettings>,
    events: mpsc::UnboundedSender<Event>,
}

impl RequestDispatcher {
    pub fn new(
        provider: SharedProvider,
        settings: DispatchSettings,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
            events,
        }
    }

    /// Model every request is sent to.
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Start one request for the slot identified by `slot_key`.
    ///
    /// Returns immediately. The result arrives later as an [`Event::Completion`].
    pub fn dispatch(&self, slot_key: SlotKey, submitted_from: usize, message: String) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let settings = Arc::clone(&self.settings);
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = request_completion(provider.as_ref(), &settings, message).await;
            let event = CompletionEvent {
                slot_key,
                submitted_from,
                result,
            };
            if events.send(Event::Completion(event)).is_err() {
                debug!(slot = submitted_from, "Event loop gone, dropping completion");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::providers::{Completion, MockCompletionProvider};

    fn settings() -> DispatchSettings {
        DispatchSettings {
            api_key: "test-key".to_string(),
            model: "anthropic/claude-3-haiku:beta".to_string(),
            file_urls: Vec::new(),
            youtube_urls: vec!["https://youtu.be/abc".to_string()],
            max_tokens: None,
        }
    }

    #[test]
    fn test_settings_require_key() {
        let config = ResolvedConfig::default();
        assert!(DispatchSettings::from_config(&config).is_err());

        let config = ResolvedConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let settings = DispatchSettings::from_config(&config).unwrap();
        assert_eq!(settings.model, config.model);
    }

    #[test]
    fn test_settings_debug_hides_key() {
        assert!(!format!("{:?}", settings()).contains("test-key"));
    }

    #[tokio::test]
    async fn test_request_completion_success() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .times(1)
            .withf(|req| {
                req.api_key == "test-key"
                    && req.message == "hello"
                    && req.youtube_urls == vec!["https://youtu.be/abc".to_string()]
            })
            .returning(|_| {
                Ok(Completion {
                    text: "hi there".to_string(),
                    cost: 0.75,
                })
            });

        let result = request_completion(&mock, &settings(), "hello".to_string()).await;
        assert_eq!(
            result,
            CompletionResult::Success {
                text: "hi there".to_string(),
                cost: 0.75
            }
        );
    }

    #[tokio::test]
    async fn test_request_completion_failure_is_described() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(ProviderError::api("500 Internal Server Error", 500)));

        let result = request_completion(&mock, &settings(), "hello".to_string()).await;
        assert_eq!(
            result,
            CompletionResult::Failure {
                description: "Request failed: 500 Internal Server Error".to_string()
            }
        );
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_event() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete().times(1).returning(|_| {
            Ok(Completion {
                text: "ok".to_string(),
                cost: 1.0,
            })
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = RequestDispatcher::new(Arc::new(mock), settings(), tx);
        dispatcher
            .dispatch(SlotKey(7), 3, "ping".to_string())
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::Completion(event)) => {
                assert_eq!(event.slot_key, SlotKey(7));
                assert_eq!(event.submitted_from, 3);
                assert!(event.result.is_success());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_with_closed_queue_does_not_panic() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .returning(|_| Err(ProviderError::NetworkError("down".to_string())));

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let dispatcher = RequestDispatcher::new(Arc::new(mock), settings(), tx);
        assert!(dispatcher.dispatch(SlotKey(0), 0, "x".to_string()).await.is_ok());
    }
}
