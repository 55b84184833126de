// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Straico provider against a scripted loopback HTTP server.

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use straico::dispatch::{request_completion, CompletionResult, DispatchSettings};
use straico::error::ProviderError;
use straico::providers::{CompletionProvider, CompletionRequest, StraicoProvider};

const MODEL: &str = "anthropic/claude-3-haiku:beta";

/// What the server saw.
struct Captured {
    request_line: String,
    headers: String,
    body: String,
}

/// Serve exactly one request with `status` and `body`.
async fn serve_once(status: u16, body: String) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("local TCP listener should bind");
    let addr = listener.local_addr().expect("resolved local listener address");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let captured = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        let _ = socket.shutdown().await;
        let _ = tx.send(captured);
    });

    (format!("http://{addr}"), rx)
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buffer).await.expect("read");
        assert!(n > 0, "client closed before sending headers");
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = socket.read(&mut buffer).await.expect("read body");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default().to_string();
    Captured {
        request_line,
        headers: lines.collect::<Vec<_>>().join("\n").to_lowercase(),
        body: String::from_utf8_lossy(&data[header_end..]).to_string(),
    }
}

fn request(message: &str) -> CompletionRequest {
    CompletionRequest {
        api_key: "sk-loopback".to_string(),
        message: message.to_string(),
        model: MODEL.to_string(),
        file_urls: Vec::new(),
        youtube_urls: vec!["https://youtu.be/abc".to_string()],
        max_tokens: None,
    }
}

fn completion_body(content: &str, total: f64) -> String {
    json!({
        "data": {
            "overall_price": {"input": 0.1, "output": 0.2, "total": total},
            "overall_words": {"input": 1, "output": 2, "total": 3},
            "completions": {
                MODEL: {
                    "completion": {
                        "choices": [
                            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
                        ]
                    },
                    "price": {"input": 0.1, "output": 0.2, "total": total},
                    "words": {"input": 1, "output": 2, "total": 3}
                }
            }
        },
        "success": true
    })
    .to_string()
}

#[tokio::test]
async fn test_completion_success() {
    let (base_url, seen) = serve_once(201, completion_body("Hi there", 0.35)).await;
    let provider = StraicoProvider::new(base_url).unwrap();

    let completion = provider.complete(request("hello")).await.unwrap();
    assert_eq!(completion.text, "Hi there");
    assert!((completion.cost - 0.35).abs() < 1e-9);

    let captured = seen.await.unwrap();
    assert_eq!(captured.request_line, "POST /v1/prompt/completion HTTP/1.1");
    assert!(captured.headers.contains("authorization: bearer sk-loopback"));

    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        body,
        json!({
            "message": "hello",
            "models": [MODEL],
            "youtube_urls": ["https://youtu.be/abc"]
        })
    );
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let (base_url, _seen) = serve_once(401, json!({"error": "Invalid API key"}).to_string()).await;
    let provider = StraicoProvider::new(base_url).unwrap();

    let err = provider.complete(request("hello")).await.unwrap_err();
    assert!(matches!(err, ProviderError::AuthError(ref m) if m == "Invalid API key"));
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let (base_url, _seen) = serve_once(502, "upstream down".to_string()).await;
    let provider = StraicoProvider::new(base_url).unwrap();

    let err = provider.complete(request("hello")).await.unwrap_err();
    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (base_url, _seen) = serve_once(200, "{not json".to_string()).await;
    let provider = StraicoProvider::new(base_url).unwrap();

    let err = provider.complete(request("hello")).await.unwrap_err();
    assert!(matches!(err, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_missing_model_is_empty_completion() {
    let body = json!({
        "data": {"overall_price": {"total": 0.0}, "completions": {}},
        "success": true
    })
    .to_string();
    let (base_url, _seen) = serve_once(200, body).await;
    let provider = StraicoProvider::new(base_url).unwrap();

    let err = provider.complete(request("hello")).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyCompletion(ref m) if m == MODEL));
}

#[tokio::test]
async fn test_dispatch_folds_failure_into_description() {
    let (base_url, _seen) = serve_once(429, json!({"message": "Too many requests"}).to_string()).await;
    let provider = StraicoProvider::new(base_url).unwrap();
    let settings = DispatchSettings {
        api_key: "sk-loopback".to_string(),
        model: MODEL.to_string(),
        file_urls: Vec::new(),
        youtube_urls: Vec::new(),
        max_tokens: Some(256),
    };

    let result = request_completion(&provider, &settings, "hello".to_string()).await;
    assert_eq!(
        result,
        CompletionResult::Failure {
            description: "Rate limited: Too many requests".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = StraicoProvider::new(format!("http://{addr}")).unwrap();
    let err = provider.complete(request("hello")).await.unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError(_)));
}

#[tokio::test]
async fn test_list_models() {
    let body = json!({
        "data": {
            "chat": [
                {
                    "name": "Anthropic: Claude 3 Haiku",
                    "model": MODEL,
                    "word_limit": 150000,
                    "pricing": {"coins": 1, "words": 100},
                    "max_output": 4096
                },
                {
                    "name": "OpenAI: GPT-4o mini",
                    "model": "openai/gpt-4o-mini",
                    "pricing": {"coins": 0.4, "words": 100}
                }
            ],
            "image": [{"name": "DALL-E 3", "model": "openai/dall-e-3"}]
        },
        "success": true
    })
    .to_string();
    let (base_url, seen) = serve_once(200, body).await;
    let provider = StraicoProvider::new(base_url).unwrap();

    let models = provider.list_models("sk-loopback".to_string()).await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, MODEL);
    assert_eq!(models[0].max_output, 4096);
    assert_eq!(models[1].pricing.coins, 0.4);
    assert_eq!(models[1].word_limit, 0);

    let captured = seen.await.unwrap();
    assert_eq!(captured.request_line, "GET /v1/models HTTP/1.1");
    assert!(captured.headers.contains("authorization: bearer sk-loopback"));
}
