// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Serialize;
use std::time::Duration;
use una_app::PromptRequest;
use url::Url;

/// Blocking client for the outbound prompt calls. The endpoint and secret
/// key travel with every [`PromptRequest`] because both are ordinary
/// editable view state; only the timeout is fixed at construction.
#[derive(Debug, Clone)]
pub struct Client {
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { timeout, http })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues exactly one POST and returns the pretty-printed JSON response
    /// body. Every failure mode collapses to a single human-readable message
    /// suitable for the panel's error slot. No retry.
    pub fn send(&self, request: &PromptRequest) -> Result<String> {
        let url = request_url(request)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&request.secret_key)
            .json(&PromptBody {
                prompt: &request.prompt,
            })
            .send()
            .map_err(|error| connection_error(&request.endpoint, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let parsed: serde_json::Value = response.json().context("decode response body")?;
        serde_json::to_string_pretty(&parsed).context("render response body")
    }
}

pub fn request_url(request: &PromptRequest) -> Result<String> {
    let endpoint = request.endpoint.trim_end_matches('/');
    if endpoint.is_empty() {
        bail!("endpoint must not be empty");
    }

    let url = format!("{endpoint}{}", request.action.path());
    Url::parse(&url).with_context(|| format!("invalid endpoint {:?}", request.endpoint))?;
    Ok(url)
}

fn connection_error(endpoint: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {endpoint} ({error})")
}

/// Mirrors the browser contract for non-2xx responses: a JSON object with a
/// non-empty string `message` field wins, any other JSON value (object
/// without a message, array, scalar) falls back to the status line, and a
/// body that is not JSON at all gets the parse notice.
fn error_from_response(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("message").and_then(serde_json::Value::as_str) {
            Some(message) if !message.is_empty() => anyhow!(message.to_owned()),
            _ => anyhow!("HTTP error! status: {}", status.as_u16()),
        },
        Err(_) => anyhow!("Failed to parse error response"),
    }
}

#[derive(Debug, Serialize)]
struct PromptBody<'a> {
    prompt: &'a str,
}
