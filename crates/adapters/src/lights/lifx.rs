// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LIFX HTTP lights adapter

use super::{LightInfo, LightsAdapter, LightsError};
use async_trait::async_trait;
use racelight_core::{LightState, PulseEffect, Selector};
use serde::Deserialize;
use std::time::Duration;

/// Lights adapter backed by the LIFX cloud API
#[derive(Clone, Debug)]
pub struct LifxAdapter {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl LifxAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LightsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| LightsError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, LightsError> {
        let response = request
            .send()
            .await
            .map_err(|e| LightsError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(LightsError::status(status.as_u16(), error_message(&text)))
    }
}

/// Pull a human message out of an error body
fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .or(parsed.message)
        .unwrap_or_else(|| "Failed to communicate with LIFX".to_string())
}

#[async_trait]
impl LightsAdapter for LifxAdapter {
    async fn list_lights(&self, token: &str) -> Result<Vec<LightInfo>, LightsError> {
        let request = self.client.get(self.url("lights/all")).bearer_auth(token);
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| LightsError::Decode(e.to_string()))
    }

    async fn set_state(
        &self,
        token: &str,
        selector: &Selector,
        state: &LightState,
    ) -> Result<(), LightsError> {
        let request = self
            .client
            .put(self.url(&format!("lights/{}/state", selector)))
            .bearer_auth(token)
            .json(state);
        self.send(request).await.map(|_| ())
    }

    async fn pulse(
        &self,
        token: &str,
        selector: &Selector,
        effect: &PulseEffect,
    ) -> Result<(), LightsError> {
        let request = self
            .client
            .post(self.url(&format!("lights/{}/effects/pulse", selector)))
            .bearer_auth(token)
            .json(effect);
        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "lifx_tests.rs"]
mod tests;
