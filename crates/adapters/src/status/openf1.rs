// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OpenF1 HTTP status adapter

use super::{SessionInfo, StatusAdapter, StatusError, TrackStatusRecord};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Race status adapter backed by the OpenF1 REST API
#[derive(Clone, Debug)]
pub struct OpenF1Adapter {
    client: reqwest::Client,
    base_url: String,
}

impl OpenF1Adapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StatusError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| StatusError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StatusError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send().await.map_err(classify)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(StatusError::RateLimited);
        }
        if !status.is_success() {
            return Err(StatusError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StatusError::Decode(e.to_string()))
    }
}

fn classify(e: reqwest::Error) -> StatusError {
    if e.is_timeout() {
        StatusError::Timeout
    } else {
        StatusError::Network(e.to_string())
    }
}

#[async_trait]
impl StatusAdapter for OpenF1Adapter {
    async fn track_status(&self) -> Result<Vec<TrackStatusRecord>, StatusError> {
        self.get_json("track_status").await
    }

    async fn sessions(&self) -> Result<Vec<SessionInfo>, StatusError> {
        self.get_json("session").await
    }
}

#[cfg(test)]
#[path = "openf1_tests.rs"]
mod tests;
