// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use racelight_engine::SinkError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct RlError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RlError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for RlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for RlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl RlError {
    /// No LIFX token has been saved.
    pub fn no_token() -> Self {
        RlError::new("No LIFX API token configured")
            .with_context("Light commands need a personal access token")
            .with_suggestion("Create one at https://cloud.lifx.com/settings")
            .with_suggestion("Save it with: racelight token set <TOKEN>")
    }

    /// No devices are selected to receive flags.
    pub fn no_devices() -> Self {
        RlError::new("No lights selected")
            .with_suggestion("See available lights: racelight devices list")
            .with_suggestion("Select lights with: racelight devices select <ID>...")
    }

    /// A broadcast delay outside the accepted range.
    pub fn delay_out_of_range(seconds: f64) -> Self {
        RlError::new(format!("Broadcast delay {}s is out of range", seconds))
            .with_context("The delay must be between 0 and 60 seconds")
            .with_suggestion("Use a preset: racelight delay preset <cable|streaming|f1tv>")
    }

    /// No directory to keep settings in.
    pub fn no_config_dir() -> Self {
        RlError::new("Could not determine a configuration directory")
            .with_suggestion("Pass one explicitly: racelight --config-dir <DIR> ...")
            .with_suggestion("Or set RACELIGHT_HOME")
    }

    /// A failed lights command.
    pub fn lights(err: SinkError) -> Self {
        let base = RlError::new(err.to_string());
        let base = match &err {
            SinkError::InvalidToken => base
                .with_context("The stored token was rejected and has been removed")
                .with_suggestion("Save a new token: racelight token set <TOKEN>"),
            SinkError::NotInitialized => {
                base.with_suggestion("Save a token: racelight token set <TOKEN>")
            }
            SinkError::RateLimited => {
                base.with_context("The LIFX API allows a limited number of requests per minute")
            }
            SinkError::Server { .. } | SinkError::Network(_) => base
                .with_context("The LIFX cloud may be unreachable")
                .with_suggestion("Check your network connection and try again"),
            SinkError::Validation(_) => base,
        };
        base.with_source(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
