// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic race flags and the track status code mapping

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Race condition as shown on the lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    #[default]
    Green,
    Yellow,
    Red,
    Safety,
    Checkered,
}

impl Flag {
    pub const ALL: [Flag; 5] = [
        Flag::Green,
        Flag::Yellow,
        Flag::Red,
        Flag::Safety,
        Flag::Checkered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Green => "green",
            Flag::Yellow => "yellow",
            Flag::Red => "red",
            Flag::Safety => "safety",
            Flag::Checkered => "checkered",
        }
    }

    /// Whether applying this flag pulses the lights before settling
    pub fn is_multi_step(&self) -> bool {
        matches!(self, Flag::Red | Flag::Safety | Flag::Checkered)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown flag: {0} (expected green, yellow, red, safety or checkered)")]
pub struct ParseFlagError(pub String);

impl FromStr for Flag {
    type Err = ParseFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Flag::Green),
            "yellow" => Ok(Flag::Yellow),
            "red" => Ok(Flag::Red),
            "safety" => Ok(Flag::Safety),
            "checkered" => Ok(Flag::Checkered),
            _ => Err(ParseFlagError(s.to_string())),
        }
    }
}

/// Raw track status code as reported by race control.
///
/// The feed sends codes as numeric strings, older payloads as numbers.
/// Anything that is neither decodes to code 0, which maps to green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StatusCode(pub i64);

impl StatusCode {
    /// The code assumed when the feed has no status records
    pub const ALL_CLEAR: StatusCode = StatusCode(1);

    pub fn flag(&self) -> Flag {
        translate_status(self.0)
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
            Other(serde_json::Value),
        }

        let code = match Raw::deserialize(deserializer)? {
            Raw::Int(n) => n,
            Raw::Text(s) => s.trim().parse().unwrap_or(0),
            Raw::Other(_) => 0,
        };
        Ok(StatusCode(code))
    }
}

/// Map a raw status code to its flag. Total: unknown codes are green.
pub fn translate_status(code: i64) -> Flag {
    match code {
        1 => Flag::Green,
        2 => Flag::Yellow,
        3 => Flag::Checkered,
        4 => Flag::Safety,
        5 => Flag::Red,
        // Virtual safety car
        6 => Flag::Safety,
        _ => Flag::Green,
    }
}

#[cfg(test)]
#[path = "flag_tests.rs"]
mod tests;
