// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Light commands and the scene shown for each flag
//!
//! Types here serialize directly to the request bodies of the remote
//! lights API, so the adapters can send them without reshaping.

use crate::flag::Flag;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Hue / saturation / brightness / kelvin color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsbk {
    /// Degrees, 0-360
    pub hue: f64,
    /// 0-1
    pub saturation: f64,
    /// 0-1; unset leaves the current brightness alone
    pub brightness: Option<f64>,
    /// Warmth in kelvin
    pub kelvin: u16,
}

impl Hsbk {
    pub const fn new(hue: f64, saturation: f64, kelvin: u16) -> Self {
        Self {
            hue,
            saturation,
            brightness: None,
            kelvin,
        }
    }

    pub const fn with_brightness(self, brightness: f64) -> Self {
        Self {
            brightness: Some(brightness),
            ..self
        }
    }

}

impl fmt::Display for Hsbk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hue:{} saturation:{}", self.hue, self.saturation)?;
        if let Some(brightness) = self.brightness {
            write!(f, " brightness:{}", brightness)?;
        }
        write!(f, " kelvin:{}", self.kelvin)
    }
}

/// The lights API takes colors as `"hue:120 saturation:1 kelvin:3500"` strings
impl Serialize for Hsbk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    Off,
}

/// Body of a set-state command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightState {
    pub power: Power,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Hsbk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    /// Transition time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl LightState {
    /// Lights on at full brightness in the given color
    pub fn solid(color: Hsbk) -> Self {
        Self {
            power: Power::On,
            color: Some(color),
            brightness: Some(1.0),
            duration: None,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }
}

/// Body of a pulse effect command: blink between two colors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseEffect {
    pub color: Hsbk,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_color: Option<Hsbk>,
    /// Seconds per cycle
    pub period: f64,
    pub cycles: f64,
    pub power_on: bool,
}

/// What the lights do when a flag is applied.
///
/// Flags with a pulse flash first, wait for the configured settle time, then
/// switch to the steady state.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub pulse: Option<PulseEffect>,
    pub steady: LightState,
}

const KELVIN: u16 = 3500;
const GREEN: Hsbk = Hsbk::new(120.0, 1.0, KELVIN);
const YELLOW: Hsbk = Hsbk::new(60.0, 1.0, KELVIN);
const RED: Hsbk = Hsbk::new(0.0, 1.0, KELVIN);

impl Scene {
    pub fn for_flag(flag: Flag) -> Self {
        match flag {
            Flag::Green => Scene {
                pulse: None,
                steady: LightState::solid(GREEN).with_duration(0.1),
            },
            Flag::Yellow => Scene {
                pulse: None,
                steady: LightState::solid(YELLOW).with_duration(0.1),
            },
            Flag::Red => Scene {
                pulse: Some(flash(RED)),
                steady: LightState::solid(RED),
            },
            Flag::Safety => Scene {
                pulse: Some(flash(YELLOW)),
                steady: LightState::solid(YELLOW),
            },
            Flag::Checkered => Scene {
                pulse: Some(PulseEffect {
                    color: Hsbk::new(0.0, 0.0, 9000).with_brightness(1.0),
                    from_color: Some(Hsbk::new(0.0, 0.0, 2500).with_brightness(0.0)),
                    period: 0.3,
                    cycles: 10.0,
                    power_on: true,
                }),
                // Back to racing after the chequered flag
                steady: LightState::solid(GREEN),
            },
        }
    }
}

fn flash(color: Hsbk) -> PulseEffect {
    PulseEffect {
        color: color.with_brightness(1.0),
        from_color: Some(color.with_brightness(0.3)),
        period: 0.5,
        cycles: 6.0,
        power_on: true,
    }
}

/// Addressable target covering one or more devices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selector(String);

impl Selector {
    /// Join device ids into a single selector, sorted and deduplicated
    pub fn from_devices<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: BTreeSet<String> = devices
            .into_iter()
            .map(|d| d.as_ref().trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Self(ids.into_iter().collect::<Vec<_>>().join(","))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
