//! Broadcast delay specs

use crate::prelude::*;

#[test]
fn default_delay_is_shown() {
    Home::empty()
        .rl()
        .args(&["delay", "show"])
        .passes()
        .stdout_eq("Broadcast delay: 5s (default)\n");
}

#[test]
fn delay_set_persists() {
    let home = Home::empty();
    home.rl()
        .args(&["delay", "set", "12.5"])
        .passes()
        .stdout_has("Broadcast delay set to 12.5s");

    assert_eq!(home.settings()["broadcast_delay"], 12.5);
    home.rl()
        .args(&["delay", "show"])
        .passes()
        .stdout_eq("Broadcast delay: 12.5s\n");
}

#[test]
fn presets_map_to_seconds() {
    let home = Home::empty();
    for (preset, seconds) in [("cable", 5.0), ("streaming", 20.0), ("f1tv", 30.0)] {
        home.rl().args(&["delay", "preset", preset]).passes();
        assert_eq!(home.settings()["broadcast_delay"], seconds);
    }
}

#[test]
fn out_of_range_delay_is_rejected() {
    let home = Home::empty();
    home.rl()
        .args(&["delay", "set", "61"])
        .fails()
        .stderr_has("between 0 and 60");
    home.rl()
        .args(&["delay", "set", "-1"])
        .fails()
        .stderr_has("out of range");

    assert!(!home.path().join("settings.json").exists());
}

#[test]
fn config_default_delay_applies() {
    let home = Home::empty();
    home.file("racelight.toml", "default_delay = \"8s\"\n");

    home.rl()
        .args(&["delay", "show"])
        .passes()
        .stdout_eq("Broadcast delay: 8s (default)\n");
}
