//! Error reporting specs

use crate::prelude::*;

#[test]
fn flag_without_token_suggests_setting_one() {
    let home = Home::empty();
    home.rl().args(&["devices", "select", "d073d5"]).passes();

    home.rl()
        .args(&["flag", "red"])
        .fails()
        .stderr_has("error: No LIFX API token configured")
        .stderr_has("racelight token set <TOKEN>");
}

#[test]
fn flag_without_selection_suggests_selecting_lights() {
    let home = Home::empty();
    home.rl().args(&["token", "set", "c0ffee"]).passes();

    home.rl()
        .args(&["flag", "green"])
        .fails()
        .stderr_has("error: No lights selected")
        .stderr_has("racelight devices select");
}

#[test]
fn unknown_flag_is_rejected() {
    Home::empty()
        .rl()
        .args(&["flag", "blue"])
        .fails()
        .stderr_has("unknown flag");
}

#[test]
fn devices_list_needs_a_token() {
    Home::empty()
        .rl()
        .args(&["devices", "list"])
        .fails()
        .stderr_has("No LIFX API token configured");
}

#[test]
fn invalid_config_is_reported() {
    let home = Home::empty();
    home.file("racelight.toml", "tick_interval = \"soon\"\n");

    home.rl()
        .args(&["delay", "show"])
        .fails()
        .stderr_has("loading config");
}

#[test]
fn config_dir_can_come_from_environment() {
    let home = Home::empty();
    let other = Home::empty();

    // --config-dir wins over RACELIGHT_HOME
    home.rl()
        .env("RACELIGHT_HOME", other.path())
        .args(&["delay", "set", "12"])
        .passes();

    assert_eq!(home.settings()["broadcast_delay"], 12.0);
    assert!(!other.path().join("settings.json").exists());
}
