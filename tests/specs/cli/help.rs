//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let home = Home::empty();
    let run = home.rl().args(&["--help"]).passes();
    let run = run.stdout_has("run").stdout_has("status").stdout_has("token");
    run.stdout_has("devices").stdout_has("delay").stdout_has("flag");
}

#[test]
fn delay_help_lists_presets() {
    Home::empty()
        .rl()
        .args(&["delay", "preset", "--help"])
        .passes()
        .stdout_has("cable")
        .stdout_has("streaming")
        .stdout_has("f1tv");
}

#[test]
fn version_is_reported() {
    Home::empty()
        .rl()
        .args(&["--version"])
        .passes()
        .stdout_has("racelight");
}
