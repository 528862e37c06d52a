//! Token management specs

use crate::prelude::*;

#[test]
fn token_set_then_show_masks_it() {
    let home = Home::empty();
    home.rl()
        .args(&["token", "set", "c0ffee1234"])
        .passes()
        .stdout_has("Token saved");

    assert_eq!(home.settings()["token"], "c0ffee1234");

    home.rl()
        .args(&["token", "show"])
        .passes()
        .stdout_eq("******1234\n");
}

#[test]
fn token_clear_removes_it() {
    let home = Home::empty();
    home.rl().args(&["token", "set", "c0ffee1234"]).passes();
    home.rl().args(&["devices", "select", "a"]).passes();

    home.rl()
        .args(&["token", "clear"])
        .passes()
        .stdout_has("Token cleared");

    home.rl()
        .args(&["token", "show"])
        .passes()
        .stdout_eq("No token set\n");
    assert_eq!(home.settings()["selected_devices"][0], "a");
}

#[test]
fn blank_token_is_rejected() {
    Home::empty()
        .rl()
        .args(&["token", "set", "   "])
        .fails()
        .stderr_has("Token must not be empty");
}
