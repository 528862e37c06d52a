//! Light selection specs

use crate::prelude::*;

#[test]
fn nothing_selected_by_default() {
    Home::empty()
        .rl()
        .args(&["devices", "show"])
        .passes()
        .stdout_eq("No lights selected\n");
}

#[test]
fn select_is_sorted_and_deduplicated() {
    let home = Home::empty();
    home.rl()
        .args(&["devices", "select", "lamp-b", "lamp-a"])
        .passes()
        .stdout_has("Selected: lamp-a,lamp-b");
    home.rl()
        .args(&["devices", "select", "lamp-a"])
        .passes()
        .stdout_has("Selected: lamp-a,lamp-b");

    home.rl()
        .args(&["devices", "show"])
        .passes()
        .stdout_eq("lamp-a\nlamp-b\n");
}

#[test]
fn deselect_and_clear() {
    let home = Home::empty();
    home.rl()
        .args(&["devices", "select", "a", "b", "c"])
        .passes();

    home.rl()
        .args(&["devices", "deselect", "b"])
        .passes()
        .stdout_eq("a\nc\n");

    home.rl()
        .args(&["devices", "clear"])
        .passes()
        .stdout_has("No lights selected");
    assert_eq!(home.settings()["selected_devices"], serde_json::json!([]));
}
