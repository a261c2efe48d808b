// Host-side tests for the key bindings.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod keys {
    include!("../src/events/keys.rs");
}

use keys::*;

#[test]
fn space_and_f_toggle_mode() {
    assert_eq!(action_for_key(" "), Some(KeyAction::ToggleMode));
    assert_eq!(action_for_key("f"), Some(KeyAction::ToggleMode));
    assert_eq!(action_for_key("F"), Some(KeyAction::ToggleMode));
}

#[test]
fn digits_pick_a_mode_directly() {
    assert_eq!(action_for_key("1"), Some(KeyAction::Form));
    assert_eq!(action_for_key("2"), Some(KeyAction::Scatter));
    assert_eq!(action_for_key("3"), None);
}

#[test]
fn letters_are_case_insensitive() {
    for (lower, upper, action) in [
        ("r", "R", KeyAction::Regenerate),
        ("h", "H", KeyAction::ToggleHint),
    ] {
        assert_eq!(action_for_key(lower), Some(action));
        assert_eq!(action_for_key(upper), Some(action));
    }
}

#[test]
fn unbound_keys_do_nothing() {
    for key in ["", "a", "Enter", "Escape", "ArrowUp", "space", "0"] {
        assert_eq!(action_for_key(key), None, "{key:?}");
    }
}

#[test]
fn seeds_span_the_u32_range() {
    assert_eq!(seed_from_unit(0.0), 0);
    assert_eq!(seed_from_unit(1.0), u32::MAX as u64);
    assert!(seed_from_unit(0.5) > 0 && seed_from_unit(0.5) < u32::MAX as u64);
    // out of range input is clamped
    assert_eq!(seed_from_unit(-3.0), 0);
    assert_eq!(seed_from_unit(7.0), u32::MAX as u64);
}
