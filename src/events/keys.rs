/// What a key press asks the app to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleMode,
    Form,
    Scatter,
    Regenerate,
    ToggleHint,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "f" | "F" => Some(KeyAction::ToggleMode),
        "1" => Some(KeyAction::Form),
        "2" => Some(KeyAction::Scatter),
        "r" | "R" => Some(KeyAction::Regenerate),
        "h" | "H" => Some(KeyAction::ToggleHint),
        _ => None,
    }
}

/// Draw a dataset seed from a uniform variate in \[0, 1).
#[inline]
pub fn seed_from_unit(u: f64) -> u64 {
    (u.clamp(0.0, 1.0) * u32::MAX as f64) as u64
}
