use serde::Serialize;

/// Payload of the host's `onSelectCell` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedCell {
    /// A1-style label of the resolved anchor ("" before any selection)
    pub label: String,
    /// Display text of the resolved anchor
    pub text: String,
}

impl SelectedCell {
    /// The synthetic selection announced right after every mount.
    pub fn initial() -> Self {
        Self {
            label: String::new(),
            text: "=".to_string(),
        }
    }
}
