//! Structured error types for appexcel.
//!
//! Most of the pipeline is total and absorbs bad input by defaulting; these
//! errors only surface where a host has to know something went wrong.

/// All errors that can reach a caller of the grid pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppExcelError {
    /// The grid widget could not be constructed or rejected a call.
    #[error("Grid widget: {0}")]
    Widget(String),

    /// A DOM operation failed (missing window, container, element).
    #[error("DOM: {0}")]
    Dom(String),

    /// Options or snapshot could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid cell key or A1 label.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (CLI only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppExcelError>;

impl From<String> for AppExcelError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for AppExcelError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<AppExcelError> for wasm_bindgen::JsValue {
    fn from(e: AppExcelError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

/// Render a `JsValue` thrown by the widget or the DOM as a readable message.
#[cfg(target_arch = "wasm32")]
pub(crate) fn describe_js_error(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
