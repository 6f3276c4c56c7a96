use thiserror::Error;

/// Top-level error type returned by findom.
///
/// Normalization itself never fails; errors only come from the parsing boundary
/// and from loading configuration.
#[derive(Debug, Error)]
pub enum FindOptionsError {
    /// Find options must be a JSON object.
    #[error("find options must be an object, got {found}")]
    NotAnObject { found: &'static str },

    /// The object carries no recognized find-options field with an acceptable shape.
    #[error("no recognized find options field (keys present: {keys:?})")]
    Unrecognized { keys: Vec<String> },

    /// Input text was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
