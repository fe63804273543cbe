use thiserror::Error;

/// Failures reported by a [`NativePlayer`](crate::native::NativePlayer) while
/// loading a composition.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("composition json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid composition: {0}")]
    InvalidComposition(String),
    #[error("read composition '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
