use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed model file: {0}")]
    Parse(String),

    #[error("layer {layer}: {reason}")]
    Shape { layer: usize, reason: String },

    #[error("invalid model input: {0}")]
    Input(String),

    #[error("model loader failed: {0}")]
    Load(String),
}
