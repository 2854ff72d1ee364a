use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid landmarks: expected at least {expected} points, got {got}")]
    InvalidLandmarks { expected: usize, got: usize },

    #[error("Invalid landmarks: index {index} out of range for a set of {len} points")]
    MissingLandmark { index: usize, len: usize },

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Buffer size mismatch: {len} samples for a {width}x{height} grid")]
    BufferSize {
        width: u32,
        height: u32,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
