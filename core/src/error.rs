use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModemError {
    #[error("Invalid bit grouping: payload bits must be 0/1 pairs")]
    InvalidSymbol,

    #[error("Could not find any samples to decode")]
    EmptyInput,

    #[error("Bad header sync")]
    BadSync,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("FFT error: {0}")]
    Fft(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio container error: {0}")]
    Audio(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, ModemError>;
