use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum GateError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("scenario error: {0}")]
    Scenario(String),
    #[error("plant error: {0}")]
    Plant(String),
    #[error("input queue disconnected")]
    QueueClosed,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
