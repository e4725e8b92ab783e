use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlantError {
    #[error("invalid plant parameters: {0}")]
    InvalidParams(&'static str),
}

pub type Result<T> = std::result::Result<T, PlantError>;
