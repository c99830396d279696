//! Error types for the Papo Social core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PapoError {
    #[error("XP amount must be a positive number (got {0})")]
    InvalidAmount(i64),

    #[error("Invalid progress snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

impl PapoError {
    pub fn code(&self) -> i32 {
        match self {
            PapoError::InvalidAmount(_) => -32010,
            PapoError::InvalidSnapshot(_) => -32011,
            PapoError::InvalidName(_) => -32012,
        }
    }
}
