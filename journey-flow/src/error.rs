use thiserror::Error;

use crate::step::Step;

/// Errors produced while driving a journey
#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid step index: {0} (expected 1-8)")]
    InvalidStep(u8),

    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: Step, to: Step },

    #[error("Action '{action}' is not supported on step {step}")]
    UnsupportedAction { step: Step, action: String },

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("No screen registered for step {0}")]
    ScreenNotFound(Step),

    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = std::result::Result<T, JourneyError>;
