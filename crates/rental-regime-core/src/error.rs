use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalRegimeError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentalRegimeError {
    fn from(e: serde_json::Error) -> Self {
        RentalRegimeError::SerializationError(e.to_string())
    }
}
