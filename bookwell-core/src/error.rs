use thiserror::Error;

pub use sqlx::Error as DatabaseError;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Notification transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
