use actix::MailboxError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields (missing: {})", .0.join(", "))]
    EmptyFields(Vec<&'static str>),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored ideas are malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unable to encode ideas: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum IdeaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Actor mailbox error: {0}")]
    Mailbox(#[from] MailboxError),
}
