#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing start time")]
    MissingStartTime,
    #[error("invalid duration")]
    InvalidDuration,
    #[error("invalid RPE")]
    InvalidRPE,
    #[error("at least one exercise with one valid set required")]
    NoValidExercise,
    #[error("at least one exercise required")]
    NoRoutineExercise,
    #[error("name must not be empty")]
    EmptyName,
    #[error("invalid batch: {0}")]
    InvalidBatch(String),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("\"{0}\" already exists")]
    Conflict(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Serialization(value.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("no connection")]
    NoConnection,
    #[error("{status} {status_text}: {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("deserialization failed: {0}")]
    Deserialization(String),
    #[error("invalid request: {0}")]
    Request(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
