use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid object ID: {0}")]
    InvalidObjectId(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl PersistError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::ThreadNotFound(_) | PersistError::UserNotFound(_))
    }

    /// Re-raise a store-level failure under the name of the operation that hit it.
    ///
    /// Not-found, configuration and id-format errors carry their own meaning
    /// and are passed through untouched.
    pub fn during(self, operation: &str) -> Self {
        match self {
            PersistError::Storage(msg) | PersistError::Connection(msg) => {
                PersistError::Storage(format!("{}: {}", operation, msg))
            }
            other => other,
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for PersistError {
    fn from(e: mongodb::error::Error) -> Self {
        PersistError::Storage(e.to_string())
    }
}

#[cfg(feature = "mongodb")]
impl From<bson::ser::Error> for PersistError {
    fn from(e: bson::ser::Error) -> Self {
        PersistError::Storage(format!("BSON serialization error: {}", e))
    }
}

#[cfg(feature = "mongodb")]
impl From<bson::de::Error> for PersistError {
    fn from(e: bson::de::Error) -> Self {
        PersistError::Storage(format!("BSON deserialization error: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;

/// Attach an operation name to the error of a repository call.
pub(crate) trait OperationExt<T> {
    fn during(self, operation: &str) -> Result<T>;
}

impl<T> OperationExt<T> for Result<T> {
    fn during(self, operation: &str) -> Result<T> {
        self.map_err(|e| e.during(operation))
    }
}
