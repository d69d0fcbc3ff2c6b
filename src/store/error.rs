use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// A project, markdown or image name that is not a single, plain path component.
    InvalidName(String),
    NotFound(String),
    AlreadyExists(String),
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidName(name) => write!(f, "\"{name}\" is not a valid name"),
            StoreError::NotFound(what) => write!(f, "{what} does not exist"),
            StoreError::AlreadyExists(what) => write!(f, "{what} already exists"),
            StoreError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(item: std::io::Error) -> Self {
        StoreError::Io(item)
    }
}
