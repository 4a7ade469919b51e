use std::{error::Error, fmt};

#[derive(Debug)]
pub enum StoreError {
    Transport(Box<dyn Error + Send + Sync + 'static>),
    Status(u16),
    LockError(String),
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use StoreError::*;
        match self {
            Transport(e) => Some(e.as_ref() as &dyn Error),
            _ => None,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StoreError::*;
        match self {
            Transport(e) => write!(f, "Transport: {}", e),
            Status(code) => write!(f, "Status: store returned {}", code),
            LockError(s) => write!(f, "LockError: {}", s),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Transport(Box::new(error))
    }
}

#[derive(Debug)]
pub enum WishlistError {
    Validation(String),
    NotFound(String),
    Store(StoreError),
}

impl fmt::Display for WishlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WishlistError::*;
        match self {
            Validation(s) => write!(f, "ValidationError: {}", s),
            NotFound(id) => write!(f, "NotFoundError: no item {}", id),
            Store(e) => write!(f, "StoreError: {}", crate::unpack_error(e)),
        }
    }
}

impl std::error::Error for WishlistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use WishlistError::*;
        match self {
            Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for WishlistError {
    fn from(error: StoreError) -> Self {
        WishlistError::Store(error)
    }
}
