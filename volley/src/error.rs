//! error module define the crate level [Error] and [Result]

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// invalid command line input, reported before any work starts
    Config(String),

    /// the http client could not be built
    Client(reqwest::Error),

    /// a spawned task could not be joined
    Join(tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "{}", msg),
            Error::Client(err) => {
                write!(f, "failed to build http client: {}", err)
            },
            Error::Join(err) => write!(f, "task failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(_) => None,
            Error::Client(err) => Some(err),
            Error::Join(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Client(err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Join(err)
    }
}
