use derive_more::Display;

pub mod server;

#[derive(Debug, Display)]
pub enum WebError {
    Io(std::io::Error),
    MissingField(&'static str),
    Serialization(serde_json::Error),
    InvalidRequest,
    NotFound,
}

impl From<std::io::Error> for WebError {
    fn from(err: std::io::Error) -> Self {
        WebError::Io(err)
    }
}

impl From<serde_json::Error> for WebError {
    fn from(err: serde_json::Error) -> Self {
        WebError::Serialization(err)
    }
}

impl std::error::Error for WebError {}

pub type Result<T> = std::result::Result<T, WebError>;
