//! Request-time errors and their mapping onto response status codes.

use thiserror::Error;

use crate::http::response::StatusCode;

/// Everything that can go wrong while reading a request off the wire.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    MalformedRequestLine,

    #[error("request target must start with '/': {0:?}")]
    InvalidTarget(String),

    #[error("malformed header line")]
    InvalidHeader,

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("conflicting Content-Length values: {0} and {1}")]
    ConflictingContentLength(usize, usize),

    #[error("request headers exceed {0} bytes")]
    HeadersTooLarge(usize),

    #[error("request body of {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: usize, limit: usize },

    #[error("HTTP version not supported: {0}")]
    VersionNotSupported(String),

    #[error("no route for {method} {target}")]
    NotFound { method: String, target: String },

    #[error("timed out reading {0}")]
    Timeout(&'static str),

    #[error("connection closed before the header block was terminated")]
    UnterminatedHeaders,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of a [`ParseError`] for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    RequestTimeout,
    HttpVersionNotSupported,
    InternalServerError,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MalformedRequestLine
            | ParseError::InvalidTarget(_)
            | ParseError::InvalidHeader
            | ParseError::InvalidContentLength(_)
            | ParseError::ConflictingContentLength(..)
            | ParseError::HeadersTooLarge(_)
            | ParseError::BodyTooLarge { .. } => ErrorKind::BadRequest,
            ParseError::VersionNotSupported(_) => ErrorKind::HttpVersionNotSupported,
            ParseError::NotFound { .. } => ErrorKind::NotFound,
            ParseError::Timeout(_) => ErrorKind::RequestTimeout,
            ParseError::UnterminatedHeaders | ParseError::Io(_) => ErrorKind::InternalServerError,
        }
    }
}

/// Maps an error kind onto the status sent back to the client.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::BadRequest => StatusCode::BadRequest,
        ErrorKind::NotFound => StatusCode::NotFound,
        ErrorKind::RequestTimeout => StatusCode::RequestTimeout,
        ErrorKind::HttpVersionNotSupported => StatusCode::HttpVersionNotSupported,
        ErrorKind::InternalServerError => StatusCode::InternalServerError,
    }
}
