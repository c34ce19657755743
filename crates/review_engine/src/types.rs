use std::fmt;

use review_core::{PollCursor, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} from {url}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    /// The request never produced a usable HTTP exchange.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, FailureKind::Transport | FailureKind::Timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Transport,
    Timeout,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Transport => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidBody => write!(f, "invalid response body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("messenger request failed: {0}")]
    Transport(String),
    #[error("messenger rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("messenger refused message: {0}")]
    Refused(String),
}

/// Everything that can end a poll cycle early.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed,
}

/// Summary of a cycle that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub records: usize,
    pub delivered: usize,
    pub cursor: PollCursor,
    pub cursor_advanced: bool,
}
