//! Error types for the playlist API client.
//!
//! # Design
//! Every failure carries the [`Operation`] it came from, so a caller can ask
//! for the failure [`ErrorKind`] without caring whether the server answered
//! with a bad status or the request never got a response. Non-2xx responses
//! keep the status code and a human-readable message taken from the body's
//! `detail` field when the server sent one.

use std::fmt;

use thiserror::Error;

/// The logical client operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    List,
    ListByCreator,
    GetById,
    AddSong,
    RemoveSong,
    Delete,
    ListPublic,
    ListSongs,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::ListByCreator => "list_by_creator",
            Operation::GetById => "get_by_id",
            Operation::AddSong => "add_song",
            Operation::RemoveSong => "remove_song",
            Operation::Delete => "delete",
            Operation::ListPublic => "list_public",
            Operation::ListSongs => "list_songs",
        }
    }

    /// The failure kind reported for this operation.
    pub fn failure_kind(self) -> ErrorKind {
        match self {
            Operation::Create => ErrorKind::RequestFailed,
            Operation::AddSong => ErrorKind::AddSongFailed,
            Operation::RemoveSong => ErrorKind::RemoveSongFailed,
            Operation::Delete => ErrorKind::DeleteFailed,
            Operation::List
            | Operation::ListByCreator
            | Operation::GetById
            | Operation::ListPublic
            | Operation::ListSongs => ErrorKind::FetchFailed,
        }
    }

    /// Message used when the server gives no `detail`.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Create => "Failed to create playlist",
            Operation::List | Operation::ListByCreator => "Failed to fetch playlists",
            Operation::GetById => "Failed to fetch playlist",
            Operation::AddSong => "Failed to add song",
            Operation::RemoveSong => "Failed to remove song",
            Operation::Delete => "Failed to delete playlist",
            Operation::ListPublic => "Failed to fetch public playlists",
            Operation::ListSongs => "Failed to fetch songs",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation-specific failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RequestFailed,
    FetchFailed,
    AddSongFailed,
    RemoveSongFailed,
    DeleteFailed,
}

/// Boxed error produced by a [`crate::Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        operation: Operation,
        status: u16,
        message: String,
    },

    /// No response was received (connection refused, timeout, ...).
    #[error("{}: {source}", .operation.fallback_message())]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },

    /// A 2xx response body did not have the expected shape.
    #[error("{operation}: invalid response body: {message}")]
    Decode { operation: Operation, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("{operation}: serialization failed: {message}")]
    Encode { operation: Operation, message: String },

    /// The arguments were rejected before any request was sent.
    #[error("{operation}: {message}")]
    InvalidInput { operation: Operation, message: String },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Http { operation, .. }
            | ApiError::Transport { operation, .. }
            | ApiError::Decode { operation, .. }
            | ApiError::Encode { operation, .. }
            | ApiError::InvalidInput { operation, .. } => *operation,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.operation().failure_kind()
    }

    /// HTTP status code, when the server produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn invalid_input(operation: Operation, message: &str) -> Self {
        ApiError::InvalidInput {
            operation,
            message: message.to_string(),
        }
    }
}
