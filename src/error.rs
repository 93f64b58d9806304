//! Error types for distance computation, clustering and tree construction.
//!
//! This module provides [PhyloError] and [ErrorKind]. All failures are
//! immediate and local: nothing is retried and no partial result is returned.

use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, PhyloError>;

// =#========================================================================#=
// ERROR KIND
// =#========================================================================#=
/// Coarse classification of a [PhyloError], convenient for matching.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// Shape or size mismatch in the input.
    InvalidInput,
    /// Malformed Newick string.
    Format,
    /// Distance model or linkage method that is deliberately not provided.
    NotImplemented,
    /// Reading or writing a file failed.
    Io,
}

// =#========================================================================#=
// PHYLO ERROR
// =#========================================================================#=
/// Errors that can occur while computing distances, clustering,
/// building trees or parsing Newick strings.
#[derive(Debug, Error)]
pub enum PhyloError {
    /// Shape or size mismatch, e.g. fewer than three sequences, unequal
    /// sequence lengths, wrong length of a distance array or an
    /// out-of-range node reference.
    #[error("Invalid input - {0}")]
    InvalidInput(String),

    /// Malformed Newick string (unbalanced parentheses, no commas,
    /// empty parenthesis group, unreadable branch length, ...).
    #[error("Invalid Newick string - {message} at position {position}")]
    Format {
        /// Description of the problem
        message: String,
        /// Byte offset into the cleaned Newick string
        position: usize,
    },

    /// Requested method exists by name but is not implemented.
    #[error("Not implemented - {0}")]
    NotImplemented(String),

    /// IO error from one of the file helpers.
    #[error("IO error - {0}")]
    Io(#[from] std::io::Error),
}

impl PhyloError {
    /// Convenience constructor for [PhyloError::InvalidInput]
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        PhyloError::InvalidInput(msg.into())
    }

    /// Convenience constructor for [PhyloError::Format] at the given position
    pub fn format_at<S: Into<String>>(position: usize, msg: S) -> Self {
        PhyloError::Format { message: msg.into(), position }
    }

    /// Convenience constructor for [PhyloError::NotImplemented]
    pub fn not_implemented<S: Into<String>>(what: S) -> Self {
        PhyloError::NotImplemented(what.into())
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhyloError::InvalidInput(_) => ErrorKind::InvalidInput,
            PhyloError::Format { .. } => ErrorKind::Format,
            PhyloError::NotImplemented(_) => ErrorKind::NotImplemented,
            PhyloError::Io(_) => ErrorKind::Io,
        }
    }

    /// Get the position where a Newick format error occurred, `None` for other errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            PhyloError::Format { position, .. } => Some(*position),
            _ => None,
        }
    }
}
