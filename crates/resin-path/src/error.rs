//! Error types for the path kernel.

use thiserror::Error;

/// Errors produced by path parsing and the boolean engine.
///
/// Degenerate geometry is never an error: operations clamp or return their
/// input unchanged instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Malformed path data not covered by a more specific variant.
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset in the input.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// Input ended in the middle of a command.
    #[error("unexpected end of path data, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for.
        expected: &'static str,
    },

    /// A command letter outside the supported set.
    #[error("unsupported command '{command}' at offset {offset}")]
    UnsupportedCommand {
        /// The offending character.
        command: char,
        /// Byte offset in the input.
        offset: usize,
    },

    /// A number could not be parsed.
    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber {
        /// The text that failed to parse.
        text: String,
        /// Byte offset in the input.
        offset: usize,
    },

    /// An arc flag other than `0` or `1`.
    #[error("invalid arc flag at offset {offset}: expected 0 or 1")]
    InvalidFlag {
        /// Byte offset in the input.
        offset: usize,
    },

    /// Path data that does not begin with `M`.
    #[error("path data must start with a move command (offset {offset})")]
    MissingMoveTo {
        /// Byte offset of the first command.
        offset: usize,
    },

    /// Input with more than one subpath where exactly one was expected.
    #[error("expected a single subpath, found {0}")]
    MultipleSubpaths(usize),

    /// Input containing no commands at all.
    #[error("empty path data")]
    Empty,

    /// An internal state the algorithms treat as unreachable.
    #[error("invariant violated: {0}")]
    InvariantViolated(&'static str),
}

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;
