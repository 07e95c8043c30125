/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Queue errors with serialization support
///
/// Popping an empty queue is not an error anywhere in this crate; it yields
/// `None`. These variants cover misuse of the indexed collaborators and
/// invalid configuration.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Queue is empty")]
    #[diagnostic(
        code(queue::empty),
        help("Check is_empty() before peeking, or use pop() which returns None when empty.")
    )]
    Empty,

    #[error("Index {index} out of range for queue of length {len}")]
    #[diagnostic(
        code(queue::index_out_of_range),
        help("Valid indices are 0..len from the front, or -len..-1 from the back.")
    )]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Invalid capacity: {0}")]
    #[diagnostic(
        code(queue::invalid_capacity),
        help("Capacity must be a power of two and at least 2.")
    )]
    InvalidCapacity(usize),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(queue::invalid_config),
        help("Check LFQ_* environment variables hold positive integers.")
    )]
    Config(String),

    #[error("Verification failed: {0}")]
    #[diagnostic(
        code(queue::verification_failed),
        help("A value was lost, duplicated or invented under concurrency. Re-run with RUST_LOG=debug.")
    )]
    VerificationFailed(String),
}

/// Result alias for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
