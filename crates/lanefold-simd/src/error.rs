//! Error types for vector kernels and reductions

use thiserror::Error;

/// Errors raised when a caller violates a kernel's preconditions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimdError {
    /// The requested element count exceeds the buffer
    #[error("Reduction size out of bounds: size {size} exceeds buffer length {len}")]
    SizeOutOfBounds {
        /// Requested element count
        size: usize,
        /// Length of the buffer actually provided
        len: usize,
    },

    /// Operand and output buffers disagree in length
    #[error("Length mismatch in {operation}: lhs {lhs}, rhs {rhs}, output {output}")]
    LengthMismatch {
        /// The kernel that rejected its inputs
        operation: &'static str,
        /// Length of the left operand
        lhs: usize,
        /// Length of the right operand
        rhs: usize,
        /// Length of the output buffer
        output: usize,
    },

    /// A parallel reduction was asked to split into empty chunks
    #[error("Invalid chunk length {0}: must be at least 1")]
    InvalidChunkLen(usize),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, SimdError>;
