//! Error types for layout validation and allocation.
//!
//! Neither type crosses the C boundary. The boundary collapses every error
//! into a null address; these exist so Rust callers and tests can tell the
//! refusal reasons apart.

use std::error::Error;
use std::fmt;

/// Errors from validating a `(size, align)` request into a
/// [`BlockLayout`](crate::BlockLayout).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The request was for zero bytes. Zero-size blocks never reach a
    /// [`BlockAllocator`](crate::BlockAllocator).
    ZeroSize,
    /// The alignment is zero or not a power of two.
    InvalidAlign {
        /// The rejected alignment.
        align: usize,
    },
    /// `size` rounded up to `align` does not fit in `isize`.
    SizeOverflow {
        /// Number of bytes requested.
        size: usize,
        /// Alignment requested.
        align: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize => write!(f, "zero-size layout"),
            Self::InvalidAlign { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::SizeOverflow { size, align } => {
                write!(
                    f,
                    "size {size} rounded up to alignment {align} exceeds isize::MAX"
                )
            }
        }
    }
}

impl Error for LayoutError {}

/// Errors returned by a [`BlockAllocator`](crate::BlockAllocator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The capability could not satisfy the request (out of memory, or a
    /// fake configured to refuse).
    Exhausted {
        /// Number of bytes requested.
        size: usize,
        /// Alignment requested.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { size, align } => {
                write!(
                    f,
                    "allocation of {size} bytes aligned to {align} could not be satisfied"
                )
            }
        }
    }
}

impl Error for AllocError {}
