//! Core types and traits for the hostalloc allocation bridge.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! allocation capability the C boundary is written against, the validated
//! layout type it speaks in, and the allocators that satisfy it:
//!
//! - [`SystemAllocator`]: the process-wide global allocator.
//! - [`Exhausted`]: refuses every request.
//! - [`Traced`]: forwards to another capability, emitting `tracing` events.
//!
//! The boundary never decides allocation policy itself. Everything that
//! touches the heap goes through a [`BlockAllocator`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod exhausted;
pub mod layout;
pub mod system;
pub mod traced;
pub mod traits;

// Public re-exports for the primary API surface.
pub use error::{AllocError, LayoutError};
pub use exhausted::Exhausted;
pub use layout::BlockLayout;
pub use system::SystemAllocator;
pub use traced::Traced;
pub use traits::BlockAllocator;
