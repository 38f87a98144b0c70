//! Test utilities and fake allocators for hostalloc development.
//!
//! Two [`BlockAllocator`](hostalloc_core::BlockAllocator) wrappers for
//! driving the boundary deterministically:
//!
//! - [`FailAfter`] — refuses every request after N successes.
//! - [`CountingAllocator`] — tracks live blocks and bytes.
//!
//! Plus [`fill_pattern`]/[`holds_pattern`] helpers for checking that a block
//! is genuinely usable and untouched, and [`capture_events`] for asserting on
//! the `tracing` events a call emits.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod capture;
pub mod fixtures;

pub use capture::{capture_events, CapturedEvent};
pub use fixtures::{fill_pattern, holds_pattern, CountingAllocator, FailAfter};
