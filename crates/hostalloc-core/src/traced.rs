//! Event-emitting wrapper around another capability.

use std::ptr::NonNull;

use crate::error::AllocError;
use crate::layout::BlockLayout;
use crate::traits::BlockAllocator;

/// Forwards every call to `A` and emits a `trace`-level `tracing` event
/// describing it.
///
/// Events carry `size`, `align` and the block address (or the error on a
/// refused request). With no subscriber installed the cost is a callsite
/// interest check per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct Traced<A> {
    inner: A,
}

impl<A> Traced<A> {
    /// Wrap `inner`.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }

    /// The wrapped capability.
    pub fn get(&self) -> &A {
        &self.inner
    }

    /// Unwrap, returning the inner capability.
    pub fn into_inner(self) -> A {
        self.inner
    }
}

// SAFETY: forwards to `A` without altering pointers or layouts.
#[allow(unsafe_code)]
unsafe impl<A> BlockAllocator for Traced<A>
where
    A: BlockAllocator,
{
    #[inline]
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError> {
        let result = self.inner.allocate(layout);
        match &result {
            Ok(ptr) => tracing::trace!(
                size = layout.size(),
                align = layout.align(),
                addr = ?ptr.as_ptr(),
                "allocate"
            ),
            Err(e) => tracing::trace!(
                size = layout.size(),
                align = layout.align(),
                error = %e,
                "allocate refused"
            ),
        }
        result
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: BlockLayout) {
        tracing::trace!(
            size = layout.size(),
            align = layout.align(),
            addr = ?ptr.as_ptr(),
            "deallocate"
        );
        // SAFETY: caller upholds the contract for `A`.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::{Exhausted, SystemAllocator};

    #[test]
    fn forwards_to_inner() {
        let traced = Traced::new(SystemAllocator);
        let layout = BlockLayout::new(64, 64).unwrap();
        let ptr = traced.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        // SAFETY: ptr came from `traced` with `layout`.
        unsafe { traced.deallocate(ptr, layout) };
    }

    #[test]
    fn refusal_passes_through_unchanged() {
        let traced = Traced::new(Exhausted);
        let layout = BlockLayout::new(16, 8).unwrap();
        assert_eq!(
            traced.allocate(layout),
            Err(AllocError::Exhausted { size: 16, align: 8 })
        );
    }

    #[test]
    fn into_inner_returns_wrapped_value() {
        let traced = Traced::new(Exhausted);
        let _: &Exhausted = traced.get();
        let _: Exhausted = traced.into_inner();
    }
}
