//! The process-wide global allocator as a [`BlockAllocator`].

use std::alloc;
use std::ptr::NonNull;

use crate::error::AllocError;
use crate::layout::BlockLayout;
use crate::traits::BlockAllocator;

/// Forwards to the process's `#[global_allocator]` (the platform allocator
/// unless the host binary installs another).
///
/// Uses the non-aborting `std::alloc::alloc` path: a null result becomes
/// [`AllocError::Exhausted`] and `handle_alloc_error` is never called.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

// SAFETY: `std::alloc::alloc` returns blocks that fit the layout and do not
// overlap live blocks; they stay valid until `dealloc`.
#[allow(unsafe_code)]
unsafe impl BlockAllocator for SystemAllocator {
    #[inline]
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: `BlockLayout` guarantees a non-zero size.
        let ptr = unsafe { alloc::alloc(layout.get()) };
        NonNull::new(ptr).ok_or(AllocError::Exhausted {
            size: layout.size(),
            align: layout.align(),
        })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: BlockLayout) {
        // SAFETY: caller guarantees `ptr` came from `allocate` with `layout`.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout.get()) }
    }
}
