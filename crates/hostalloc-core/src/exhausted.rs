//! A capability that refuses every request.

use std::ptr::NonNull;

use crate::error::AllocError;
use crate::layout::BlockLayout;
use crate::traits::BlockAllocator;

/// Always reports [`AllocError::Exhausted`].
///
/// Stands in for a heap with no space left, which makes the boundary's
/// null-on-failure path reachable without exhausting real memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exhausted;

// SAFETY: never hands out a block.
#[allow(unsafe_code)]
unsafe impl BlockAllocator for Exhausted {
    #[inline]
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError> {
        Err(AllocError::Exhausted {
            size: layout.size(),
            align: layout.align(),
        })
    }

    #[inline]
    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: BlockLayout) {
        unreachable!("deallocation of a block Exhausted never allocated");
    }
}
