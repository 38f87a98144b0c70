//! The allocation capability the boundary is written against.

use std::ptr::NonNull;

use crate::error::AllocError;
use crate::layout::BlockLayout;

/// A capability that hands out and takes back aligned blocks of memory.
///
/// The C boundary never touches the heap directly; it asks a
/// `BlockAllocator`. Production code uses
/// [`SystemAllocator`](crate::SystemAllocator), tests substitute fakes that
/// can refuse requests on demand.
///
/// Failure is a value, not a fault: `allocate` reports an exhausted heap with
/// [`AllocError`] and must never abort or unwind for that reason.
///
/// # Safety
///
/// Implementors must guarantee that every block returned by `allocate`:
/// - is at least `layout.size()` bytes long and aligned to `layout.align()`,
/// - does not overlap any other live block from the same capability,
/// - stays valid until passed to `deallocate`, even if `self` is moved.
#[allow(unsafe_code)]
pub unsafe trait BlockAllocator {
    /// Allocate a block that fits `layout`.
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the capability.
    ///
    /// # Safety
    ///
    /// - `ptr` must have been returned by `allocate` on this capability and
    ///   not yet deallocated.
    /// - `layout` must be identical to the layout passed to that `allocate`
    ///   call. Implementations may rely on this to avoid storing per-block
    ///   metadata, so a mismatch can corrupt the heap.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: BlockLayout);
}

// SAFETY: forwards to `A`, which upholds the contract.
#[allow(unsafe_code)]
unsafe impl<A> BlockAllocator for &A
where
    A: BlockAllocator + ?Sized,
{
    #[inline]
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: BlockLayout) {
        // SAFETY: caller upholds the contract for `A`.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}
