//! Boundary behaviour, generic over the backing capability.
//!
//! The exported entry points are one-line delegations to these functions with
//! the process allocator plugged in. Tests call them directly with fakes to
//! reach the refusal paths deterministically.
//!
//! Request handling in [`allocate_in`]:
//!
//! | Request | Result |
//! |---|---|
//! | `align` zero or not a power of two | null |
//! | `size == 0`, valid `align` | `align` as a dangling address, no allocator call |
//! | `size` rounded up to `align` exceeds `isize::MAX` | null |
//! | capability refuses | null |
//! | capability succeeds | the block address |
//!
//! Every zero-size request with the same `align` yields the same address, so
//! such results cannot serve as identity keys.
//!
//! A rejected or refused request emits a `debug` event carrying `size`,
//! `align` and the error.

use std::ffi::c_void;
use std::ptr::{self, NonNull};

use hostalloc_core::{BlockAllocator, BlockLayout, LayoutError};

/// Allocate `size` bytes aligned to `align` from `alloc`.
///
/// Returns null on any failure. Never panics on a refused request.
pub fn allocate_in<A>(alloc: &A, size: usize, align: usize) -> *mut c_void
where
    A: BlockAllocator + ?Sized,
{
    let layout = match BlockLayout::new(size, align) {
        Ok(layout) => layout,
        // Zero-size blocks never reach the allocator; any non-null,
        // well-aligned address will do.
        Err(LayoutError::ZeroSize) => return ptr::without_provenance_mut(align),
        Err(e) => {
            tracing::debug!(size, align, error = %e, "allocation request rejected");
            return ptr::null_mut();
        }
    };

    match alloc.allocate(layout) {
        Ok(block) => block.as_ptr().cast(),
        Err(e) => {
            tracing::debug!(size, align, error = %e, "allocation request refused");
            ptr::null_mut()
        }
    }
}

/// Release a block previously returned by [`allocate_in`] on `alloc`.
///
/// A null `ptr`, a zero `size`, or a `(size, align)` pair no successful
/// allocation could have had are no-ops.
///
/// # Safety
///
/// Unless one of the no-op cases above applies:
/// - `ptr` must have been returned by `allocate_in` with the same `alloc` and
///   not yet released.
/// - `size` and `align` must be exactly the values passed to that call.
///
/// Violations are not detected and may corrupt the heap.
#[allow(unsafe_code)]
pub unsafe fn deallocate_in<A>(alloc: &A, ptr: *mut c_void, size: usize, align: usize)
where
    A: BlockAllocator + ?Sized,
{
    let Some(block) = NonNull::new(ptr.cast::<u8>()) else {
        return;
    };
    // Zero-size or impossible layouts were never handed to the allocator.
    let Ok(layout) = BlockLayout::new(size, align) else {
        return;
    };
    // SAFETY: caller guarantees `block` came from `alloc` with this layout.
    unsafe { alloc.deallocate(block, layout) }
}
