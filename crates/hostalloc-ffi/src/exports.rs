//! The exported C entry points.
//!
//! Both functions back onto the process-wide global allocator. With the
//! `trace-calls` feature every call is additionally reported through
//! `tracing` via [`Traced`](hostalloc_core::Traced).

use std::ffi::c_void;

use hostalloc_core::SystemAllocator;
#[cfg(feature = "trace-calls")]
use hostalloc_core::Traced;

use crate::boundary::{allocate_in, deallocate_in};

#[cfg(not(feature = "trace-calls"))]
static BACKING: SystemAllocator = SystemAllocator;
#[cfg(feature = "trace-calls")]
static BACKING: Traced<SystemAllocator> = Traced::new(SystemAllocator);

/// Allocate `size` bytes aligned to `align` from the process allocator.
///
/// Returns the block address, or null if the request cannot be satisfied
/// (out of memory, `align` not a power of two, or `size` too large to
/// represent once rounded up to `align`). Never aborts or unwinds.
///
/// A zero `size` with a valid `align` returns a non-null address equal to
/// `align` that must not be dereferenced; releasing it is a no-op. Every such
/// request with the same `align` returns the same address, so zero-size
/// results are not unique and must not be used as identity keys.
///
/// The returned block is uninitialised and owned by the caller until passed
/// to [`hostalloc_deallocate`] with the same `size` and `align`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hostalloc_allocate(size: usize, align: usize) -> *mut c_void {
    ffi_guard_or!(std::ptr::null_mut(), { allocate_in(&BACKING, size, align) })
}

/// Release a block obtained from [`hostalloc_allocate`].
///
/// A null `ptr` or a zero `size` is a no-op.
///
/// # Safety
///
/// - `ptr` must have been returned by `hostalloc_allocate` and not yet
///   released.
/// - `size` and `align` must be exactly the values passed to that call.
///
/// The allocator relies on the caller's `size` and `align` instead of
/// per-block metadata. A mismatched pair, a foreign pointer, or a double
/// release is undefined behaviour and is not detected.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn hostalloc_deallocate(ptr: *mut c_void, size: usize, align: usize) {
    ffi_guard_or!((), {
        // SAFETY: forwarded caller contract.
        unsafe { deallocate_in(&BACKING, ptr, size, align) }
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn allocate_32_aligned_16_through_exported_symbols() {
        let a = hostalloc_allocate(32, 16);
        assert!(!a.is_null());
        assert_eq!(a as usize % 16, 0);

        // SAFETY: `a` is a live 32-byte block.
        unsafe {
            std::ptr::write_bytes(a.cast::<u8>(), 0xAB, 32);
            let block = std::slice::from_raw_parts(a.cast::<u8>(), 32);
            assert!(block.iter().all(|&b| b == 0xAB));
            hostalloc_deallocate(a, 32, 16);
        }
    }

    #[test]
    fn maximum_size_request_returns_null() {
        assert!(hostalloc_allocate(usize::MAX, 1).is_null());
        assert!(hostalloc_allocate(usize::MAX, 64).is_null());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn unbackable_request_returns_null() {
        // Representable as a layout, but larger than any 64-bit address space.
        let size = (isize::MAX as usize) & !63;
        assert!(hostalloc_allocate(size, 64).is_null());
    }

    #[test]
    fn invalid_alignment_returns_null() {
        assert!(hostalloc_allocate(16, 0).is_null());
        assert!(hostalloc_allocate(16, 48).is_null());
    }

    #[test]
    fn zero_size_round_trip() {
        let p = hostalloc_allocate(0, 16);
        assert_eq!(p as usize, 16);
        // SAFETY: zero-size release is a no-op.
        unsafe { hostalloc_deallocate(p, 0, 16) };
    }

    #[test]
    fn zero_size_results_share_an_address() {
        assert_eq!(hostalloc_allocate(0, 16), hostalloc_allocate(0, 16));
    }

    #[test]
    #[cfg(feature = "trace-calls")]
    fn trace_calls_backing_reports_through_tracing() {
        use hostalloc_test_utils::capture_events;

        let ((), events) = capture_events(|| {
            let p = hostalloc_allocate(32, 16);
            assert!(!p.is_null());
            // SAFETY: p came from hostalloc_allocate with (32, 16).
            unsafe { hostalloc_deallocate(p, 32, 16) };
        });
        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["allocate", "deallocate"]);
        assert!(events.iter().all(|e| e.level == tracing::Level::TRACE));
    }

    #[test]
    fn null_release_is_ignored() {
        // SAFETY: null is a documented no-op.
        unsafe { hostalloc_deallocate(std::ptr::null_mut(), 64, 8) };
    }

    #[test]
    fn symbols_have_c_signatures() {
        let _: extern "C" fn(usize, usize) -> *mut c_void = hostalloc_allocate;
        let _: unsafe extern "C" fn(*mut c_void, usize, usize) = hostalloc_deallocate;
    }
}
