//! C ABI allocation bridge.
//!
//! Exposes two unmangled `extern "C"` entry points that let a foreign caller
//! allocate and release memory from this process's global allocator with an
//! explicit size and alignment:
//!
//! ```c
//! void *hostalloc_allocate(size_t size, size_t align);
//! void hostalloc_deallocate(void *ptr, size_t size, size_t align);
//! ```
//!
//! Allocation failure is reported as `NULL`, never as an abort or an unwind.
//! Deallocation must be given exactly the `size` and `align` the block was
//! allocated with; anything else is undefined behaviour and is not checked.
//!
//! Every entry point body runs inside `catch_unwind`. A caught panic yields
//! the entry point's neutral result and its message can be read back with
//! [`hostalloc_last_panic_message`].
//!
//! The C header is generated into `include/hostalloc.h` by `build.rs`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    /// Message of the most recent panic caught at the boundary on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Run `$body` under `catch_unwind`, returning `$default` if it panics.
///
/// `return` inside `$body` returns from the guarded closure, not from the
/// enclosing function.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {{
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::store_panic(payload);
                $default
            }
        }
    }};
}

pub mod boundary;
pub mod exports;

pub use boundary::{allocate_in, deallocate_in};
pub use exports::{hostalloc_allocate, hostalloc_deallocate};

/// Record a caught panic payload in [`LAST_PANIC`].
pub(crate) fn store_panic(payload: Box<dyn Any + Send>) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    };
    tracing::warn!(panic = %msg, "panic caught at allocation boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the message of the last panic caught on this thread into `buf`.
///
/// Writes at most `cap - 1` bytes followed by a null terminator. Returns the
/// full message length in bytes (excluding the terminator), so a caller can
/// pass a null `buf` or zero `cap` to size its buffer first. Returns 0 if no
/// panic has been caught on this thread.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hostalloc_last_panic_message(buf: *mut c_char, cap: usize) -> usize {
    ffi_guard_or!(0, {
        LAST_PANIC.with(|cell| {
            let msg = cell.borrow();
            let bytes = msg.as_bytes();
            if !buf.is_null() && cap > 0 {
                let copy_len = bytes.len().min(cap - 1);
                // SAFETY: buf points to cap valid bytes per caller contract.
                unsafe {
                    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), copy_len);
                    *buf.add(copy_len) = 0;
                }
            }
            bytes.len()
        })
    })
}
