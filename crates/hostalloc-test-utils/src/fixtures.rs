//! Reusable allocator fixtures.

use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use hostalloc_core::{AllocError, BlockAllocator, BlockLayout, SystemAllocator};

/// Succeeds a configurable number of times, then refuses every request.
///
/// Simulates heap exhaustion part-way through a workload. Uses `AtomicUsize`
/// for the call counter so it can be shared across threads.
#[derive(Debug)]
pub struct FailAfter<A = SystemAllocator> {
    inner: A,
    succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailAfter<SystemAllocator> {
    /// Back onto the system allocator for `succeed_count` allocations.
    pub fn new(succeed_count: usize) -> Self {
        Self::wrap(SystemAllocator, succeed_count)
    }
}

impl<A> FailAfter<A> {
    /// Back onto `inner` for `succeed_count` allocations.
    pub fn wrap(inner: A, succeed_count: usize) -> Self {
        Self {
            inner,
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `allocate()` has been called, refused calls included.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Reset the call counter, re-arming the successes.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::Relaxed);
    }
}

// SAFETY: forwards to `A` or refuses; never fabricates a block.
#[allow(unsafe_code)]
unsafe impl<A> BlockAllocator for FailAfter<A>
where
    A: BlockAllocator,
{
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(AllocError::Exhausted {
                size: layout.size(),
                align: layout.align(),
            });
        }
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: BlockLayout) {
        // SAFETY: caller upholds the contract for `A`.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

/// Wraps a capability and counts what passes through it.
///
/// `live_blocks`/`live_bytes` return to zero once every block handed out has
/// been released, which is how steady-state tests detect leaks.
#[derive(Debug, Default)]
pub struct CountingAllocator<A = SystemAllocator> {
    inner: A,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    live_blocks: AtomicUsize,
    live_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
}

impl CountingAllocator<SystemAllocator> {
    /// Count calls into the system allocator.
    pub fn new() -> Self {
        Self::wrap(SystemAllocator)
    }
}

impl<A> CountingAllocator<A> {
    /// Count calls into `inner`.
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            allocations: AtomicUsize::new(0),
            deallocations: AtomicUsize::new(0),
            live_blocks: AtomicUsize::new(0),
            live_bytes: AtomicUsize::new(0),
            peak_bytes: AtomicUsize::new(0),
        }
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    /// Deallocations so far.
    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::SeqCst)
    }

    /// Blocks allocated and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.live_blocks.load(Ordering::SeqCst)
    }

    /// Requested bytes currently outstanding.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::SeqCst)
    }

    /// High-water mark of `live_bytes`.
    pub fn peak_bytes(&self) -> usize {
        self.peak_bytes.load(Ordering::SeqCst)
    }
}

// SAFETY: forwards to `A` without altering pointers or layouts.
#[allow(unsafe_code)]
unsafe impl<A> BlockAllocator for CountingAllocator<A>
where
    A: BlockAllocator,
{
    fn allocate(&self, layout: BlockLayout) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(layout)?;
        self.allocations.fetch_add(1, Ordering::SeqCst);
        self.live_blocks.fetch_add(1, Ordering::SeqCst);
        let live = self.live_bytes.fetch_add(layout.size(), Ordering::SeqCst) + layout.size();
        self.peak_bytes.fetch_max(live, Ordering::SeqCst);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: BlockLayout) {
        // SAFETY: caller upholds the contract for `A`.
        unsafe { self.inner.deallocate(ptr, layout) };
        self.live_blocks.fetch_sub(1, Ordering::SeqCst);
        self.live_bytes.fetch_sub(layout.size(), Ordering::SeqCst);
        self.deallocations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fill `len` bytes at `ptr` with a pattern derived from `seed`.
///
/// # Safety
///
/// `ptr` must be valid for writes of `len` bytes.
#[allow(unsafe_code)]
pub unsafe fn fill_pattern(ptr: *mut u8, len: usize, seed: u8) {
    // SAFETY: caller guarantees `ptr..ptr+len` is writable.
    let block = unsafe { std::slice::from_raw_parts_mut(ptr, len) };
    for (i, b) in block.iter_mut().enumerate() {
        *b = seed ^ (i as u8);
    }
}

/// Whether `len` bytes at `ptr` still hold the pattern written by
/// [`fill_pattern`] with the same `seed`.
///
/// # Safety
///
/// `ptr` must be valid for reads of `len` bytes.
#[allow(unsafe_code)]
pub unsafe fn holds_pattern(ptr: *const u8, len: usize, seed: u8) -> bool {
    // SAFETY: caller guarantees `ptr..ptr+len` is readable.
    let block = unsafe { std::slice::from_raw_parts(ptr, len) };
    block
        .iter()
        .enumerate()
        .all(|(i, &b)| b == seed ^ (i as u8))
}
