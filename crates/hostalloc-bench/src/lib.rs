//! Request profiles shared by the hostalloc benchmarks and stress tests.
//!
//! - [`SIZE_CLASSES`] × [`ALIGNMENTS`]: the reference grid of requests.
//! - [`request_grid`]: every `(size, align)` pair in that grid.
//! - [`mixed_requests`]: a deterministic, seed-driven mix of requests.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Byte counts covering a single byte up to one page.
pub const SIZE_CLASSES: [usize; 4] = [1, 8, 64, 4096];

/// Alignments from byte-aligned to cache-line aligned.
pub const ALIGNMENTS: [usize; 4] = [1, 8, 16, 64];

/// Every `(size, align)` pair in `SIZE_CLASSES × ALIGNMENTS`.
pub fn request_grid() -> impl Iterator<Item = (usize, usize)> {
    SIZE_CLASSES
        .into_iter()
        .flat_map(|size| ALIGNMENTS.into_iter().map(move |align| (size, align)))
}

/// `count` requests with sizes in `1..=max_size` and alignments drawn from
/// `1..=4096`, reproducible from `seed`.
pub fn mixed_requests(count: usize, max_size: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let size = (rng.next_u64() % max_size.max(1) as u64) as usize + 1;
            let align = 1usize << (rng.next_u64() % 13);
            (size, align)
        })
        .collect()
}
