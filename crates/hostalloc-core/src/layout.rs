//! Validated block layouts.

use std::alloc::Layout;

use crate::error::LayoutError;

/// A `(size, align)` pair that a [`BlockAllocator`](crate::BlockAllocator)
/// can be handed directly.
///
/// Guarantees, checked at construction:
/// - `size > 0`
/// - `align` is a power of two
/// - `size` rounded up to `align` fits in `isize`
///
/// Zero-size requests are handled by the boundary before a layout is built,
/// so allocators never special-case them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockLayout {
    layout: Layout,
}

impl BlockLayout {
    /// Validate a raw request.
    pub fn new(size: usize, align: usize) -> Result<Self, LayoutError> {
        if !align.is_power_of_two() {
            return Err(LayoutError::InvalidAlign { align });
        }
        let layout =
            Layout::from_size_align(size, align).map_err(|_| LayoutError::SizeOverflow {
                size,
                align,
            })?;
        Self::from_layout(layout)
    }

    /// Wrap an existing [`Layout`], rejecting zero-size layouts.
    pub fn from_layout(layout: Layout) -> Result<Self, LayoutError> {
        if layout.size() == 0 {
            return Err(LayoutError::ZeroSize);
        }
        Ok(Self { layout })
    }

    /// Requested size in bytes. Never zero.
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Requested alignment in bytes. Always a power of two.
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// The underlying [`Layout`].
    pub fn get(&self) -> Layout {
        self.layout
    }
}

impl From<BlockLayout> for Layout {
    fn from(layout: BlockLayout) -> Self {
        layout.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_power_of_two_alignments() {
        for align in [1, 2, 8, 16, 64, 4096] {
            let layout = BlockLayout::new(32, align).unwrap();
            assert_eq!(layout.size(), 32);
            assert_eq!(layout.align(), align);
        }
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(BlockLayout::new(0, 8), Err(LayoutError::ZeroSize));
    }

    #[test]
    fn rejects_bad_alignment() {
        assert_eq!(
            BlockLayout::new(16, 0),
            Err(LayoutError::InvalidAlign { align: 0 })
        );
        assert_eq!(
            BlockLayout::new(16, 24),
            Err(LayoutError::InvalidAlign { align: 24 })
        );
    }

    #[test]
    fn alignment_checked_before_size() {
        // A zero-size request with a bad alignment reports the alignment.
        assert_eq!(
            BlockLayout::new(0, 3),
            Err(LayoutError::InvalidAlign { align: 3 })
        );
    }

    #[test]
    fn rejects_sizes_that_overflow_isize() {
        assert_eq!(
            BlockLayout::new(usize::MAX, 1),
            Err(LayoutError::SizeOverflow {
                size: usize::MAX,
                align: 1
            })
        );
        // Fits on its own, overflows once rounded up to the alignment.
        let size = isize::MAX as usize - 2;
        assert_eq!(
            BlockLayout::new(size, 8),
            Err(LayoutError::SizeOverflow { size, align: 8 })
        );
    }

    #[test]
    fn converts_back_to_std_layout() {
        let layout = BlockLayout::new(100, 16).unwrap();
        let std_layout: Layout = layout.into();
        assert_eq!(std_layout, Layout::from_size_align(100, 16).unwrap());
        assert_eq!(layout.get(), std_layout);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_requests_round_trip_size_and_align(
                size in 1usize..1 << 20,
                shift in 0u32..13,
            ) {
                let align = 1usize << shift;
                let layout = BlockLayout::new(size, align).unwrap();
                prop_assert_eq!(layout.size(), size);
                prop_assert_eq!(layout.align(), align);
            }

            #[test]
            fn non_power_of_two_align_always_rejected(
                size in 0usize..1 << 20,
                align in 0usize..1 << 16,
            ) {
                prop_assume!(!align.is_power_of_two());
                prop_assert_eq!(
                    BlockLayout::new(size, align),
                    Err(LayoutError::InvalidAlign { align })
                );
            }
        }
    }
}
