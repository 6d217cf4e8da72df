//! Block layout arithmetic
//!
//! Block-structured telegrams carry their text in fixed-size blocks and
//! announce the block count up front. The block size is a property of
//! the telegram type, not of the payload: destination and screen text
//! use 16-character blocks, short stop-name fields use 4-character
//! blocks.

/// Block size for destination and screen text telegrams
pub const TEXT_BLOCK: usize = 16;

/// Block size for short stop-name telegrams
pub const STOP_BLOCK: usize = 4;

/// Computed block structure for a payload of a given length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockLayout {
    /// Number of blocks, `ceil(len / block_size)`
    pub blocks: usize,
    /// Space characters needed to fill the final block
    pub padding: usize,
    /// Occupied length of the final block, `len % block_size`
    pub remainder: usize,
}

/// Compute the block structure for `len` characters of payload text
///
/// A length of zero yields zero blocks and no padding; it is not
/// rounded up to one block. An exact multiple of the block size also
/// needs no padding.
pub fn layout(len: usize, block_size: usize) -> BlockLayout {
    let blocks = len.div_ceil(block_size);
    let remainder = len % block_size;
    let padding = if remainder > 0 {
        block_size - remainder
    } else {
        0
    };

    BlockLayout {
        blocks,
        padding,
        remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_length_is_zero_blocks() {
        let layout = layout(0, TEXT_BLOCK);
        assert_eq!(layout.blocks, 0);
        assert_eq!(layout.padding, 0);
        assert_eq!(layout.remainder, 0);
    }

    #[test]
    fn test_exact_multiple_needs_no_padding() {
        let layout = layout(16, TEXT_BLOCK);
        assert_eq!(layout.blocks, 1);
        assert_eq!(layout.padding, 0);
    }

    #[test]
    fn test_partial_block_is_padded() {
        let layout = layout(11, STOP_BLOCK);
        assert_eq!(layout.blocks, 3);
        assert_eq!(layout.padding, 1);
        assert_eq!(layout.remainder, 3);
    }

    proptest! {
        #[test]
        fn prop_padded_length_is_block_multiple(len in 0usize..512, text_block in prop::bool::ANY) {
            let block_size = if text_block { TEXT_BLOCK } else { STOP_BLOCK };
            let layout = layout(len, block_size);
            prop_assert_eq!((len + layout.padding) % block_size, 0);
        }

        #[test]
        fn prop_block_count_is_ceiling(len in 0usize..512, text_block in prop::bool::ANY) {
            let block_size = if text_block { TEXT_BLOCK } else { STOP_BLOCK };
            let layout = layout(len, block_size);
            prop_assert_eq!(layout.blocks, len.div_ceil(block_size));
            prop_assert_eq!(len + layout.padding, layout.blocks * block_size);
        }
    }
}
