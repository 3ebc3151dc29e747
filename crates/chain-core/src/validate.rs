//! Checks a candidate block against the block it claims to follow.

use crate::{Block, BlockFault, ChainError, Result};

/// Run the linkage checks in order and report the first one that fails:
/// index succession, then the previous-hash link, then the block's own hash.
pub fn check_block(candidate: &Block, predecessor: &Block) -> std::result::Result<(), BlockFault> {
    if predecessor.index().checked_add(1) != Some(candidate.index()) {
        return Err(BlockFault::IndexMismatch {
            expected: predecessor.index().wrapping_add(1),
            found: candidate.index(),
        });
    }
    if predecessor.hash() != candidate.prev_hash() {
        return Err(BlockFault::LinkMismatch);
    }
    if candidate.compute_hash() != candidate.hash() {
        return Err(BlockFault::HashMismatch);
    }
    Ok(())
}

pub fn is_block_valid(candidate: &Block, predecessor: &Block) -> bool {
    check_block(candidate, predecessor).is_ok()
}

/// Walk a whole chain, genesis first, and fail on the first bad block.
pub fn verify_chain(blocks: &[Block]) -> Result<()> {
    let genesis = blocks.first().ok_or(ChainError::EmptyChain)?;
    if genesis.index() != 0 {
        return Err(ChainError::Integrity {
            index: genesis.index(),
            fault: BlockFault::IndexMismatch {
                expected: 0,
                found: genesis.index(),
            },
        });
    }
    if genesis.compute_hash() != genesis.hash() {
        return Err(ChainError::Integrity {
            index: 0,
            fault: BlockFault::HashMismatch,
        });
    }
    for pair in blocks.windows(2) {
        check_block(&pair[1], &pair[0]).map_err(|fault| ChainError::Integrity {
            index: pair[1].index(),
            fault,
        })?;
    }
    Ok(())
}
