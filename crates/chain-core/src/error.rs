use thiserror::Error;

/// The first check a candidate block failed against its predecessor.
///
/// Variants are listed in the order the checks run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BlockFault {
    #[error("index mismatch: expected {expected}, found {found}")]
    IndexMismatch { expected: u64, found: u64 },
    #[error("previous hash does not match the predecessor's hash")]
    LinkMismatch,
    #[error("stored hash does not match the recomputed hash")]
    HashMismatch,
}

#[derive(Debug, Error)]
pub enum ChainError {
    /// The payload is missing one of the required object fields.
    #[error("object fields cannot be empty")]
    Validation,

    /// A built candidate did not line up with the current tip.
    #[error("block {index} failed integrity check: {fault}")]
    Integrity { index: u64, fault: BlockFault },

    #[error("no block at index {index} (chain length {len})")]
    NotFound { index: u64, len: usize },

    /// Appending requires a genesis block to link against.
    #[error("chain is empty; initialise the genesis block first")]
    EmptyChain,

    /// The store declined to install a proposed chain of `proposed` blocks
    /// over its current `current` blocks.
    #[error("chain store refused to replace {current} blocks with {proposed}")]
    SwapRefused { proposed: usize, current: usize },

    #[error("chain store lock poisoned")]
    Poisoned,
}

impl ChainError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ChainError::Validation
                | ChainError::Integrity { .. }
                | ChainError::NotFound { .. }
                | ChainError::EmptyChain
        )
    }
}
