use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, info, warn};

use crate::validate::{check_block, verify_chain};
use crate::{Block, ChainError, Payload, Result};

/// Backing storage for the chain.
///
/// Readers get an immutable snapshot; the only mutation is swapping in a
/// whole new sequence, and only when it is strictly longer.
pub trait ChainStore: Send + Sync {
    fn snapshot(&self) -> Result<Arc<Vec<Block>>>;
    /// Install `proposed` if it is longer than the current chain.
    /// Returns whether the swap happened.
    fn replace_if_longer(&self, proposed: Vec<Block>) -> Result<bool>;
}

/// Process-memory store. Nothing survives a restart.
#[derive(Default)]
pub struct MemStore {
    blocks: RwLock<Arc<Vec<Block>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainStore for MemStore {
    fn snapshot(&self) -> Result<Arc<Vec<Block>>> {
        let guard = self.blocks.read().map_err(|_| ChainError::Poisoned)?;
        Ok(Arc::clone(&guard))
    }

    fn replace_if_longer(&self, proposed: Vec<Block>) -> Result<bool> {
        let mut guard = self.blocks.write().map_err(|_| ChainError::Poisoned)?;
        if proposed.len() > guard.len() {
            *guard = Arc::new(proposed);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Outcome of [`Chain::ensure_genesis`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Genesis {
    Created(Block),
    AlreadyExists,
}

/// Chain façade over a `ChainStore`.
///
/// Every write path (genesis, append, replace) runs under one writer lock so
/// that reading the tip, building, validating and swapping happen as a unit.
/// The store itself is not handed back out, so nothing can write around the lock:
///
/// ```compile_fail
/// let chain = chain_core::chain::Chain::in_memory();
/// let _ = chain.store();
/// ```
pub struct Chain<S: ChainStore> {
    store: Arc<S>,
    writer: Arc<Mutex<()>>,
}

impl<S: ChainStore> Clone for Chain<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            writer: Arc::clone(&self.writer),
        }
    }
}

impl Chain<MemStore> {
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemStore::new()))
    }
}

impl<S: ChainStore> Chain<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Create the genesis block if the chain is empty. Idempotent.
    pub fn ensure_genesis(&self) -> Result<Genesis> {
        let _writer = self.writer.lock().map_err(|_| ChainError::Poisoned)?;
        if !self.store.snapshot()?.is_empty() {
            debug!("genesis block already present");
            return Ok(Genesis::AlreadyExists);
        }
        let genesis = Block::genesis();
        if !self.store.replace_if_longer(vec![genesis.clone()])? {
            return Err(ChainError::SwapRefused {
                proposed: 1,
                current: self.store.snapshot()?.len(),
            });
        }
        info!(hash = %genesis.hash(), "created genesis block");
        Ok(Genesis::Created(genesis))
    }

    pub fn blocks(&self) -> Result<Arc<Vec<Block>>> {
        self.store.snapshot()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store.snapshot()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, index: u64) -> Result<Block> {
        let blocks = self.store.snapshot()?;
        usize::try_from(index)
            .ok()
            .and_then(|i| blocks.get(i))
            .cloned()
            .ok_or(ChainError::NotFound {
                index,
                len: blocks.len(),
            })
    }

    pub fn tip(&self) -> Result<Block> {
        self.store
            .snapshot()?
            .last()
            .cloned()
            .ok_or(ChainError::EmptyChain)
    }

    /// Build a block from `payload` on top of the current tip, validate it and
    /// install the extended chain. Returns the chain after the append.
    pub fn append(&self, payload: &Payload) -> Result<Arc<Vec<Block>>> {
        let _writer = self.writer.lock().map_err(|_| ChainError::Poisoned)?;
        let current = self.store.snapshot()?;
        let tip = current.last().ok_or(ChainError::EmptyChain)?;
        let candidate = Block::next(tip, payload).inspect_err(|e| {
            warn!(error = %e, "rejected payload");
        })?;
        self.install(&current, candidate)
    }

    /// Validate an already built block against the current tip and install it.
    ///
    /// A block built against a tip that has since moved fails the index check.
    pub fn append_block(&self, candidate: Block) -> Result<Arc<Vec<Block>>> {
        let _writer = self.writer.lock().map_err(|_| ChainError::Poisoned)?;
        let current = self.store.snapshot()?;
        self.install(&current, candidate)
    }

    // Caller must hold the writer lock.
    fn install(&self, current: &Arc<Vec<Block>>, candidate: Block) -> Result<Arc<Vec<Block>>> {
        let tip = current.last().ok_or(ChainError::EmptyChain)?;
        if let Err(fault) = check_block(&candidate, tip) {
            warn!(index = candidate.index(), %fault, "candidate block failed validation");
            return Err(ChainError::Integrity {
                index: candidate.index(),
                fault,
            });
        }

        let mut proposed = Vec::with_capacity(current.len() + 1);
        proposed.extend(current.iter().cloned());
        proposed.push(candidate);
        let proposed_len = proposed.len();
        if !self.store.replace_if_longer(proposed)? {
            warn!(proposed_len, "chain store refused the extended chain");
            return Err(ChainError::SwapRefused {
                proposed: proposed_len,
                current: current.len(),
            });
        }
        info!(index = proposed_len - 1, "appended block");
        self.store.snapshot()
    }

    /// Longest-chain rule: adopt `proposed` only if strictly longer than the
    /// current chain. The proposal is taken as-is, without re-validation.
    pub fn replace(&self, proposed: Vec<Block>) -> Result<bool> {
        let _writer = self.writer.lock().map_err(|_| ChainError::Poisoned)?;
        let proposed_len = proposed.len();
        let replaced = self.store.replace_if_longer(proposed)?;
        debug!(proposed_len, replaced, "replace chain");
        Ok(replaced)
    }

    /// Re-check every link of the current chain.
    pub fn verify(&self) -> Result<()> {
        verify_chain(&self.store.snapshot()?)
    }
}
