//! Error types for stores and the editor.

use pageblocks_tree::TreeError;
use pageblocks_types::{BlockId, BlockType, InvalidBlockType, PageId};
use thiserror::Error;

/// Failures reported by a [`BlockStore`](crate::BlockStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No block with this id in the store.
    #[error("block not found: {0}")]
    NotFound(BlockId),

    /// Referenced block lives on a different page.
    #[error("block {block} is not on page {page}")]
    WrongPage { block: BlockId, page: PageId },

    /// Transport or backend failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// Counterpart sent a type tag outside the closed set.
    #[error(transparent)]
    Codec(#[from] InvalidBlockType),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Failures from [`Editor`](crate::Editor) operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// Target block is not in the current snapshot.
    #[error("block not found: {0}")]
    NotFound(BlockId),

    /// Block cannot own children (or would stop being able to while it has some).
    #[error("block {id} of type {block_type} cannot contain children")]
    NotAContainer { id: BlockId, block_type: BlockType },

    /// Reparent target is the block itself or one of its descendants.
    #[error("cannot move {block} under {target}: would create a cycle")]
    WouldCycle { block: BlockId, target: BlockId },

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("snapshot: {0}")]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Codec(#[from] InvalidBlockType),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type EditResult<T> = std::result::Result<T, EditError>;
