//! Error types for tree conversion.

use thiserror::Error;

use pageblocks_types::{BlockId, PageId};

/// A flat snapshot that cannot form a valid forest.
///
/// Conversion rejects the whole snapshot on any of these; orphans are never
/// promoted to roots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The same id appears twice in one snapshot.
    #[error("duplicate block in snapshot: {0:?}")]
    DuplicateBlock(BlockId),

    /// A block names itself as parent.
    #[error("block {0:?} is its own parent")]
    SelfParent(BlockId),

    /// `parent_id` does not resolve within the snapshot.
    #[error("block {block:?} references missing parent {parent:?}")]
    MissingParent { block: BlockId, parent: BlockId },

    /// Parent lives on a different page.
    #[error("block {block:?} on page {page:?} has parent {parent:?} on page {parent_page:?}")]
    CrossPage {
        block: BlockId,
        page: PageId,
        parent: BlockId,
        parent_page: PageId,
    },

    /// Snapshot mixes blocks from more than one page.
    #[error("snapshot mixes pages {first:?} and {other:?}")]
    MixedPages { first: PageId, other: PageId },

    /// The parent chain loops; the id is one block on the cycle or hanging off it.
    #[error("parent cycle involving block {0:?}")]
    Cycle(BlockId),

    /// Nesting deeper than `MAX_TREE_DEPTH`.
    #[error("block {block:?} exceeds maximum tree depth {max}")]
    TooDeep { block: BlockId, max: usize },
}
