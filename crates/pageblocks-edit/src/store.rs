//! The persistence collaborator.
//!
//! The editor never reasons about what a store did to its rows; after every
//! mutation it re-reads the page with [`BlockStore::fetch_page`] and rebuilds
//! its snapshot from that.

use async_trait::async_trait;

use pageblocks_types::{Block, BlockId, CreateBlockInput, PageId, UpdateBlockInput};

use crate::error::StoreResult;

/// Block persistence for one or more pages.
///
/// Stores speak the symbolic [`BlockType`](pageblocks_types::BlockType). A
/// backend that uses numeric tags implements
/// [`WireBlockStore`](crate::WireBlockStore) and is wrapped in
/// [`WireSeam`](crate::WireSeam).
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Every block on `page`, flat. An unknown page is empty, not an error.
    async fn fetch_page(&self, page: PageId) -> StoreResult<Vec<Block>>;

    /// Create a block. `input.order == None` appends after the last sibling.
    async fn create_block(&self, input: CreateBlockInput) -> StoreResult<Block>;

    /// Apply a partial update.
    async fn update_block(&self, id: BlockId, patch: UpdateBlockInput) -> StoreResult<Block>;

    /// Delete a block. What happens to its descendants is store policy.
    async fn delete_block(&self, id: BlockId) -> StoreResult<()>;

    /// Give `id` a new parent (`None` = root) and rank.
    async fn move_block(
        &self,
        id: BlockId,
        parent: Option<BlockId>,
        order: i64,
    ) -> StoreResult<Block>;

    /// Rewrite the ranks of one sibling group so `ordered[i].order == i`.
    async fn reorder_siblings(
        &self,
        page: PageId,
        parent: Option<BlockId>,
        ordered: &[BlockId],
    ) -> StoreResult<()>;
}
