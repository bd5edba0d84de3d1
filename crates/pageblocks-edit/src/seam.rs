//! Numeric-tag boundary.
//!
//! A counterpart that stores block types as integers implements
//! [`WireBlockStore`]. Wrapping it in [`WireSeam`] gives a [`BlockStore`]
//! speaking symbolic types. Conversion happens here and nowhere else, in
//! both directions; an unmapped tag from the counterpart surfaces as
//! [`StoreError::Codec`].

use async_trait::async_trait;

use pageblocks_types::codec::{
    from_wire_block, from_wire_create, from_wire_update, to_wire_block, to_wire_create,
    to_wire_update,
};
use pageblocks_types::{
    Block, BlockId, CreateBlockInput, PageId, UpdateBlockInput, WireBlock, WireCreateBlockInput,
    WireUpdateBlockInput,
};

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryBlockStore;
use crate::store::BlockStore;

/// Block persistence that speaks numeric type tags.
#[async_trait]
pub trait WireBlockStore: Send + Sync {
    async fn fetch_page(&self, page: PageId) -> StoreResult<Vec<WireBlock>>;
    async fn create_block(&self, input: WireCreateBlockInput) -> StoreResult<WireBlock>;
    async fn update_block(
        &self,
        id: BlockId,
        patch: WireUpdateBlockInput,
    ) -> StoreResult<WireBlock>;
    async fn delete_block(&self, id: BlockId) -> StoreResult<()>;
    async fn move_block(
        &self,
        id: BlockId,
        parent: Option<BlockId>,
        order: i64,
    ) -> StoreResult<WireBlock>;
    async fn reorder_siblings(
        &self,
        page: PageId,
        parent: Option<BlockId>,
        ordered: &[BlockId],
    ) -> StoreResult<()>;
}

/// [`BlockStore`] over a [`WireBlockStore`].
#[derive(Debug, Default)]
pub struct WireSeam<W> {
    inner: W,
}

impl<W> WireSeam<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn decode(wire: WireBlock) -> StoreResult<Block> {
    from_wire_block(wire).map_err(|e| {
        tracing::warn!(error = %e, "counterpart sent an unmapped block type");
        StoreError::Codec(e)
    })
}

#[async_trait]
impl<W: WireBlockStore> BlockStore for WireSeam<W> {
    async fn fetch_page(&self, page: PageId) -> StoreResult<Vec<Block>> {
        self.inner
            .fetch_page(page)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn create_block(&self, input: CreateBlockInput) -> StoreResult<Block> {
        decode(self.inner.create_block(to_wire_create(&input)).await?)
    }

    async fn update_block(&self, id: BlockId, patch: UpdateBlockInput) -> StoreResult<Block> {
        decode(self.inner.update_block(id, to_wire_update(&patch)).await?)
    }

    async fn delete_block(&self, id: BlockId) -> StoreResult<()> {
        self.inner.delete_block(id).await
    }

    async fn move_block(
        &self,
        id: BlockId,
        parent: Option<BlockId>,
        order: i64,
    ) -> StoreResult<Block> {
        decode(self.inner.move_block(id, parent, order).await?)
    }

    async fn reorder_siblings(
        &self,
        page: PageId,
        parent: Option<BlockId>,
        ordered: &[BlockId],
    ) -> StoreResult<()> {
        self.inner.reorder_siblings(page, parent, ordered).await
    }
}

/// A memory store viewed from the counterpart's side: it accepts and returns
/// numeric tags. Decoding incoming payloads fails on unmapped tags.
#[async_trait]
impl WireBlockStore for MemoryBlockStore {
    async fn fetch_page(&self, page: PageId) -> StoreResult<Vec<WireBlock>> {
        let rows = BlockStore::fetch_page(self, page).await?;
        Ok(rows.iter().map(to_wire_block).collect())
    }

    async fn create_block(&self, input: WireCreateBlockInput) -> StoreResult<WireBlock> {
        let input = from_wire_create(input)?;
        Ok(to_wire_block(&BlockStore::create_block(self, input).await?))
    }

    async fn update_block(
        &self,
        id: BlockId,
        patch: WireUpdateBlockInput,
    ) -> StoreResult<WireBlock> {
        let patch = from_wire_update(patch)?;
        Ok(to_wire_block(&BlockStore::update_block(self, id, patch).await?))
    }

    async fn delete_block(&self, id: BlockId) -> StoreResult<()> {
        BlockStore::delete_block(self, id).await
    }

    async fn move_block(
        &self,
        id: BlockId,
        parent: Option<BlockId>,
        order: i64,
    ) -> StoreResult<WireBlock> {
        Ok(to_wire_block(
            &BlockStore::move_block(self, id, parent, order).await?,
        ))
    }

    async fn reorder_siblings(
        &self,
        page: PageId,
        parent: Option<BlockId>,
        ordered: &[BlockId],
    ) -> StoreResult<()> {
        BlockStore::reorder_siblings(self, page, parent, ordered).await
    }
}
