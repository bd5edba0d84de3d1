//! In-memory block store.
//!
//! Used for tests and for the CLI's scratch editing. All data is ephemeral.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use pageblocks_types::{Block, BlockId, CreateBlockInput, PageId, UpdateBlockInput};

use crate::error::{StoreError, StoreResult};
use crate::store::BlockStore;

/// What happens to the descendants of a deleted block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the whole subtree.
    #[default]
    Cascade,
    /// Hand the children to the deleted block's parent, appended after the
    /// existing siblings in their current order.
    Reparent,
}

/// Flat rows behind an `RwLock`, insertion ordered.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    rows: RwLock<Vec<Block>>,
    policy: DeletePolicy,
}

impl MemoryBlockStore {
    pub fn new(policy: DeletePolicy) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            policy,
        }
    }

    /// Store seeded with flat rows. Nested `children` are ignored.
    pub fn with_blocks(policy: DeletePolicy, blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut rows: Vec<Block> = blocks.into_iter().map(|b| b.to_flat()).collect();
        stamp_depths(&mut rows);
        Self {
            rows: RwLock::new(rows),
            policy,
        }
    }

    pub fn policy(&self) -> DeletePolicy {
        self.policy
    }

    /// Number of rows across all pages.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

fn position(rows: &[Block], id: &BlockId) -> StoreResult<usize> {
    rows.iter()
        .position(|b| b.id == *id)
        .ok_or(StoreError::NotFound(*id))
}

fn next_order(rows: &[Block], page: PageId, parent: Option<BlockId>) -> i64 {
    rows.iter()
        .filter(|b| b.page_id == page && b.parent_id == parent)
        .map(|b| b.order)
        .max()
        .map_or(0, |max| max + 1)
}

/// Parent must exist on the same page.
fn check_parent(rows: &[Block], page: PageId, parent: Option<BlockId>) -> StoreResult<()> {
    let Some(parent) = parent else {
        return Ok(());
    };
    let row = &rows[position(rows, &parent)?];
    if row.page_id != page {
        return Err(StoreError::WrongPage {
            block: parent,
            page,
        });
    }
    Ok(())
}

/// Recompute every row's `depth` from its parent chain.
fn stamp_depths(rows: &mut [Block]) {
    let parents: HashMap<BlockId, Option<BlockId>> =
        rows.iter().map(|b| (b.id, b.parent_id)).collect();
    for row in rows.iter_mut() {
        let mut depth = 0;
        let mut seen = HashSet::new();
        let mut current = row.parent_id;
        while let Some(parent) = current {
            if !seen.insert(parent) {
                break;
            }
            depth += 1;
            current = parents.get(&parent).copied().flatten();
        }
        row.depth = depth;
    }
}

/// `id` plus everything below it.
fn subtree(rows: &[Block], id: BlockId) -> HashSet<BlockId> {
    let mut found = HashSet::from([id]);
    loop {
        let before = found.len();
        for row in rows {
            if let Some(parent) = row.parent_id
                && found.contains(&parent)
            {
                found.insert(row.id);
            }
        }
        if found.len() == before {
            return found;
        }
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn fetch_page(&self, page: PageId) -> StoreResult<Vec<Block>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|b| b.page_id == page)
            .cloned()
            .collect())
    }

    async fn create_block(&self, input: CreateBlockInput) -> StoreResult<Block> {
        let mut rows = self.rows.write();
        check_parent(&rows, input.page_id, input.parent_id)?;

        let order = input
            .order
            .unwrap_or_else(|| next_order(&rows, input.page_id, input.parent_id));
        let depth = match input.parent_id {
            Some(parent) => rows[position(&rows, &parent)?].depth + 1,
            None => 0,
        };
        let block = Block {
            id: BlockId::new(),
            page_id: input.page_id,
            block_type: input.block_type,
            content: input.content,
            style: input.style,
            order,
            is_visible: input.is_visible,
            parent_id: input.parent_id,
            depth,
            children: Vec::new(),
        };
        rows.push(block.clone());
        Ok(block)
    }

    async fn update_block(&self, id: BlockId, patch: UpdateBlockInput) -> StoreResult<Block> {
        let mut rows = self.rows.write();
        let i = position(&rows, &id)?;
        let row = &mut rows[i];
        if let Some(block_type) = patch.block_type {
            row.block_type = block_type;
        }
        if let Some(content) = patch.content {
            row.content = content;
        }
        if let Some(style) = patch.style {
            row.style = style;
        }
        if let Some(order) = patch.order {
            row.order = order;
        }
        if let Some(is_visible) = patch.is_visible {
            row.is_visible = is_visible;
        }
        Ok(row.clone())
    }

    async fn delete_block(&self, id: BlockId) -> StoreResult<()> {
        let mut rows = self.rows.write();
        let i = position(&rows, &id)?;
        let (page, parent) = (rows[i].page_id, rows[i].parent_id);

        match self.policy {
            DeletePolicy::Cascade => {
                let doomed = subtree(&rows, id);
                rows.retain(|b| !doomed.contains(&b.id));
            }
            DeletePolicy::Reparent => {
                rows.remove(i);
                let mut orphans: Vec<usize> = rows
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.parent_id == Some(id))
                    .map(|(i, _)| i)
                    .collect();
                orphans.sort_by_key(|&i| rows[i].order);
                let base = next_order(&rows, page, parent);
                for (rank, i) in orphans.into_iter().enumerate() {
                    rows[i].parent_id = parent;
                    rows[i].order = base + rank as i64;
                }
                stamp_depths(&mut rows);
            }
        }
        Ok(())
    }

    async fn move_block(
        &self,
        id: BlockId,
        parent: Option<BlockId>,
        order: i64,
    ) -> StoreResult<Block> {
        let mut rows = self.rows.write();
        let i = position(&rows, &id)?;
        check_parent(&rows, rows[i].page_id, parent)?;
        rows[i].parent_id = parent;
        rows[i].order = order;
        stamp_depths(&mut rows);
        Ok(rows[i].clone())
    }

    async fn reorder_siblings(
        &self,
        page: PageId,
        parent: Option<BlockId>,
        ordered: &[BlockId],
    ) -> StoreResult<()> {
        let mut rows = self.rows.write();
        let mut positions = Vec::with_capacity(ordered.len());
        for id in ordered {
            let i = position(&rows, id)?;
            if rows[i].page_id != page || rows[i].parent_id != parent {
                return Err(StoreError::backend(format!(
                    "block {id} is not a sibling in the reordered group"
                )));
            }
            positions.push(i);
        }
        for (rank, i) in positions.into_iter().enumerate() {
            rows[i].order = rank as i64;
        }
        Ok(())
    }
}
