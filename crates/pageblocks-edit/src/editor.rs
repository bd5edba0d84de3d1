//! Edit orchestration for one page.
//!
//! ```text
//! Editor::add_block / update_block / ... (&mut self)
//! ├── commit: check against the current BlockTree snapshot
//! │           └── BlockStore mutation
//! └── refresh: fetch_page → BlockTree::from_flat → replace snapshot
//! ```
//!
//! The snapshot is only ever replaced wholesale from a fresh fetch. A failed
//! refresh leaves the previous snapshot in place.

use pageblocks_tree::BlockTree;
use pageblocks_types::{BlockId, BlockType, CreateBlockInput, PageId, UpdateBlockInput};

use crate::error::{EditError, EditResult};
use crate::queue::{EditAction, EditQueue};
use crate::store::BlockStore;

/// Owns a page's current tree snapshot and routes edits through a store.
#[derive(Debug)]
pub struct Editor<S> {
    store: S,
    page_id: PageId,
    tree: BlockTree,
}

impl<S: BlockStore> Editor<S> {
    /// Fetch `page_id` from `store` and build the first snapshot.
    pub async fn load(store: S, page_id: PageId) -> EditResult<Self> {
        let mut editor = Self {
            store,
            page_id,
            tree: BlockTree::default(),
        };
        editor.refresh().await?;
        Ok(editor)
    }

    /// Current snapshot.
    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-read the page and replace the snapshot.
    pub async fn refresh(&mut self) -> EditResult<()> {
        let rows = self.store.fetch_page(self.page_id).await?;
        let tree = BlockTree::from_flat(&rows)?;
        tracing::debug!(page = %self.page_id, blocks = tree.len(), "snapshot refreshed");
        self.tree = tree;
        Ok(())
    }

    /// Create a block. The page is always this editor's page; a missing
    /// `order` becomes the next free rank under the parent.
    pub async fn add_block(&mut self, input: CreateBlockInput) -> EditResult<BlockId> {
        let id = self.commit_add(input).await?;
        self.refresh().await?;
        Ok(id)
    }

    /// Append an empty block of `block_type` under `parent`.
    pub async fn add_child(
        &mut self,
        parent: Option<BlockId>,
        block_type: BlockType,
    ) -> EditResult<BlockId> {
        self.add_block(CreateBlockInput::new(self.page_id, parent, block_type))
            .await
    }

    /// Patch a block's row data. A type change that would turn a block with
    /// children into a leaf is refused.
    pub async fn update_block(&mut self, id: BlockId, patch: UpdateBlockInput) -> EditResult<()> {
        if self.commit_update(id, patch).await? {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Delete a block. Descendants follow the store's policy.
    pub async fn delete_block(&mut self, id: BlockId) -> EditResult<()> {
        self.commit_delete(id).await?;
        self.refresh().await
    }

    /// Move `id` under `parent` (`None` = root), appended after the last
    /// sibling there.
    pub async fn reparent_block(&mut self, id: BlockId, parent: Option<BlockId>) -> EditResult<()> {
        self.commit_reparent(id, parent).await?;
        self.refresh().await
    }

    /// Move `id` to position `index` among its siblings. An index past the
    /// end moves it last.
    pub async fn move_block(&mut self, id: BlockId, index: usize) -> EditResult<()> {
        self.commit_move(id, index).await?;
        self.refresh().await
    }

    /// Run one [`EditAction`].
    pub async fn apply(&mut self, action: EditAction) -> EditResult<()> {
        if self.commit(action).await? {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Apply queued actions oldest first and return how many reached the
    /// store.
    ///
    /// An action the snapshot or the store rejects goes back to the head of
    /// the queue and draining stops there. Once the store has accepted an
    /// action it is never requeued: if the refresh after it fails, draining
    /// stops with that error and the action counts as done.
    pub async fn apply_queued(&mut self, queue: &EditQueue) -> EditResult<usize> {
        let mut applied = 0;
        while let Some(action) = queue.pop() {
            let changed = match self.commit(action.clone()).await {
                Ok(changed) => changed,
                Err(e) => {
                    tracing::warn!(?action, error = %e, "queued edit failed");
                    queue.requeue(action);
                    return Err(e);
                }
            };
            applied += 1;
            if changed && let Err(e) = self.refresh().await {
                tracing::warn!(?action, error = %e, "refresh after queued edit failed");
                return Err(e);
            }
        }
        Ok(applied)
    }

    /// Check `action` against the snapshot and send it to the store. The
    /// snapshot is left alone. Returns whether the store was touched.
    async fn commit(&self, action: EditAction) -> EditResult<bool> {
        match action {
            EditAction::Add { parent, block_type } => {
                let input = CreateBlockInput::new(self.page_id, parent, block_type);
                self.commit_add(input).await.map(|_| true)
            }
            EditAction::Update { id, patch } => self.commit_update(id, patch).await,
            EditAction::Delete { id } => self.commit_delete(id).await.map(|()| true),
            EditAction::Reparent { id, parent } => {
                self.commit_reparent(id, parent).await.map(|()| true)
            }
            EditAction::Move { id, index } => self.commit_move(id, index).await.map(|()| true),
        }
    }

    async fn commit_add(&self, mut input: CreateBlockInput) -> EditResult<BlockId> {
        self.check_parent(input.parent_id.as_ref())?;
        input.page_id = self.page_id;
        if input.order.is_none() {
            input.order = Some(self.tree.next_child_order(input.parent_id.as_ref()));
        }
        let created = self.store.create_block(input).await?;
        tracing::debug!(block = %created.id, block_type = %created.block_type, "added block");
        Ok(created.id)
    }

    /// `false` for an empty patch, which never reaches the store.
    async fn commit_update(&self, id: BlockId, patch: UpdateBlockInput) -> EditResult<bool> {
        self.require(&id)?;
        if patch.is_empty() {
            tracing::debug!(block = %id, "empty patch, nothing to do");
            return Ok(false);
        }
        if let Some(block_type) = patch.block_type
            && !block_type.is_container()
            && !self.tree.children(&id).is_empty()
        {
            return Err(EditError::NotAContainer { id, block_type });
        }
        self.store.update_block(id, patch).await?;
        tracing::debug!(block = %id, "updated block");
        Ok(true)
    }

    async fn commit_delete(&self, id: BlockId) -> EditResult<()> {
        self.require(&id)?;
        self.store.delete_block(id).await?;
        tracing::debug!(block = %id, "deleted block");
        Ok(())
    }

    async fn commit_reparent(&self, id: BlockId, parent: Option<BlockId>) -> EditResult<()> {
        self.require(&id)?;
        self.check_parent(parent.as_ref())?;
        if let Some(target) = parent
            && (target == id || self.tree.is_descendant_of(&target, &id))
        {
            return Err(EditError::WouldCycle { block: id, target });
        }
        let order = self.tree.next_child_order(parent.as_ref());
        self.store.move_block(id, parent, order).await?;
        tracing::debug!(block = %id, parent = ?parent, order, "reparented block");
        Ok(())
    }

    async fn commit_move(&self, id: BlockId, index: usize) -> EditResult<()> {
        let parent = self.require(&id)?;
        let mut ordered: Vec<BlockId> = match parent {
            Some(parent) => self.tree.children(&parent),
            None => self.tree.roots(),
        }
        .into_iter()
        .map(|b| b.id)
        .filter(|sibling| *sibling != id)
        .collect();
        ordered.insert(index.min(ordered.len()), id);

        self.store
            .reorder_siblings(self.page_id, parent, &ordered)
            .await?;
        tracing::debug!(block = %id, index, "moved block");
        Ok(())
    }

    /// Ensure `id` is in the snapshot; returns its parent.
    fn require(&self, id: &BlockId) -> EditResult<Option<BlockId>> {
        self.tree
            .get(id)
            .map(|b| b.parent_id)
            .ok_or(EditError::NotFound(*id))
    }

    /// A parent, when given, must exist and be a container.
    fn check_parent(&self, parent: Option<&BlockId>) -> EditResult<()> {
        let Some(parent) = parent else {
            return Ok(());
        };
        let block = self.tree.get(parent).ok_or(EditError::NotFound(*parent))?;
        if !block.is_container() {
            return Err(EditError::NotAContainer {
                id: *parent,
                block_type: block.block_type,
            });
        }
        Ok(())
    }
}
