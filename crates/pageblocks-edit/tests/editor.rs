//! Editor behavior end to end over the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use pageblocks_edit::{
    BlockStore, DeletePolicy, EditAction, EditError, EditQueue, Editor, MemoryBlockStore,
    StoreError, StoreResult, WireSeam,
};
use pageblocks_render::{NodeActions, Renderer, TreePresenter};
use pageblocks_types::{
    Block, BlockBuilder, BlockId, BlockType, CreateBlockInput, PageId, UpdateBlockInput,
};

/// Section → Grid → [Card, Card], Section → Text.
struct Fixture {
    page: PageId,
    section: Block,
    grid: Block,
    cards: [Block; 2],
    text: Block,
}

impl Fixture {
    fn new() -> Self {
        let page = PageId::new();
        let section = BlockBuilder::new(page, BlockType::Section).build();
        let grid = BlockBuilder::new(page, BlockType::Grid)
            .parent(section.id)
            .order(0)
            .build();
        let cards = [0, 1].map(|order| {
            BlockBuilder::new(page, BlockType::Card)
                .parent(grid.id)
                .order(order)
                .build()
        });
        let text = BlockBuilder::new(page, BlockType::Text)
            .parent(section.id)
            .order(1)
            .build();
        Self {
            page,
            section,
            grid,
            cards,
            text,
        }
    }

    fn rows(&self) -> Vec<Block> {
        vec![
            self.section.clone(),
            self.grid.clone(),
            self.cards[0].clone(),
            self.cards[1].clone(),
            self.text.clone(),
        ]
    }

    async fn editor(&self, policy: DeletePolicy) -> Editor<MemoryBlockStore> {
        let store = MemoryBlockStore::with_blocks(policy, self.rows());
        Editor::load(store, self.page).await.unwrap()
    }
}

fn child_ids(editor: &Editor<impl BlockStore>, parent: &BlockId) -> Vec<BlockId> {
    editor.tree().children(parent).iter().map(|b| b.id).collect()
}

#[tokio::test]
async fn test_load_builds_snapshot() {
    let fx = Fixture::new();
    let editor = fx.editor(DeletePolicy::Cascade).await;
    let tree = editor.tree();
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.block_tree().len(), 1);
    assert_eq!(child_ids(&editor, &fx.grid.id), vec![fx.cards[0].id, fx.cards[1].id]);
}

#[tokio::test]
async fn test_add_child_appends_with_next_order() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let id = editor
        .add_child(Some(fx.grid.id), BlockType::Card)
        .await
        .unwrap();

    let added = editor.tree().get(&id).unwrap();
    assert_eq!(added.order, 2);
    assert_eq!(added.depth, 2);
    assert_eq!(child_ids(&editor, &fx.grid.id).last(), Some(&id));
}

#[tokio::test]
async fn test_add_root_block() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let id = editor.add_child(None, BlockType::Section).await.unwrap();
    let roots: Vec<BlockId> = editor.tree().roots().iter().map(|b| b.id).collect();
    assert_eq!(roots, vec![fx.section.id, id]);
}

#[tokio::test]
async fn test_add_block_uses_editor_page() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let mut input = CreateBlockInput::new(PageId::new(), Some(fx.section.id), BlockType::Heading);
    input.content = serde_json::json!({ "text": "Plans" });
    let id = editor.add_block(input).await.unwrap();
    let added = editor.tree().get(&id).unwrap();
    assert_eq!(added.page_id, fx.page);
    assert_eq!(added.content["text"], "Plans");
}

#[tokio::test]
async fn test_add_under_leaf_is_refused() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let err = editor
        .add_child(Some(fx.cards[0].id), BlockType::Text)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::NotAContainer { id, block_type: BlockType::Card } if id == fx.cards[0].id
    ));
    assert_eq!(editor.tree().len(), 5);
    assert_eq!(editor.store().len(), 5);
}

#[tokio::test]
async fn test_add_under_missing_parent_is_refused() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let missing = BlockId::new();
    let err = editor
        .add_child(Some(missing), BlockType::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn test_update_replaces_content_and_visibility() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    editor
        .update_block(
            fx.text.id,
            UpdateBlockInput {
                content: Some(serde_json::json!({ "text": "hi" })),
                is_visible: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let text = editor.tree().get(&fx.text.id).unwrap();
    assert_eq!(text.content["text"], "hi");
    assert!(!text.is_visible);
}

#[tokio::test]
async fn test_update_container_with_children_to_leaf_is_refused() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let err = editor
        .update_block(
            fx.grid.id,
            UpdateBlockInput {
                block_type: Some(BlockType::Image),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::NotAContainer { .. }));
    assert_eq!(editor.tree().get(&fx.grid.id).unwrap().block_type, BlockType::Grid);
}

#[tokio::test]
async fn test_update_missing_block() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let err = editor
        .update_block(BlockId::new(), UpdateBlockInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_cascades_by_store_policy() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    editor.delete_block(fx.grid.id).await.unwrap();
    assert_eq!(editor.tree().len(), 2);
    assert!(!editor.tree().contains(&fx.cards[0].id));
}

#[tokio::test]
async fn test_delete_reparents_by_store_policy() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Reparent).await;
    editor.delete_block(fx.grid.id).await.unwrap();
    assert_eq!(
        child_ids(&editor, &fx.section.id),
        vec![fx.text.id, fx.cards[0].id, fx.cards[1].id]
    );
    assert_eq!(editor.tree().depth(&fx.cards[1].id), Some(1));
}

#[tokio::test]
async fn test_reparent_appends_at_end() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    editor
        .reparent_block(fx.text.id, Some(fx.grid.id))
        .await
        .unwrap();
    assert_eq!(
        child_ids(&editor, &fx.grid.id),
        vec![fx.cards[0].id, fx.cards[1].id, fx.text.id]
    );
    assert_eq!(editor.tree().depth(&fx.text.id), Some(2));
}

#[tokio::test]
async fn test_reparent_to_root() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    editor.reparent_block(fx.grid.id, None).await.unwrap();
    let roots: Vec<BlockId> = editor.tree().roots().iter().map(|b| b.id).collect();
    assert_eq!(roots, vec![fx.section.id, fx.grid.id]);
    assert_eq!(editor.tree().depth(&fx.cards[0].id), Some(1));
}

#[tokio::test]
async fn test_reparent_under_self_or_descendant_is_refused() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;

    let err = editor
        .reparent_block(fx.section.id, Some(fx.section.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::WouldCycle { .. }));

    let err = editor
        .reparent_block(fx.section.id, Some(fx.grid.id))
        .await
        .unwrap_err();
    assert!(
        matches!(err, EditError::WouldCycle { block, target } if block == fx.section.id && target == fx.grid.id)
    );
    assert!(editor.tree().parent(&fx.grid.id).is_some());
}

#[tokio::test]
async fn test_reparent_under_leaf_is_refused() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let err = editor
        .reparent_block(fx.cards[0].id, Some(fx.text.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::NotAContainer { .. }));
}

#[tokio::test]
async fn test_move_block_reorders_siblings() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    editor.move_block(fx.cards[1].id, 0).await.unwrap();
    assert_eq!(child_ids(&editor, &fx.grid.id), vec![fx.cards[1].id, fx.cards[0].id]);

    editor.move_block(fx.cards[1].id, 99).await.unwrap();
    assert_eq!(child_ids(&editor, &fx.grid.id), vec![fx.cards[0].id, fx.cards[1].id]);
}

#[tokio::test]
async fn test_rendered_callbacks_flow_through_queue() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let queue = Arc::new(EditQueue::new());

    let renderer = Renderer::new(queue.clone());
    let nodes = renderer.render_forest(&mut TreePresenter, editor.tree().block_tree());
    let grid = nodes[0].find(&fx.grid.id).unwrap();
    grid.actions
        .as_container()
        .unwrap()
        .add_child(BlockType::Card);
    let text = nodes[0].find(&fx.text.id).unwrap();
    let NodeActions::Leaf(actions) = &text.actions else {
        panic!("text should carry leaf actions");
    };
    actions.delete();

    assert_eq!(queue.len(), 2);
    let applied = editor.apply_queued(&queue).await.unwrap();
    assert_eq!(applied, 2);
    assert!(queue.is_empty());
    assert_eq!(child_ids(&editor, &fx.grid.id).len(), 3);
    assert!(!editor.tree().contains(&fx.text.id));
}

#[tokio::test]
async fn test_apply_queued_stops_at_first_failure() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let queue = EditQueue::new();
    let missing = BlockId::new();
    queue.push(EditAction::Move {
        id: fx.cards[1].id,
        index: 0,
    });
    queue.push(EditAction::Delete { id: missing });
    queue.push(EditAction::Delete { id: fx.text.id });

    let err = editor.apply_queued(&queue).await.unwrap_err();
    assert!(matches!(err, EditError::NotFound(id) if id == missing));
    assert_eq!(child_ids(&editor, &fx.grid.id)[0], fx.cards[1].id);
    assert_eq!(
        queue.drain(),
        vec![
            EditAction::Delete { id: missing },
            EditAction::Delete { id: fx.text.id }
        ]
    );
}

#[tokio::test]
async fn test_editor_over_wire_seam() {
    let fx = Fixture::new();
    let store = WireSeam::new(MemoryBlockStore::with_blocks(DeletePolicy::Cascade, fx.rows()));
    let mut editor = Editor::load(store, fx.page).await.unwrap();

    let id = editor
        .add_child(Some(fx.section.id), BlockType::Testimonial)
        .await
        .unwrap();
    assert_eq!(editor.tree().get(&id).unwrap().block_type, BlockType::Testimonial);
    assert_eq!(editor.tree().len(), 6);
}

/// Memory store whose page reads can be switched off after loading.
#[derive(Default)]
struct UnreadableStore {
    inner: MemoryBlockStore,
    reads_fail: AtomicBool,
}

#[async_trait]
impl BlockStore for UnreadableStore {
    async fn fetch_page(&self, page: PageId) -> StoreResult<Vec<Block>> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(StoreError::backend("page read unavailable"));
        }
        self.inner.fetch_page(page).await
    }

    async fn create_block(&self, input: CreateBlockInput) -> StoreResult<Block> {
        self.inner.create_block(input).await
    }

    async fn update_block(&self, id: BlockId, patch: UpdateBlockInput) -> StoreResult<Block> {
        self.inner.update_block(id, patch).await
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
        self.inner.move_block(id, parent, order).await
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

#[tokio::test]
async fn test_apply_queued_does_not_retry_committed_edit_when_refresh_fails() {
    let fx = Fixture::new();
    let store = UnreadableStore {
        inner: MemoryBlockStore::with_blocks(DeletePolicy::Cascade, fx.rows()),
        ..Default::default()
    };
    let mut editor = Editor::load(store, fx.page).await.unwrap();

    let queue = EditQueue::new();
    queue.push(EditAction::Add {
        parent: Some(fx.grid.id),
        block_type: BlockType::Card,
    });
    queue.push(EditAction::Delete { id: fx.text.id });
    editor.store().reads_fail.store(true, Ordering::SeqCst);

    let err = editor.apply_queued(&queue).await.unwrap_err();
    assert!(matches!(err, EditError::Store(StoreError::Backend(_))));
    assert_eq!(editor.store().inner.len(), 6);
    // Snapshot stays at the last good read.
    assert_eq!(editor.tree().len(), 5);
    assert_eq!(queue.drain(), vec![EditAction::Delete { id: fx.text.id }]);

    // Resuming runs only what was left; the card is not created twice.
    editor.store().reads_fail.store(false, Ordering::SeqCst);
    queue.push(EditAction::Delete { id: fx.text.id });
    assert_eq!(editor.apply_queued(&queue).await.unwrap(), 1);
    assert_eq!(child_ids(&editor, &fx.grid.id).len(), 3);
    assert!(!editor.tree().contains(&fx.text.id));
}

#[tokio::test]
async fn test_apply_queued_requeues_rejected_edit() {
    let fx = Fixture::new();
    let mut editor = fx.editor(DeletePolicy::Cascade).await;
    let queue = EditQueue::new();
    let ghost = BlockId::new();
    queue.push(EditAction::Reparent {
        id: fx.text.id,
        parent: Some(ghost),
    });

    let err = editor.apply_queued(&queue).await.unwrap_err();
    assert!(matches!(err, EditError::NotFound(id) if id == ghost));
    assert_eq!(queue.len(), 1);
    assert_eq!(editor.store().len(), 5);
}
