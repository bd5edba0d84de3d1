//! Edit orchestration for pageblocks.
//!
//! An [`Editor`] keeps the current [`BlockTree`](pageblocks_tree::BlockTree)
//! of one page, checks each edit against it, forwards the mutation to a
//! [`BlockStore`], and rebuilds the tree from a fresh fetch afterwards.
//!
//! Renderer callbacks land in an [`EditQueue`]; the editor drains it with
//! [`Editor::apply_queued`].
//!
//! Stores: [`MemoryBlockStore`] for tests and scratch use, and [`WireSeam`]
//! for counterparts that store numeric type tags.

mod editor;
mod error;
mod memory;
mod queue;
mod seam;
mod store;

pub use editor::Editor;
pub use error::{EditError, EditResult, StoreError, StoreResult};
pub use memory::{DeletePolicy, MemoryBlockStore};
pub use queue::{EditAction, EditQueue};
pub use seam::{WireBlockStore, WireSeam};
pub use store::BlockStore;
