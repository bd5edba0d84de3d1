//! Block tree conversion and traversal for pageblocks.
//!
//! Persistence stores blocks as flat rows that point at their parent. This
//! crate turns a flat snapshot into the nested forest used for rendering,
//! back again, and answers structural queries over it.
//!
//! # Guarantees
//!
//! - `flatten_blocks(&unflatten_blocks(&flat)?)` holds the same rows as
//!   `flat`, reordered to pre-order by `(parent, order)`.
//! - Siblings sort ascending by `order`; ties keep input order.
//! - `depth` is always recomputed from the parent chain.
//! - A snapshot that cannot form a forest is rejected with [`TreeError`];
//!   orphans are never promoted to roots.
//! - [`BlockTree`] queries are total: unknown ids give empty results.

mod convert;
mod error;
mod query;
mod validate;

pub use convert::{flatten_blocks, unflatten_blocks};
pub use error::TreeError;
pub use query::{BlockTree, is_container_block};
pub use validate::{ValidationReport, Violation, validate_snapshot};

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
