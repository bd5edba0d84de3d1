//! Mutation payloads and the numeric-tag (counterpart) shapes.
//!
//! `CreateBlockInput` / `UpdateBlockInput` carry the symbolic [`BlockType`].
//! The `Wire*` twins carry a [`NumericTag`] instead and exist only at the
//! codec boundary; see [`crate::codec`] for the converters.

use serde::{Deserialize, Serialize};

use crate::block::{BlockType, NumericTag};
use crate::ids::{BlockId, PageId};

/// Payload for creating a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockInput {
    pub page_id: PageId,
    #[serde(default)]
    pub parent_id: Option<BlockId>,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub style: serde_json::Value,
    /// Requested rank. `None` lets the store append after the last sibling.
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

impl CreateBlockInput {
    /// A visible block with empty payloads, appended at the end.
    pub fn new(page_id: PageId, parent_id: Option<BlockId>, block_type: BlockType) -> Self {
        Self {
            page_id,
            parent_id,
            block_type,
            content: serde_json::Value::Null,
            style: serde_json::Value::Null,
            order: None,
            is_visible: true,
        }
    }
}

/// Partial update for a block. `None` fields are left unchanged.
///
/// Reparenting is a separate operation (it changes tree shape, not row data).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockInput {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<BlockType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl UpdateBlockInput {
    pub fn is_empty(&self) -> bool {
        self.block_type.is_none()
            && self.content.is_none()
            && self.style.is_none()
            && self.order.is_none()
            && self.is_visible.is_none()
    }
}

/// A block as the counterpart system sees it: numeric type tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBlock {
    pub id: BlockId,
    pub page_id: PageId,
    #[serde(rename = "type")]
    pub block_type: NumericTag,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub style: serde_json::Value,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub parent_id: Option<BlockId>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WireBlock>,
}

/// [`CreateBlockInput`] with a numeric type tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCreateBlockInput {
    pub page_id: PageId,
    #[serde(default)]
    pub parent_id: Option<BlockId>,
    #[serde(rename = "type")]
    pub block_type: NumericTag,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub style: serde_json::Value,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

/// [`UpdateBlockInput`] with a numeric type tag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUpdateBlockInput {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<NumericTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

fn default_visible() -> bool {
    true
}
