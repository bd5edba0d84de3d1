//! Block types and the block node itself.
//!
//! ## Design: BlockType is the single source of truth
//!
//! `BlockType` carries both tag representations of a block kind:
//!
//! - the **numeric** tag is the explicit `u8` discriminant (`Container = 0`, ...)
//! - the **symbolic** tag is the variant name in `SCREAMING_SNAKE_CASE`
//!   (`FlexRow` → `"FLEX_ROW"`), produced by strum and used by serde
//!
//! Both lookup directions are derived from the enum definition, so the two
//! mappings cannot drift. See [`crate::codec`] for the fallible conversions.
//!
//! `BlockShape` splits the closed set into container and leaf kinds with an
//! exhaustive match. Adding a variant is a compile error until it is placed.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::codec::InvalidBlockType;
use crate::ids::{BlockId, PageId};

/// Maximum supported tree depth. Traversal code uses this as a circuit breaker.
///
/// Real pages rarely nest past a dozen levels (section → grid → column →
/// card → ...). Exceeding 512 almost certainly means corruption.
pub const MAX_TREE_DEPTH: usize = 512;

/// Numeric tag type used on the counterpart side of the codec boundary.
pub type NumericTag = u8;

/// What a block *is*. Closed set of 27 kinds.
///
/// Containers come first (tags 0..=6), leaves follow (tags 7..=26).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    EnumIter,
    EnumCount,
)]
#[repr(u8)]
#[serde(try_from = "String", into = "&'static str")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BlockType {
    // Containers
    Container = 0,
    Section = 1,
    Grid = 2,
    FlexRow = 3,
    FlexColumn = 4,
    Column = 5,
    Row = 6,
    // Leaves
    Text = 7,
    Heading = 8,
    Paragraph = 9,
    Image = 10,
    Video = 11,
    Button = 12,
    Card = 13,
    Link = 14,
    List = 15,
    Quote = 16,
    Code = 17,
    Divider = 18,
    Spacer = 19,
    Icon = 20,
    Form = 21,
    Input = 22,
    Textarea = 23,
    Embed = 24,
    Table = 25,
    Testimonial = 26,
}

/// Kinds that may own children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Container,
    Section,
    Grid,
    FlexRow,
    FlexColumn,
    Column,
    Row,
}

/// Kinds that never own children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Text,
    Heading,
    Paragraph,
    Image,
    Video,
    Button,
    Card,
    Link,
    List,
    Quote,
    Code,
    Divider,
    Spacer,
    Icon,
    Form,
    Input,
    Textarea,
    Embed,
    Table,
    Testimonial,
}

/// Container-or-leaf view of a [`BlockType`], for exhaustive dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockShape {
    Container(ContainerKind),
    Leaf(LeafKind),
}

impl BlockType {
    /// The numeric (counterpart) tag.
    pub fn numeric(self) -> NumericTag {
        self as NumericTag
    }

    /// The symbolic (wire/storage) tag, e.g. `"FLEX_ROW"`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Look up a type by numeric tag.
    pub fn from_numeric(n: i64) -> Result<Self, InvalidBlockType> {
        NumericTag::try_from(n)
            .ok()
            .and_then(|tag| Self::iter().find(|t| t.numeric() == tag))
            .ok_or(InvalidBlockType::Numeric(n))
    }

    /// Look up a type by symbolic tag (case-insensitive).
    pub fn from_symbol(s: &str) -> Result<Self, InvalidBlockType> {
        <Self as std::str::FromStr>::from_str(s)
            .map_err(|_| InvalidBlockType::Symbol(s.to_string()))
    }

    pub fn shape(self) -> BlockShape {
        use BlockShape::{Container as C, Leaf as L};
        match self {
            BlockType::Container => C(ContainerKind::Container),
            BlockType::Section => C(ContainerKind::Section),
            BlockType::Grid => C(ContainerKind::Grid),
            BlockType::FlexRow => C(ContainerKind::FlexRow),
            BlockType::FlexColumn => C(ContainerKind::FlexColumn),
            BlockType::Column => C(ContainerKind::Column),
            BlockType::Row => C(ContainerKind::Row),
            BlockType::Text => L(LeafKind::Text),
            BlockType::Heading => L(LeafKind::Heading),
            BlockType::Paragraph => L(LeafKind::Paragraph),
            BlockType::Image => L(LeafKind::Image),
            BlockType::Video => L(LeafKind::Video),
            BlockType::Button => L(LeafKind::Button),
            BlockType::Card => L(LeafKind::Card),
            BlockType::Link => L(LeafKind::Link),
            BlockType::List => L(LeafKind::List),
            BlockType::Quote => L(LeafKind::Quote),
            BlockType::Code => L(LeafKind::Code),
            BlockType::Divider => L(LeafKind::Divider),
            BlockType::Spacer => L(LeafKind::Spacer),
            BlockType::Icon => L(LeafKind::Icon),
            BlockType::Form => L(LeafKind::Form),
            BlockType::Input => L(LeafKind::Input),
            BlockType::Textarea => L(LeafKind::Textarea),
            BlockType::Embed => L(LeafKind::Embed),
            BlockType::Table => L(LeafKind::Table),
            BlockType::Testimonial => L(LeafKind::Testimonial),
        }
    }

    /// Check if this kind may own children.
    pub fn is_container(self) -> bool {
        matches!(self.shape(), BlockShape::Container(_))
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BlockType {
    type Error = InvalidBlockType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_symbol(&s)
    }
}

/// A node in the content tree.
///
/// The same struct serves both representations: in the flat form `children`
/// is empty and `parent_id` carries the structure; in the nested form
/// `children` is populated in ascending `order`.
///
/// `depth` is derived data. Conversions in `pageblocks-tree` recompute it
/// from the parent chain; a stored value is never trusted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub page_id: PageId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Type-specific payload, opaque to the tree engine.
    #[serde(default)]
    pub content: serde_json::Value,
    /// Presentation payload, opaque to the tree engine.
    #[serde(default)]
    pub style: serde_json::Value,
    /// Rank among siblings sharing the same parent.
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    /// Owning block, `None` for page roots.
    #[serde(default)]
    pub parent_id: Option<BlockId>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

fn default_visible() -> bool {
    true
}

impl Block {
    /// Check if this is a root block (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this block's type may own children.
    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }

    /// A copy of this block with `children` cleared (the flat row).
    pub fn to_flat(&self) -> Block {
        Block {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Compare two blocks ignoring `children` and `depth`.
    ///
    /// Useful when checking that a flat row survived a conversion cycle.
    pub fn row_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.page_id == other.page_id
            && self.block_type == other.block_type
            && self.content == other.content
            && self.style == other.style
            && self.order == other.order
            && self.is_visible == other.is_visible
            && self.parent_id == other.parent_id
    }
}

/// Builder for `Block`.
///
/// ```
/// # use pageblocks_types::*;
/// let page = PageId::new();
/// let section = BlockBuilder::new(page, BlockType::Section).build();
/// let text = BlockBuilder::new(page, BlockType::Text)
///     .parent(section.id)
///     .order(0)
///     .content(serde_json::json!({ "text": "Hello" }))
///     .build();
/// assert_eq!(text.parent_id, Some(section.id));
/// ```
pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    /// Start building a visible root block with a fresh id.
    pub fn new(page_id: PageId, block_type: BlockType) -> Self {
        Self {
            block: Block {
                id: BlockId::new(),
                page_id,
                block_type,
                content: serde_json::Value::Null,
                style: serde_json::Value::Null,
                order: 0,
                is_visible: true,
                parent_id: None,
                depth: 0,
                children: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: BlockId) -> Self {
        self.block.id = id;
        self
    }

    pub fn parent(mut self, parent_id: BlockId) -> Self {
        self.block.parent_id = Some(parent_id);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.block.order = order;
        self
    }

    pub fn content(mut self, content: serde_json::Value) -> Self {
        self.block.content = content;
        self
    }

    pub fn style(mut self, style: serde_json::Value) -> Self {
        self.block.style = style;
        self
    }

    pub fn visible(mut self, is_visible: bool) -> Self {
        self.block.is_visible = is_visible;
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.block.depth = depth;
        self
    }

    pub fn children(mut self, children: Vec<Block>) -> Self {
        self.block.children = children;
        self
    }

    /// Consume the builder and return the block.
    pub fn build(self) -> Block {
        self.block
    }
}

// ============================================================================
// Tests
// ============================================================================
