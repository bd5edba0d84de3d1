//! Typed identifiers for pages and blocks.
//!
//! Both ID types wrap UUIDv7 (time-ordered, globally unique). They serialize
//! as standard UUID text and display the same way for logging. The `short()`
//! form (first 8 hex chars) is for human-facing output only, never used as a
//! lookup key. Use [`resolve_block_prefix`] to turn a typed prefix back into
//! an id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block identifier (UUIDv7).
///
/// Opaque and stable across flatten/unflatten cycles.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

/// A page identifier (UUIDv7). A page is the root scope of a block forest.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Fresh UUIDv7.
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Leading 8 hex digits, for outlines and logs.
            pub fn short(&self) -> String {
                let mut hex = self.to_hex();
                hex.truncate(8);
                hex
            }

            /// 32 lowercase hex digits, no hyphens.
            pub fn to_hex(&self) -> String {
                self.0.simple().to_string()
            }

            /// Accepts hyphenated or bare-hex UUID text.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse().map(Self)
            }

            /// True when `prefix` (case-insensitive, hyphens skipped) starts
            /// the hex form of this id.
            pub fn matches_hex_prefix(&self, prefix: &str) -> bool {
                let hex = self.to_hex();
                let mut digits = prefix.chars().filter(|c| *c != '-');
                hex.chars()
                    .zip(digits.by_ref())
                    .all(|(h, q)| h == q.to_ascii_lowercase())
                    && digits.next().is_none()
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $T {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let short = self.short();
                f.debug_tuple($name).field(&format_args!("{short}")).finish()
            }
        }
    };
}

impl_typed_id!(BlockId, "BlockId");
impl_typed_id!(PageId, "PageId");

// ── Prefix resolution ───────────────────────────────────────────────────────

/// Error from prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("no block matches '{0}'")]
    NoMatch(String),
    #[error("ambiguous prefix '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a query string against a set of block IDs.
///
/// A full UUID (with or without hyphens) is matched exactly; anything shorter
/// must be a unique hex prefix. A query with no hex digits matches nothing.
pub fn resolve_block_prefix(
    ids: impl IntoIterator<Item = BlockId>,
    query: &str,
) -> Result<BlockId, PrefixError> {
    if query.chars().all(|c| c == '-' || c.is_whitespace()) {
        return Err(PrefixError::NoMatch(query.to_string()));
    }
    let ids: Vec<BlockId> = ids.into_iter().collect();

    if let Ok(exact) = BlockId::parse(query) {
        return if ids.contains(&exact) {
            Ok(exact)
        } else {
            Err(PrefixError::NoMatch(query.to_string()))
        };
    }

    let matches: Vec<BlockId> = ids
        .iter()
        .filter(|id| id.matches_hex_prefix(query))
        .copied()
        .collect();

    match matches.len() {
        0 => Err(PrefixError::NoMatch(query.to_string())),
        1 => Ok(matches[0]),
        _ => Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: matches.iter().map(|id| id.short()).collect(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
