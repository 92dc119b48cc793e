/// Block ID utilities.
///
/// Block IDs are unique within a document and never change after creation:
/// - Generated: `block-{uuid v7}` (millisecond timestamp + random bits)
/// - Legacy: `legacy-content` for non-JSON stored content,
///   `legacy-block-{index}` for stored blocks that arrived without an id
use uuid::Uuid;

const GENERATED_PREFIX: &str = "block-";
const LEGACY_BLOCK_PREFIX: &str = "legacy-block-";

/// ID of the single text block synthesized from non-JSON stored content.
pub const LEGACY_CONTENT_ID: &str = "legacy-content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockIdKind {
    Generated(String),
    LegacyContent,
    LegacyBlock(usize),
    /// Any other author- or importer-supplied id.
    Custom(String),
}

impl BlockIdKind {
    pub fn parse(id: &str) -> Self {
        if id == LEGACY_CONTENT_ID {
            BlockIdKind::LegacyContent
        } else if let Some(index) = id
            .strip_prefix(LEGACY_BLOCK_PREFIX)
            .and_then(|rest| rest.parse().ok())
        {
            BlockIdKind::LegacyBlock(index)
        } else if let Some(rest) = id.strip_prefix(GENERATED_PREFIX) {
            BlockIdKind::Generated(rest.to_string())
        } else {
            BlockIdKind::Custom(id.to_string())
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, BlockIdKind::LegacyContent | BlockIdKind::LegacyBlock(_))
    }
}

/// Generate a fresh block id. Collisions are negligible: v7 UUIDs carry a
/// millisecond timestamp followed by 74 random bits.
pub fn generate_block_id() -> String {
    format!("{GENERATED_PREFIX}{}", Uuid::now_v7().simple())
}

/// Deterministic id for a stored block found without one at `index`.
pub fn legacy_block_id(index: usize) -> String {
    format!("{LEGACY_BLOCK_PREFIX}{index}")
}
