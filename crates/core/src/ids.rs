//! Page-scoped synthetic identifier allocation.

use crate::error::TreeError;
use crate::flags::{ID_COUNTER_KEY, PageFlagTable};
use arbor_types::ElementId;

pub const DEFAULT_ID_PREFIX: &str = "ID_GEN";

/// Issues `<prefix><n>` identifiers. The counter lives in the page's flag
/// table, so every allocator over the same table continues one sequence.
#[derive(Debug, Clone)]
pub struct IdentifierAllocator {
    prefix: String,
}

impl IdentifierAllocator {
    /// Fails if `prefix` cannot start a valid identifier.
    pub fn new(prefix: impl Into<String>) -> Result<Self, TreeError> {
        let prefix = prefix.into();
        ElementId::generated(&prefix, 0)?;
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next(&self, flags: &mut PageFlagTable) -> Result<ElementId, TreeError> {
        let n = flags.advance_counter(ID_COUNTER_KEY);
        Ok(ElementId::generated(&self.prefix, n)?)
    }
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}
