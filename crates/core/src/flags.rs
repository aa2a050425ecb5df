//! The page-scoped idempotence flag table.
//!
//! Keys under [`RESERVED_PREFIX`] belong to the framework:
//!
//! | Key | Meaning |
//! |---|---|
//! | `arbor.focus` | a node has claimed initial keyboard focus |
//! | `arbor.tooltip-script` | the shared tooltip script is installed |
//! | `arbor.id-counter` | next synthetic identifier number |
//! | `arbor.stop-click-script` | the click-propagation helper is installed |
//! | `arbor.token:<token>` | a resource with that token has been registered |
//!
//! Collaborators may use any other key through [`PageFlagTable::mark`].

use crate::error::TreeError;
use std::collections::HashMap;

pub const RESERVED_PREFIX: &str = "arbor.";
pub const FOCUS_KEY: &str = "arbor.focus";
pub const TOOLTIP_SCRIPT_KEY: &str = "arbor.tooltip-script";
pub const ID_COUNTER_KEY: &str = "arbor.id-counter";
pub const STOP_CLICK_SCRIPT_KEY: &str = "arbor.stop-click-script";
pub const TOKEN_PREFIX: &str = "arbor.token:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Done,
    Counter(u64),
    /// Records which node claimed a singleton (e.g. the focus owner's id).
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct PageFlagTable {
    flags: HashMap<String, FlagValue>,
}

/// The flag key guarding registration of `token`.
pub fn token_key(token: &str) -> String {
    format!("{TOKEN_PREFIX}{token}")
}

impl PageFlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Marks a collaborator key as done. Returns `true` if this call set it.
    pub fn mark(&mut self, key: &str) -> Result<bool, TreeError> {
        if key.starts_with(RESERVED_PREFIX) {
            return Err(TreeError::ReservedFlag(key.to_string()));
        }
        Ok(self.set_if_absent(key, FlagValue::Done))
    }

    /// Marks a collaborator key on behalf of `owner`. Returns `true` if the
    /// key was free or already held by the same owner.
    pub fn mark_owned(&mut self, key: &str, owner: &str) -> Result<bool, TreeError> {
        if key.starts_with(RESERVED_PREFIX) {
            return Err(TreeError::ReservedFlag(key.to_string()));
        }
        Ok(match self.claim(key, owner) {
            Ok(()) => true,
            Err(existing) => existing == owner,
        })
    }

    pub(crate) fn mark_reserved(&mut self, key: &str) -> bool {
        self.set_if_absent(key, FlagValue::Done)
    }

    /// Claims a singleton for `owner`; `Err` carries the existing owner.
    pub(crate) fn claim(&mut self, key: &str, owner: &str) -> Result<(), String> {
        match self.flags.get(key) {
            Some(FlagValue::Text(existing)) => Err(existing.clone()),
            Some(_) => Err(String::new()),
            None => {
                self.flags
                    .insert(key.to_string(), FlagValue::Text(owner.to_string()));
                Ok(())
            }
        }
    }

    /// Returns the current counter value and stores its successor.
    pub(crate) fn advance_counter(&mut self, key: &str) -> u64 {
        let current = match self.flags.get(key) {
            Some(FlagValue::Counter(n)) => *n,
            _ => 0,
        };
        self.flags
            .insert(key.to_string(), FlagValue::Counter(current + 1));
        current
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    fn set_if_absent(&mut self, key: &str, value: FlagValue) -> bool {
        if self.flags.contains_key(key) {
            return false;
        }
        self.flags.insert(key.to_string(), value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_owned_allows_same_owner() {
        let mut flags = PageFlagTable::new();
        assert!(flags.mark_owned("field:page", "n3").unwrap());
        assert!(flags.mark_owned("field:page", "n3").unwrap());
        assert!(!flags.mark_owned("field:page", "n4").unwrap());
        assert!(flags.mark_owned("arbor.field", "n3").is_err());
        assert_eq!(flags.get("field:page"), Some(&FlagValue::Text("n3".to_string())));
    }

    #[test]
    fn test_mark_is_first_wins() {
        let mut flags = PageFlagTable::new();
        assert!(flags.mark("calendar-init").unwrap());
        assert!(!flags.mark("calendar-init").unwrap());
        assert_eq!(flags.get("calendar-init"), Some(&FlagValue::Done));
    }

    #[test]
    fn test_reserved_keys_rejected() {
        let mut flags = PageFlagTable::new();
        assert_eq!(
            flags.mark(FOCUS_KEY),
            Err(TreeError::ReservedFlag("arbor.focus".to_string()))
        );
        assert!(flags.mark(&token_key("x")).is_err());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_counter_starts_at_zero() {
        let mut flags = PageFlagTable::new();
        assert_eq!(flags.advance_counter(ID_COUNTER_KEY), 0);
        assert_eq!(flags.advance_counter(ID_COUNTER_KEY), 1);
        assert_eq!(flags.get(ID_COUNTER_KEY), Some(&FlagValue::Counter(2)));
    }

    #[test]
    fn test_claim_reports_owner() {
        let mut flags = PageFlagTable::new();
        assert!(flags.claim(FOCUS_KEY, "name").is_ok());
        assert_eq!(flags.claim(FOCUS_KEY, "other"), Err("name".to_string()));
    }
}
