//! Presentation defaults inherited through the parent chain.
//!
//! Resolution is nearest-wins-entirely: a node's own overlay governs it when
//! one exists, otherwise the first ancestor owning a changed overlay supplies
//! every key, and overlays further up are never merged in. Keys missing from
//! that overlay fall back to the global default table, not to the next
//! overlay ancestor.

use crate::error::TreeError;
use crate::node::NodeId;
use crate::tree::Document;
use arbor_style::global_default;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeOverlay {
    values: BTreeMap<String, String>,
    changed: bool,
}

impl ThemeOverlay {
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self.changed = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The overlay's own value for `key`, else the global default.
    pub fn default_for(&self, key: &str) -> Option<&str> {
        self.get(key).or_else(|| global_default(key))
    }

    /// Whether any value was ever written. Untouched ancestor overlays do not
    /// shadow the ones above them.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Governs nodes with no overlay of their own and none above them.
static UNSET: ThemeOverlay = ThemeOverlay {
    values: BTreeMap::new(),
    changed: false,
};

pub struct ThemeResolver;

impl ThemeResolver {
    /// The overlay governing `id`.
    pub fn theme(doc: &Document, id: NodeId) -> Result<&ThemeOverlay, TreeError> {
        let node = doc.node(id)?;
        if let Some(local) = node.theme.get() {
            return Ok(local);
        }
        let Some(mut current) = node.parent else {
            return Ok(&UNSET);
        };
        loop {
            let ancestor = doc.node(current)?;
            if let Some(overlay) = ancestor.theme.get().filter(|o| o.is_changed()) {
                return Ok(overlay);
            }
            match ancestor.parent {
                Some(parent) => current = parent,
                None => return Ok(&UNSET),
            }
        }
    }

    /// The node's own overlay, created on first use.
    pub fn theme_mut(doc: &mut Document, id: NodeId) -> Result<&mut ThemeOverlay, TreeError> {
        doc.access().ensure_mutable("theme_mut")?;
        let node = doc.node_mut(id)?;
        node.theme.get_or_init(ThemeOverlay::default);
        node.theme.get_mut().ok_or(TreeError::UnknownNode(id))
    }

    /// Resolves one key for `id`.
    pub fn value_for(doc: &Document, id: NodeId, key: &str) -> Result<Option<String>, TreeError> {
        Ok(Self::theme(doc, id)?.default_for(key).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfig;
    use crate::testing::Probe;
    use arbor_style::ThemeKey;

    fn chain() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new(DocumentConfig::default()).unwrap();
        let outer = doc.create(Probe::boxed("outer"));
        let inner = doc.create(Probe::boxed("inner"));
        let leaf = doc.create(Probe::boxed("leaf"));
        doc.append(doc.root(), outer).unwrap();
        doc.append(outer, inner).unwrap();
        doc.append(inner, leaf).unwrap();
        (doc, outer, inner, leaf)
    }

    #[test]
    fn test_global_default_without_overlays() {
        let (doc, _, _, leaf) = chain();
        let theme = ThemeResolver::theme(&doc, leaf).unwrap();
        assert!(!theme.is_changed());
        assert_eq!(theme.default_for(ThemeKey::TOOLTIP_DELAY), Some("500"));
    }

    #[test]
    fn test_nearest_overlay_wins_entirely() {
        let (mut doc, outer, inner, leaf) = chain();
        ThemeResolver::theme_mut(&mut doc, outer)
            .unwrap()
            .set(ThemeKey::COLOR, "red")
            .set(ThemeKey::FONT_SIZE, "20px");
        ThemeResolver::theme_mut(&mut doc, inner)
            .unwrap()
            .set(ThemeKey::COLOR, "blue");

        let theme = ThemeResolver::theme(&doc, leaf).unwrap();
        assert_eq!(theme.default_for(ThemeKey::COLOR), Some("blue"));
        // Set only on the farther overlay: not merged, global default applies.
        assert_eq!(theme.default_for(ThemeKey::FONT_SIZE), Some("14px"));
    }

    #[test]
    fn test_unchanged_local_overlay_still_governs() {
        let (mut doc, outer, _, leaf) = chain();
        ThemeResolver::theme_mut(&mut doc, outer)
            .unwrap()
            .set(ThemeKey::COLOR, "red");
        ThemeResolver::theme_mut(&mut doc, leaf).unwrap();

        let theme = ThemeResolver::theme(&doc, leaf).unwrap();
        assert!(std::ptr::eq(theme, doc.node(leaf).unwrap().theme.get().unwrap()));
        assert_eq!(
            ThemeResolver::value_for(&doc, leaf, ThemeKey::COLOR).unwrap(),
            global_default(ThemeKey::COLOR).map(str::to_string)
        );
    }

    #[test]
    fn test_unchanged_ancestor_overlay_does_not_shadow() {
        let (mut doc, outer, inner, leaf) = chain();
        ThemeResolver::theme_mut(&mut doc, outer)
            .unwrap()
            .set(ThemeKey::COLOR, "red");
        ThemeResolver::theme_mut(&mut doc, inner).unwrap();
        assert_eq!(
            ThemeResolver::value_for(&doc, leaf, ThemeKey::COLOR).unwrap(),
            Some("red".to_string())
        );
    }

    #[test]
    fn test_local_overlay_preferred() {
        let (mut doc, outer, _, leaf) = chain();
        ThemeResolver::theme_mut(&mut doc, outer)
            .unwrap()
            .set(ThemeKey::COLOR, "red");
        ThemeResolver::theme_mut(&mut doc, leaf)
            .unwrap()
            .set(ThemeKey::COLOR, "green");
        assert_eq!(
            ThemeResolver::value_for(&doc, leaf, ThemeKey::COLOR).unwrap(),
            Some("green".to_string())
        );
    }

    #[test]
    fn test_lookup_creates_no_overlay() {
        let (mut doc, outer, _, _) = chain();
        let lone = doc.create(Probe::boxed("lone"));
        let theme = ThemeResolver::theme(&doc, lone).unwrap();
        assert!(!theme.is_changed());
        assert!(doc.node(lone).unwrap().theme.get().is_none());

        // Attached later, the earlier lookup must not shadow the new parent.
        ThemeResolver::theme_mut(&mut doc, outer)
            .unwrap()
            .set(ThemeKey::COLOR, "red");
        doc.append(outer, lone).unwrap();
        assert_eq!(
            ThemeResolver::value_for(&doc, lone, ThemeKey::COLOR).unwrap(),
            Some("red".to_string())
        );
    }
}
