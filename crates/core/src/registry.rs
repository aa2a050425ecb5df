//! The page-scoped resource registry.
//!
//! Every registration carries a token; the first registration of a token wins
//! and later ones are no-ops, across the whole document. External links are
//! additionally deduplicated per `(kind, module, path)` with version
//! supersession, and presentation rule-sets are interned by structural
//! equality.

use crate::flags::{PageFlagTable, token_key};
use arbor_style::StyleRule;
use arbor_types::{LinkAddress, ResourceToken, VersionError};
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadClass {
    /// Emitted in registration order before the body closes.
    Blocking,
    /// Spliced ahead of the first script already in the output.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Script,
    Stylesheet,
}

/// Page state changes a handler can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateEvent {
    Load,
    Unload,
    Resize,
}

impl StateEvent {
    pub fn dom_event(self) -> &'static str {
        match self {
            StateEvent::Load => "load",
            StateEvent::Unload => "unload",
            StateEvent::Resize => "resize",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Inline(String),
    Link { address: LinkAddress, kind: LinkKind },
    Meta { name: String, content: String },
    StateHandler { event: StateEvent, script: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    pub token: ResourceToken,
    pub payload: Payload,
    pub load: LoadClass,
}

impl ResourceEntry {
    pub fn inline_script(token: impl Into<ResourceToken>, script: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            payload: Payload::Inline(script.into()),
            load: LoadClass::Blocking,
        }
    }

    pub fn deferred_script(token: impl Into<ResourceToken>, script: impl Into<String>) -> Self {
        Self::inline_script(token, script).with_load(LoadClass::Deferred)
    }

    /// A link to `module/version/path`. The address itself is the token, so
    /// the same address registers once while other versions of the same
    /// path go through supersession.
    pub fn link(address: &str, kind: LinkKind) -> Result<Self, VersionError> {
        let address = LinkAddress::parse(address)?;
        Ok(Self {
            token: ResourceToken::from(address.to_string()),
            payload: Payload::Link { address, kind },
            load: LoadClass::Blocking,
        })
    }

    pub fn meta(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            token: ResourceToken::from(format!("meta:{name}")),
            payload: Payload::Meta {
                name,
                content: content.into(),
            },
            load: LoadClass::Blocking,
        }
    }

    pub fn state_handler(
        token: impl Into<ResourceToken>,
        event: StateEvent,
        script: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            payload: Payload::StateHandler {
                event,
                script: script.into(),
            },
            load: LoadClass::Blocking,
        }
    }

    pub fn with_load(mut self, load: LoadClass) -> Self {
        self.load = load;
        self
    }

    pub fn is_script(&self) -> bool {
        matches!(
            self.payload,
            Payload::Inline(_)
                | Payload::Link {
                    kind: LinkKind::Script,
                    ..
                }
        )
    }
}

type LinkKey = (LinkKind, String, String);

#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    scripts: Vec<ResourceEntry>,
    stylesheets: Vec<ResourceEntry>,
    links: HashMap<LinkKey, usize>,
    metas: IndexMap<String, String>,
    handlers: IndexMap<StateEvent, Vec<String>>,
    styles: IndexMap<StyleRule, String>,
    class_prefix: String,
}

impl ResourceRegistry {
    pub fn new(class_prefix: impl Into<String>) -> Self {
        Self {
            scripts: Vec::new(),
            stylesheets: Vec::new(),
            links: HashMap::new(),
            metas: IndexMap::new(),
            handlers: IndexMap::new(),
            styles: IndexMap::new(),
            class_prefix: class_prefix.into(),
        }
    }

    /// Registers `entry` unless its token was already seen on this page.
    ///
    /// Returns `true` if the registry changed.
    pub fn register(&mut self, flags: &mut PageFlagTable, entry: ResourceEntry) -> bool {
        if !flags.mark_reserved(&token_key(entry.token.as_str())) {
            trace!("Token '{}' already registered, skipping", entry.token);
            return false;
        }
        match &entry.payload {
            Payload::Inline(_) => {
                self.scripts.push(entry);
                true
            }
            Payload::Link { address, kind } => {
                let key = (*kind, address.module.clone(), address.path.clone());
                self.register_link(key, entry)
            }
            Payload::Meta { name, content } => {
                if self.metas.contains_key(name) {
                    return false;
                }
                self.metas.insert(name.clone(), content.clone());
                true
            }
            Payload::StateHandler { event, script } => {
                self.handlers.entry(*event).or_default().push(script.clone());
                true
            }
        }
    }

    fn register_link(&mut self, key: LinkKey, entry: ResourceEntry) -> bool {
        let list = match key.0 {
            LinkKind::Script => &mut self.scripts,
            LinkKind::Stylesheet => &mut self.stylesheets,
        };
        let Some(&index) = self.links.get(&key) else {
            self.links.insert(key, list.len());
            list.push(entry);
            return true;
        };
        let (Payload::Link { address: existing, .. }, Payload::Link { address: incoming, .. }) =
            (&list[index].payload, &entry.payload)
        else {
            return false;
        };
        if incoming.version.supersedes(&existing.version) {
            debug!("Link '{existing}' superseded by '{incoming}'");
            list[index] = entry;
            true
        } else {
            debug!("Link '{incoming}' ignored; '{existing}' is newer or equal");
            false
        }
    }

    /// Returns the generated class for `rule`, registering it on first sight.
    pub fn intern_style(&mut self, rule: &StyleRule) -> String {
        if let Some(class) = self.styles.get(rule) {
            return class.clone();
        }
        let class = format!("{}{}", self.class_prefix, self.styles.len());
        self.styles.insert(rule.clone(), class.clone());
        class
    }

    pub fn class_for(&self, rule: &StyleRule) -> Option<&str> {
        self.styles.get(rule).map(String::as_str)
    }

    /// Interned rules in registration order with their class names.
    pub fn styles(&self) -> impl Iterator<Item = (&StyleRule, &str)> {
        self.styles.iter().map(|(rule, class)| (rule, class.as_str()))
    }

    pub fn blocking_scripts(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.scripts
            .iter()
            .filter(|e| e.load == LoadClass::Blocking)
    }

    pub fn deferred_scripts(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.scripts
            .iter()
            .filter(|e| e.load == LoadClass::Deferred)
    }

    pub fn stylesheets(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.stylesheets.iter()
    }

    pub fn metas(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metas.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn state_handlers(&self) -> impl Iterator<Item = (StateEvent, &[String])> {
        self.handlers.iter().map(|(e, s)| (*e, s.as_slice()))
    }

    /// Every module referenced by a registered link.
    pub fn required_modules(&self) -> BTreeSet<String> {
        self.scripts
            .iter()
            .chain(&self.stylesheets)
            .filter_map(|entry| match &entry.payload {
                Payload::Link { address, .. } => Some(address.module.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
            && self.stylesheets.is_empty()
            && self.metas.is_empty()
            && self.handlers.is_empty()
            && self.styles.is_empty()
    }
}
