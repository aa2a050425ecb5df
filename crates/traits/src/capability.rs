//! The capability oracle describing what the requesting client can handle.
//!
//! Detection (user-agent parsing, feature probing) happens outside arbor; the
//! compile and render passes only ask the closed set of questions below.

use std::collections::HashSet;
use std::fmt::Debug;

/// Broad client classes a detector may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientClass {
    Desktop,
    Mobile,
    Legacy,
    Crawler,
}

/// Client features the pipeline branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `event.stopPropagation()` is available.
    StopPropagation,
    /// Only the legacy `event.cancelBubble = true` form is available.
    CancelBubble,
    /// `<script defer>` is honoured.
    DeferredScripts,
    /// Scripts may run at all.
    Scripting,
}

/// A read-only description of the requesting client.
///
/// # Implementations
///
/// - `StaticCapabilities`: a fixed profile, built by hand or from one of the presets
pub trait Capabilities: Send + Sync + Debug {
    /// Whether the client belongs to the given class.
    fn is_class(&self, class: ClientClass) -> bool;

    /// The client's reported version, if known.
    fn version(&self) -> Option<&str>;

    /// Whether the client can handle `feature`.
    fn supports(&self, feature: Feature) -> bool;

    /// Returns a human-readable name for this profile (for logging/debugging).
    fn name(&self) -> &str;
}

/// A capability profile fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticCapabilities {
    name: String,
    class: ClientClass,
    version: Option<String>,
    features: HashSet<Feature>,
}

impl StaticCapabilities {
    pub fn new(name: impl Into<String>, class: ClientClass) -> Self {
        Self {
            name: name.into(),
            class,
            version: None,
            features: HashSet::new(),
        }
    }

    /// A current desktop browser.
    pub fn modern() -> Self {
        Self::new("modern", ClientClass::Desktop)
            .with_feature(Feature::StopPropagation)
            .with_feature(Feature::DeferredScripts)
            .with_feature(Feature::Scripting)
    }

    /// An old browser that only knows `cancelBubble` and ignores `defer`.
    pub fn legacy() -> Self {
        Self::new("legacy", ClientClass::Legacy)
            .with_version("6.0")
            .with_feature(Feature::CancelBubble)
            .with_feature(Feature::Scripting)
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "legacy" => Some(Self::legacy()),
            _ => None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn without_feature(mut self, feature: Feature) -> Self {
        self.features.remove(&feature);
        self
    }
}

impl Default for StaticCapabilities {
    fn default() -> Self {
        Self::modern()
    }
}

impl Capabilities for StaticCapabilities {
    fn is_class(&self, class: ClientClass) -> bool {
        self.class == class
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
