pub mod ids;
pub mod version;

pub use ids::{ElementId, IdError, ResourceToken};
pub use version::{LinkAddress, ModuleVersion, VersionError};
