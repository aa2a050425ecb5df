pub mod capability;
pub mod catalog;

pub use capability::{Capabilities, ClientClass, Feature, StaticCapabilities};
pub use catalog::{Bundle, CatalogError, InMemoryModuleCatalog, ModuleCatalog};
