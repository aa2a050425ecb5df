pub mod defaults;
pub mod parsers;
pub mod rule;

pub use defaults::{ThemeKey, global_default};
pub use parsers::StyleParseError;
pub use rule::StyleRule;
