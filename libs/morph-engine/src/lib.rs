pub mod adapter;
pub mod catalog;
pub mod config;
pub mod converter;
pub mod hierarchy;
pub mod rule;
pub mod table;

mod standard;

pub use adapter::Adapter;
pub use catalog::Catalog;
pub use config::{CatalogConfig, MorphConfig};
pub use converter::{StandardConverter, StandardConverterBuilder};
pub use hierarchy::{TypeHierarchy, Upcast};
pub use rule::{Direction, ErasedRule, Rule};
pub use table::{RuleMatch, RuleTable};
