pub mod config;
pub mod index;
pub mod normalize;
pub mod resolver;

pub use config::MatcherConfig;
pub use index::{build_index, NameVariationIndex};
pub use normalize::normalize;
pub use resolver::{resolve, MatchRule, StaffMatch};
