pub mod aggregator;
pub mod derived;
pub mod resolver;

pub use aggregator::summarize;
pub use derived::{derive_state, enrich};
pub use resolver::{resolve_status, ResolveInput};
