pub mod pronos;
pub mod settlement;

pub use settlement::{settle_prono, ResultReport};
