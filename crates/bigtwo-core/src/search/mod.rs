pub mod decompose;

pub use decompose::{Decomposition, SearchMode, decompose};
