//! Symbols and words.

mod symbol;
mod word;

pub use symbol::*;
pub use word::*;
