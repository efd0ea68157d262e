//! Search provider module
//!
//! Defines the capability a search backend offers and the DuckDuckGo
//! implementation of it.

mod error;
mod options;
mod traits;

pub mod duckduckgo;

#[cfg(test)]
pub(crate) mod testing;

pub use duckduckgo::DuckDuckGo;
pub use error::ProviderError;
pub use options::*;
pub use traits::*;
