//! Search engine implementations.

mod bing;
mod duckduckgo;
mod google;

pub use bing::Bing;
pub use duckduckgo::DuckDuckGo;
pub use google::Google;
