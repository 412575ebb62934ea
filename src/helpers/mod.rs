//! Helper functions shared by the parsers and the renderers

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
