//! Configuration module

mod site;

pub use site::CatalogEntry;
pub use site::SiteConfig;
