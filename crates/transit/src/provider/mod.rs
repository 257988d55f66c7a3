//! Stop catalog providers.

pub mod builtin;
pub mod static_catalog;

pub use static_catalog::StopCatalog;
