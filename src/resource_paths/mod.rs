//! Helpers for turning files on disk into resource map keys.
//!
//! Key normalisation and extension filtering live in separate submodules so that each rule can be
//! tested without touching the filesystem.

mod filters;
mod keys;

pub use filters::ExtensionFilter;
pub use keys::make_resource_key;
