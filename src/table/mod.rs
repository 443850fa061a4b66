//! Resource table generation broken into focused submodules for easier testing.

mod escaping;
mod rendering;
mod scanning;

pub use escaping::{delimiter_escape, escape_delimiter, is_valid_delimiter, restore_delimiters};
pub use rendering::SourceTemplate;
pub use scanning::{ResourceFile, scan_resources};
