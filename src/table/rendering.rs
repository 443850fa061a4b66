//! Fixed header, footer and per-resource assignment lines of the generated source file.

use std::io::{self, Write};

use crate::config::BundlerConfig;
use crate::table::escaping::escape_delimiter;

/// Names spliced into the generated file.
#[derive(Debug, Clone)]
pub struct SourceTemplate<'a> {
  /// Package declared on the first line.
  pub package_name: &'a str,
  /// Function holding the assignments.
  pub function_name: &'a str,
  /// Map variable the assignments write into.
  pub map_name: &'a str,
  /// Raw string literal delimiter.
  pub delimiter: char,
}

impl<'a> SourceTemplate<'a> {
  /// Borrow the template names from a bundler configuration.
  pub fn from_config(config: &'a BundlerConfig) -> Self {
    Self {
      package_name: &config.package_name,
      function_name: &config.function_name,
      map_name: &config.map_name,
      delimiter: config.delimiter,
    }
  }

  /// Package clause, usage comment and the opening of the wrapping function.
  pub fn header(&self) -> String {
    format!(
      r#"package {package}

// GENERATED FILE: Append here all the resources to be exposed as variables
// {map}["index.html"] = etc...
// {map}["css/style.css"] = etc...

func {function}() {{
"#,
      package = self.package_name,
      map = self.map_name,
      function = self.function_name,
    )
  }

  /// Closes the wrapping function.
  pub fn footer(&self) -> &'static str {
    "return }\n"
  }

  /// Single assignment line storing `content` under `key`.
  pub fn entry(&self, key: &str, content: &str) -> String {
    let key_literal = serde_json::to_string(key).unwrap_or_else(|_| format!("{key:?}"));
    format!(
      "{map}[{key_literal}] = {d}{body}{d}\n",
      map = self.map_name,
      d = self.delimiter,
      body = escape_delimiter(content, self.delimiter),
    )
  }

  /// Write the assignment line for one resource.
  pub fn write_entry<W: Write>(&self, writer: &mut W, key: &str, content: &str) -> io::Result<()> {
    writer.write_all(self.entry(key, content).as_bytes())
  }
}
