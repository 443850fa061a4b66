//! Bundle orchestrator: walks the resource root and streams the generated source file.

use std::fs::{self, File};
use std::io::{self, ErrorKind, LineWriter, Write};
use std::path::{Path, PathBuf};

use same_file::Handle;

use crate::config::BundlerConfig;
use crate::models::{BundleArtifacts, ResourceEntry};
use crate::resource_paths::ExtensionFilter;
use crate::table::{ResourceFile, SourceTemplate, is_valid_delimiter, scan_resources};

/// Result type used by the bundler.
pub type BundleResult<T> = Result<T, BundleError>;

/// Reasons a generation run is aborted.
///
/// Nothing is rolled back: an error raised after the output file was opened leaves a truncated file.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
  /// The resource root is missing or is not a directory.
  #[error("resource directory {} does not exist", .path.display())]
  MissingRoot {
    /// Configured root directory.
    path: PathBuf,
  },
  /// The delimiter would show up inside its own escape sequence.
  #[error("{delimiter:?} cannot be used as a literal delimiter")]
  InvalidDelimiter {
    /// Rejected delimiter.
    delimiter: char,
  },
  /// The extension allow-list could not be compiled.
  #[error("invalid extension allow-list: {0}")]
  Pattern(#[from] regex::Error),
  /// The directory walk failed part way.
  #[error("failed to walk {}: {source}", .root.display())]
  Walk {
    /// Root directory being walked.
    root: PathBuf,
    /// Source walk error.
    #[source]
    source: walkdir::Error,
  },
  /// A resource could not be read.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    /// Resource path.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: io::Error,
  },
  /// A resource is not valid UTF-8 text.
  #[error("{} is not valid UTF-8", .path.display())]
  Decode {
    /// Resource path.
    path: PathBuf,
  },
  /// The generated file could not be created or written.
  #[error("failed to write {}: {source}", .path.display())]
  Write {
    /// Output path.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: io::Error,
  },
}

/// High-level helper generating the embedded resource table for one configuration.
pub struct ResourceBundler<'a> {
  config: &'a BundlerConfig,
}

impl<'a> ResourceBundler<'a> {
  /// Create a bundler for the provided configuration.
  pub fn new(config: &'a BundlerConfig) -> Self {
    Self { config }
  }

  /// Scan the resource root and overwrite the output file with the generated table.
  pub fn generate(&self) -> BundleResult<BundleArtifacts> {
    let config = self.config;
    let root = config.root_dir.as_path();
    let output_path = config.output_path.as_path();

    if !root.is_dir() {
      return Err(BundleError::MissingRoot {
        path: root.to_path_buf(),
      });
    }
    if !is_valid_delimiter(config.delimiter) {
      return Err(BundleError::InvalidDelimiter {
        delimiter: config.delimiter,
      });
    }

    let filter = ExtensionFilter::new(config.allowed_extensions.as_slice())?;
    let template = SourceTemplate::from_config(config);

    tracing::info!(
      root = %root.display(),
      output = %output_path.display(),
      "extracting web resources"
    );

    let file = File::create(output_path).map_err(|source| write_error(output_path, source))?;
    let output_identity = if output_lies_under(root, output_path) {
      Handle::from_path(output_path).ok()
    } else {
      None
    };
    let mut writer = LineWriter::new(file);

    writer
      .write_all(template.header().as_bytes())
      .map_err(|source| write_error(output_path, source))?;

    let mut artifacts = BundleArtifacts {
      output_path: output_path.to_path_buf(),
      ..BundleArtifacts::default()
    };

    for resource in scan_resources(root, &filter, config.walk_order) {
      let resource = resource.map_err(|source| BundleError::Walk {
        root: root.to_path_buf(),
        source,
      })?;

      if is_output_file(output_identity.as_ref(), output_path, &resource.path) {
        tracing::debug!(path = %resource.path.display(), "skipping generated output file");
        continue;
      }

      let entry = read_resource(resource)?;
      tracing::debug!(key = %entry.key, bytes = entry.content.len(), "embedding resource");
      template
        .write_entry(&mut writer, &entry.key, &entry.content)
        .map_err(|source| write_error(output_path, source))?;
      artifacts.resources.push(entry.key);
    }

    writer
      .write_all(template.footer().as_bytes())
      .and_then(|_| writer.flush())
      .map_err(|source| write_error(output_path, source))?;

    tracing::info!(
      resources = artifacts.resource_count(),
      output = %output_path.display(),
      "resource table written"
    );

    Ok(artifacts)
  }
}

/// Generate the resource table described by `config`.
pub fn generate(config: &BundlerConfig) -> BundleResult<BundleArtifacts> {
  ResourceBundler::new(config).generate()
}

fn read_resource(resource: ResourceFile) -> BundleResult<ResourceEntry> {
  match fs::read_to_string(&resource.path) {
    Ok(content) => Ok(ResourceEntry {
      key: resource.key,
      content,
    }),
    Err(err) if err.kind() == ErrorKind::InvalidData => Err(BundleError::Decode {
      path: resource.path,
    }),
    Err(source) => Err(BundleError::Read {
      path: resource.path,
      source,
    }),
  }
}

/// Whether the generated file sits somewhere inside the resource root, in which case the walk
/// could run into it.
fn output_lies_under(root: &Path, output_path: &Path) -> bool {
  match (fs::canonicalize(root), fs::canonicalize(output_path)) {
    (Ok(root), Ok(output)) => output.starts_with(root),
    _ => false,
  }
}

/// Only candidates sharing the output's file name are opened for the identity comparison.
fn is_output_file(output_identity: Option<&Handle>, output_path: &Path, candidate: &Path) -> bool {
  let Some(output) = output_identity else {
    return false;
  };
  if candidate.file_name() != output_path.file_name() {
    return false;
  }
  Handle::from_path(candidate).is_ok_and(|handle| &handle == output)
}

fn write_error(path: &Path, source: io::Error) -> BundleError {
  BundleError::Write {
    path: path.to_path_buf(),
    source,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::WalkOrder;
  use crate::table::restore_delimiters;
  use std::collections::BTreeMap;
  use tempfile::tempdir;

  fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  fn config_for(root: &Path, output: &Path) -> BundlerConfig {
    BundlerConfig {
      root_dir: root.to_path_buf(),
      output_path: output.to_path_buf(),
      ..BundlerConfig::default()
    }
  }

  /// Read the assignments back out of a generated file, reversing the delimiter escaping.
  fn parse_entries(source: &str, map_name: &str, delimiter: char) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    let opener = format!("{map_name}[\"");
    let (_, mut rest) = source.split_once("() {\n").unwrap();
    while let Some(start) = rest.find(&opener) {
      rest = &rest[start + opener.len()..];
      let key_end = rest.find("\"] = ").unwrap();
      let key = rest[..key_end].to_string();
      rest = &rest[key_end + "\"] = ".len()..];
      assert!(rest.starts_with(delimiter));
      rest = &rest[delimiter.len_utf8()..];
      let body_end = rest.find(delimiter).unwrap();
      entries.insert(key, restore_delimiters(&rest[..body_end], delimiter));
      rest = &rest[body_end + delimiter.len_utf8()..];
    }
    entries
  }

  #[test]
  fn writes_one_entry_per_matching_file() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    let output = dir.path().join("webresources.go");
    write_file(&root.join("index.html"), "<h1>Hi`Bye</h1>");
    write_file(&root.join("CSS/Style.CSS"), "body {\n  color: red;\n}\n");
    write_file(&root.join("readme.txt"), "not embedded");

    let artifacts = generate(&config_for(&root, &output)).unwrap();
    assert_eq!(artifacts.resources, vec!["css/Style.CSS", "index.html"]);

    let generated = fs::read_to_string(&output).unwrap();
    assert!(generated.contains("webresources[\"index.html\"] = `<h1>Hi\\u0060Bye</h1>`\n"));
    assert!(generated.contains("webresources[\"css/Style.CSS\"] = `body {\n  color: red;\n}\n`\n"));
    assert!(!generated.contains("readme"));
    assert!(generated.ends_with("return }\n"));
  }

  #[test]
  fn generated_entries_round_trip_to_file_contents() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    let output = dir.path().join("out.go");
    let files = [
      ("index.html", "<script>const t = `${a}`;</script>\r\n"),
      ("Js/Lib/Tool.js", "export const q = '`';\n"),
      ("css/empty.css", ""),
    ];
    for (relative, contents) in files {
      write_file(&root.join(relative), contents);
    }

    generate(&config_for(&root, &output)).unwrap();
    let generated = fs::read_to_string(&output).unwrap();
    let entries = parse_entries(&generated, "webresources", '`');

    let expected: BTreeMap<String, String> = [
      ("index.html", files[0].1),
      ("js/lib/Tool.js", files[1].1),
      ("css/empty.css", files[2].1),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();
    assert_eq!(entries, expected);
  }

  #[test]
  fn empty_root_produces_header_and_footer_only() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    fs::create_dir_all(&root).unwrap();
    let output = dir.path().join("webresources.go");

    let config = config_for(&root, &output);
    let artifacts = generate(&config).unwrap();
    assert!(artifacts.resources.is_empty());

    let template = SourceTemplate::from_config(&config);
    let expected = format!("{}{}", template.header(), template.footer());
    assert_eq!(fs::read_to_string(&output).unwrap(), expected);
  }

  #[test]
  fn repeated_runs_are_byte_identical() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    let output = dir.path().join("webresources.go");
    write_file(&root.join("b.js"), "b");
    write_file(&root.join("a/a.css"), "a");
    write_file(&root.join("z/index.html"), "z");

    let config = config_for(&root, &output);
    generate(&config).unwrap();
    let first = fs::read(&output).unwrap();
    generate(&config).unwrap();
    let second = fs::read(&output).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn escaped_literals_contain_no_bare_delimiters() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    let output = dir.path().join("webresources.go");
    write_file(&root.join("tpl.js"), "```\n`x`\n");

    let config = config_for(&root, &output);
    generate(&config).unwrap();
    let generated = fs::read_to_string(&output).unwrap();
    let template = SourceTemplate::from_config(&config);
    let body = generated
      .strip_prefix(template.header().as_str())
      .and_then(|rest| rest.strip_suffix(template.footer()))
      .unwrap();

    assert_eq!(body.matches('`').count(), 2);
    assert_eq!(body.matches("\\u0060").count(), 5);
  }

  #[test]
  fn skips_output_file_inside_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    write_file(&root.join("index.html"), "<p>hi</p>");
    let output = root.join("bundle.js");

    let config = BundlerConfig {
      walk_order: WalkOrder::Filesystem,
      ..config_for(&root, &output)
    };
    let artifacts = generate(&config).unwrap();
    assert_eq!(artifacts.resources, vec!["index.html"]);
  }

  #[test]
  fn detects_output_only_when_inside_root() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    write_file(&root.join("nested/out.js"), "");
    write_file(&dir.path().join("out.go"), "");

    assert!(output_lies_under(&root, &root.join("nested/out.js")));
    assert!(output_lies_under(&root.join("nested/.."), &root.join("nested/out.js")));
    assert!(!output_lies_under(&root, &dir.path().join("out.go")));
    assert!(!output_lies_under(&root, &root.join("missing.js")));
  }

  #[test]
  fn identity_is_checked_only_for_same_named_candidates() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("a/out.js");
    write_file(&output, "");
    write_file(&dir.path().join("b/out.js"), "");
    write_file(&dir.path().join("a/other.js"), "");
    let identity = Handle::from_path(&output).unwrap();

    assert!(is_output_file(Some(&identity), &output, &output));
    assert!(!is_output_file(Some(&identity), &output, &dir.path().join("b/out.js")));
    assert!(!is_output_file(Some(&identity), &output, &dir.path().join("a/other.js")));
    assert!(!is_output_file(None, &output, &output));
  }

  #[test]
  fn output_beside_root_does_not_hide_resources() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    write_file(&root.join("app.js"), "run()");
    let output = dir.path().join("app.js");

    let artifacts = generate(&config_for(&root, &output)).unwrap();
    assert_eq!(artifacts.resources, vec!["app.js"]);
  }

  #[test]
  fn missing_root_is_reported_before_touching_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("webresources.go");
    fs::write(&output, "previous").unwrap();

    let err = generate(&config_for(&dir.path().join("missing"), &output)).unwrap_err();
    assert!(matches!(err, BundleError::MissingRoot { .. }));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
  }

  #[test]
  fn non_utf8_resource_aborts_with_decode_error() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("broken.js"), [0xff, 0xfe, 0x00]).unwrap();
    let output = dir.path().join("webresources.go");

    let err = generate(&config_for(&root, &output)).unwrap_err();
    assert!(matches!(err, BundleError::Decode { ref path } if path.ends_with("broken.js")));
  }

  #[test]
  fn unwritable_output_is_a_write_error() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    fs::create_dir_all(&root).unwrap();
    let output = dir.path().join("no-such-dir").join("webresources.go");

    let err = generate(&config_for(&root, &output)).unwrap_err();
    assert!(matches!(err, BundleError::Write { .. }));
  }

  #[test]
  fn rejects_delimiters_that_cannot_be_escaped() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("web");
    fs::create_dir_all(&root).unwrap();

    let config = BundlerConfig {
      delimiter: '\\',
      ..config_for(&root, &dir.path().join("out.go"))
    };
    let err = generate(&config).unwrap_err();
    assert!(matches!(err, BundleError::InvalidDelimiter { delimiter: '\\' }));
  }

  #[test]
  fn honours_custom_extensions_and_names() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("assets");
    write_file(&root.join("Icons/logo.SVG"), "<svg/>");
    write_file(&root.join("index.html"), "<p/>");
    let output = dir.path().join("assets.go");

    let config = BundlerConfig {
      allowed_extensions: vec!["svg".into()],
      map_name: "files".into(),
      ..config_for(&root, &output)
    };
    let artifacts = generate(&config).unwrap();
    assert_eq!(artifacts.resources, vec!["icons/logo.SVG"]);

    let generated = fs::read_to_string(&output).unwrap();
    assert!(generated.contains("files[\"icons/logo.SVG\"] = `<svg/>`\n"));
  }
}
