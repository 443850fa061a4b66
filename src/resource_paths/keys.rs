use std::path::{Component, Path};

/// Produce the map key for a resource from its path relative to the resource root.
///
/// Directory segments are lower-cased while the file name keeps its case, and the key always uses
/// forward slashes so the generated table is identical regardless of the native separator used when
/// the files were discovered.
pub fn make_resource_key(relative_path: &Path) -> String {
    let segments: Vec<String> = relative_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let Some((file_name, directories)) = segments.split_last() else {
        return String::new();
    };

    directories
        .iter()
        .map(|segment| segment.to_lowercase())
        .chain(std::iter::once(file_name.clone()))
        .collect::<Vec<_>>()
        .join("/")
        .replace('\\', "/")
}
