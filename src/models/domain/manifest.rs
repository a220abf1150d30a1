use std::collections::BTreeSet;

use serde::Serialize;

use super::content_item::ContentItem;
use super::library::LibraryRef;

/// Top-level package descriptor, serialized as `h5p.json` at the archive
/// root. Built deterministically: one content entry per item in input order,
/// dependencies in sorted order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub title: String,
    pub language: String,
    pub embed_types: Vec<String>,
    pub content: Vec<ContentEntry>,
    pub preloaded_dependencies: Vec<LibraryRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    /// Archive-relative path of the serialized content file.
    pub path: String,
    /// Library reference in `Name major.minor` form, matching the copied
    /// asset folder version.
    pub library: String,
}

impl PackageManifest {
    pub fn new(
        title: &str,
        language: &str,
        items: &[ContentItem],
        libraries: &BTreeSet<LibraryRef>,
    ) -> Self {
        let content = items
            .iter()
            .enumerate()
            .map(|(index, item)| ContentEntry {
                path: content_file_path(index),
                library: item.library().to_string(),
            })
            .collect();

        Self {
            title: title.to_string(),
            language: language.to_string(),
            embed_types: vec!["iframe".to_string()],
            content,
            preloaded_dependencies: libraries.iter().copied().collect(),
        }
    }
}

/// Archive-relative path for the nth content item (1-based on disk).
pub fn content_file_path(index: usize) -> String {
    format!("content/content-{}.json", index + 1)
}
