//! Builds the final H5P archive: manifest, per-item content files, and the
//! verbatim support-library trees, staged in a scoped temporary directory
//! and compressed into a single zip.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::errors::PackageError;
use crate::models::domain::content_item::ContentItem;
use crate::models::domain::library::LibraryRef;
use crate::models::domain::manifest::{content_file_path, PackageManifest};

pub struct PackageAssembler {
    library_root: PathBuf,
    work_dir: PathBuf,
}

impl PackageAssembler {
    pub fn new(library_root: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            library_root,
            work_dir,
        }
    }

    /// Assembles one package at `output_path`. Deterministic for identical
    /// inputs apart from zip-header timestamps. On any failure nothing is
    /// left at the output path, and the staging directory is removed on
    /// every exit path (it is a `TempDir`, dropped even on early return).
    ///
    /// Callers must serialize assemblies sharing an output path.
    pub fn assemble(
        &self,
        title: &str,
        language: &str,
        items: &[ContentItem],
        libraries: &BTreeSet<LibraryRef>,
        output_path: &Path,
    ) -> Result<PathBuf, PackageError> {
        let manifest = PackageManifest::new(title, language, items, libraries);

        fs::create_dir_all(&self.work_dir)?;
        let staging = tempfile::Builder::new()
            .prefix("h5p-staging-")
            .tempdir_in(&self.work_dir)?;

        fs::write(
            staging.path().join("h5p.json"),
            serde_json::to_vec(&manifest)?,
        )?;

        let content_dir = staging.path().join("content");
        fs::create_dir_all(&content_dir)?;
        for (index, item) in items.iter().enumerate() {
            fs::write(
                staging.path().join(content_file_path(index)),
                serde_json::to_vec(item)?,
            )?;
        }

        for library in libraries {
            let source = self.library_root.join(library.folder_name());
            if !source.is_dir() {
                return Err(PackageError::MissingLibrary(library.to_string()));
            }
            copy_tree(&source, &staging.path().join(library.folder_name()))?;
        }

        if let Err(err) = write_archive(staging.path(), output_path) {
            let _ = fs::remove_file(output_path);
            return Err(err);
        }

        log::info!(
            "assembled package with {} content items and {} libraries at {}",
            items.len(),
            libraries.len(),
            output_path.display()
        );

        Ok(output_path.to_path_buf())
    }
}

/// Byte-for-byte recursive copy preserving the internal directory structure.
fn copy_tree(source: &Path, target: &Path) -> Result<(), PackageError> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|err| PackageError::WriteFailure(err.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| PackageError::WriteFailure(err.to_string()))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

/// Zips the staging tree in sorted path order so identical inputs produce
/// identical entry layouts.
fn write_archive(staging: &Path, output_path: &Path) -> Result<(), PackageError> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(output_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(staging).sort_by_file_name() {
        let entry = entry.map_err(|err| PackageError::WriteFailure(err.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(staging)
            .map_err(|err| PackageError::WriteFailure(err.to_string()))?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let name = relative.to_string_lossy().replace('\\', "/");
        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            writer.write_all(&fs::read(entry.path())?)?;
        }
    }

    writer.finish()?;
    Ok(())
}
