use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use h5p_forge::errors::PackageError;
use h5p_forge::models::domain::content_item::ContentItem;
use h5p_forge::models::domain::library::LibraryRef;
use h5p_forge::models::domain::question::{NormalizedQuestion, QuestionBody};
use h5p_forge::services::{mapper, PackageAssembler};

fn sample_questions() -> Vec<NormalizedQuestion> {
    vec![
        NormalizedQuestion {
            prompt: "Sky color?".to_string(),
            feedback_correct: None,
            feedback_incorrect: None,
            body: QuestionBody::MultipleChoice {
                options: vec!["Blue".to_string(), "Red".to_string()],
                correct: "Blue".to_string(),
            },
        },
        NormalizedQuestion {
            prompt: "Grass color?".to_string(),
            feedback_correct: Some("Correct".to_string()),
            feedback_incorrect: None,
            body: QuestionBody::MultipleChoice {
                options: vec!["Green".to_string(), "Purple".to_string()],
                correct: "Green".to_string(),
            },
        },
    ]
}

fn sample_items() -> (Vec<ContentItem>, BTreeSet<LibraryRef>) {
    let items: Vec<ContentItem> = sample_questions().iter().map(mapper::map).collect();
    let libraries = mapper::required_libraries(&items);
    (items, libraries)
}

/// Populates a library root with every folder the sample items require.
fn populate_library_root(root: &Path, libraries: &BTreeSet<LibraryRef>) {
    for library in libraries {
        let dir = root.join(library.folder_name());
        fs::create_dir_all(dir.join("scripts")).expect("library folder");
        fs::write(
            dir.join("library.json"),
            format!("{{\"machineName\":\"{}\"}}", library.machine_name),
        )
        .expect("library.json");
        fs::write(
            dir.join("scripts").join("main.js"),
            format!("// {}", library.machine_name),
        )
        .expect("script");
    }
}

fn read_entry(archive_path: &Path, name: &str) -> Vec<u8> {
    let file = fs::File::open(archive_path).expect("archive should open");
    let mut archive = zip::ZipArchive::new(file).expect("archive should parse");
    let mut entry = archive.by_name(name).expect("entry should exist");
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).expect("entry should read");
    bytes
}

fn entry_names(archive_path: &Path) -> Vec<String> {
    let file = fs::File::open(archive_path).expect("archive should open");
    let archive = zip::ZipArchive::new(file).expect("archive should parse");
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn assemble_is_idempotent_for_identical_inputs() {
    let (items, libraries) = sample_items();
    let library_root = tempfile::tempdir().expect("library root");
    populate_library_root(library_root.path(), &libraries);
    let work_dir = tempfile::tempdir().expect("work dir");

    let assembler = PackageAssembler::new(
        library_root.path().to_path_buf(),
        work_dir.path().to_path_buf(),
    );

    let first = work_dir.path().join("first.h5p");
    let second = work_dir.path().join("second.h5p");
    assembler
        .assemble("Title", "en", &items, &libraries, &first)
        .expect("first assembly");
    assembler
        .assemble("Title", "en", &items, &libraries, &second)
        .expect("second assembly");

    // identical entry layout
    assert_eq!(entry_names(&first), entry_names(&second));

    // identical manifests and identical content-file bytes
    assert_eq!(read_entry(&first, "h5p.json"), read_entry(&second, "h5p.json"));
    assert_eq!(
        read_entry(&first, "content/content-1.json"),
        read_entry(&second, "content/content-1.json")
    );
    assert_eq!(
        read_entry(&first, "content/content-2.json"),
        read_entry(&second, "content/content-2.json")
    );
}

#[test]
fn manifest_library_versions_match_copied_folders() {
    let (items, libraries) = sample_items();
    let library_root = tempfile::tempdir().expect("library root");
    populate_library_root(library_root.path(), &libraries);
    let work_dir = tempfile::tempdir().expect("work dir");

    let assembler = PackageAssembler::new(
        library_root.path().to_path_buf(),
        work_dir.path().to_path_buf(),
    );
    let output = work_dir.path().join("out.h5p");
    assembler
        .assemble("Title", "en", &items, &libraries, &output)
        .expect("assembly");

    let manifest: serde_json::Value =
        serde_json::from_slice(&read_entry(&output, "h5p.json")).expect("manifest json");
    let names = entry_names(&output);

    for dependency in manifest["preloadedDependencies"]
        .as_array()
        .expect("dependencies array")
    {
        let folder = format!(
            "{}-{}.{}",
            dependency["machineName"].as_str().expect("machine name"),
            dependency["majorVersion"],
            dependency["minorVersion"]
        );
        assert!(
            names
                .iter()
                .any(|name| name.starts_with(&format!("{}/", folder))),
            "no copied folder for dependency {}",
            folder
        );
    }
}

#[test]
fn library_files_are_copied_byte_for_byte() {
    let (items, libraries) = sample_items();
    let library_root = tempfile::tempdir().expect("library root");
    populate_library_root(library_root.path(), &libraries);
    let work_dir = tempfile::tempdir().expect("work dir");

    let assembler = PackageAssembler::new(
        library_root.path().to_path_buf(),
        work_dir.path().to_path_buf(),
    );
    let output = work_dir.path().join("out.h5p");
    assembler
        .assemble("Title", "en", &items, &libraries, &output)
        .expect("assembly");

    let folder = LibraryRef::MULTI_CHOICE.folder_name();
    let source_bytes =
        fs::read(library_root.path().join(&folder).join("scripts").join("main.js"))
            .expect("source script");
    let archived_bytes = read_entry(&output, &format!("{}/scripts/main.js", folder));
    assert_eq!(source_bytes, archived_bytes);
}

#[test]
fn missing_library_fails_and_leaves_no_archive() {
    let (items, libraries) = sample_items();
    let library_root = tempfile::tempdir().expect("library root");
    // deliberately empty: no library folders at all
    let work_dir = tempfile::tempdir().expect("work dir");

    let assembler = PackageAssembler::new(
        library_root.path().to_path_buf(),
        work_dir.path().to_path_buf(),
    );
    let output = work_dir.path().join("out.h5p");

    let err = assembler
        .assemble("Title", "en", &items, &libraries, &output)
        .expect_err("assembly must fail");

    assert!(matches!(err, PackageError::MissingLibrary(_)));
    assert!(!output.exists());
}

#[test]
fn content_entries_reference_items_in_input_order() {
    let (items, libraries) = sample_items();
    let library_root = tempfile::tempdir().expect("library root");
    populate_library_root(library_root.path(), &libraries);
    let work_dir = tempfile::tempdir().expect("work dir");

    let assembler = PackageAssembler::new(
        library_root.path().to_path_buf(),
        work_dir.path().to_path_buf(),
    );
    let output = work_dir.path().join("out.h5p");
    assembler
        .assemble("Title", "en", &items, &libraries, &output)
        .expect("assembly");

    let first: serde_json::Value =
        serde_json::from_slice(&read_entry(&output, "content/content-1.json"))
            .expect("content json");
    let second: serde_json::Value =
        serde_json::from_slice(&read_entry(&output, "content/content-2.json"))
            .expect("content json");

    assert_eq!(first["question"], "Sky color?");
    assert_eq!(second["question"], "Grass color?");
}
