//! Tests for TreeBuilder loading path lists from files and directories

use std::path::{Path, PathBuf};

use ecstree::config::Settings;
use ecstree::util::testing;
use ecstree::{TreeBuilder, TreeError};
use tempfile::TempDir;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn create_paths_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(&path, content).expect("write paths file");
    path
}

#[test]
fn given_paths_file_when_loading_then_builds_tree() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = create_paths_file(
        &temp,
        "client.paths",
        "# client fields\nclient.ip\nclient.as.number\nclient.as.organization.name\n",
    );

    // Act
    let mut builder = TreeBuilder::new();
    let resolved = builder.add_file(&file).unwrap();
    let root = builder.build();

    // Assert
    assert_eq!(resolved, 3);
    assert_eq!(root.len(), 6);
    assert_eq!(root.top_level_len(), 1);
    assert_eq!(root.depth(), 4);
}

#[test]
fn given_directory_when_loading_then_reads_known_extensions_only() {
    // Arrange
    let temp = TempDir::new().unwrap();
    create_paths_file(&temp, "client.paths", "client.ip\n");
    create_paths_file(&temp, "nested/host.txt", "host.name\n");
    create_paths_file(&temp, "notes.md", "ignored.path\n");

    // Act
    let mut builder = TreeBuilder::new();
    let resolved = builder.add_input(temp.path()).unwrap();
    let root = builder.build();

    // Assert
    assert_eq!(resolved, 2);
    let top: Vec<&str> = root.list_children().map(|n| n.name()).collect();
    assert_eq!(top, vec!["client", "host"]);
    assert!(!root.contains("ignored"));
}

#[test]
fn given_custom_extensions_when_loading_directory_then_uses_settings() {
    // Arrange
    let temp = TempDir::new().unwrap();
    create_paths_file(&temp, "fields.list", "event.kind\n");
    create_paths_file(&temp, "fields.paths", "event.type\n");
    let settings = Settings {
        extensions: vec!["list".into()],
        ..Settings::default()
    };

    // Act
    let mut builder = TreeBuilder::with_settings(&settings);
    builder.add_directory(temp.path()).unwrap();
    let root = builder.build();

    // Assert
    assert!(root.contains("event.kind"));
    assert!(!root.contains("event.type"));
}

#[test]
fn given_same_paths_in_two_files_when_loading_then_nodes_are_shared() {
    let temp = TempDir::new().unwrap();
    let a = create_paths_file(&temp, "a.paths", "a.b.c\n");
    let b = create_paths_file(&temp, "b.paths", "a.b.d\na.b.c\n");

    let mut builder = TreeBuilder::new();
    builder.add_file(&a).unwrap();
    builder.add_file(&b).unwrap();
    let root = builder.build();

    assert_eq!(root.len(), 4);
    let names: Vec<&str> = root
        .get("a.b")
        .unwrap()
        .list_children()
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["c", "d"]);
}

#[test]
fn given_empty_segment_when_strict_then_errors_with_location() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = create_paths_file(&temp, "bad.paths", "client.ip\nclient..port\n");
    let settings = Settings {
        strict_segments: true,
        ..Settings::default()
    };

    // Act
    let mut builder = TreeBuilder::with_settings(&settings);
    let result = builder.add_file(&file);

    // Assert
    match result {
        Err(TreeError::InvalidPath { line, path, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(path, "client..port");
        }
        other => panic!("expected InvalidPath, got {other:?}"),
    }
    assert!(!builder.root().contains("client."));
}

#[test]
fn given_empty_segment_when_permissive_then_keeps_literal_segment() {
    let temp = TempDir::new().unwrap();
    let file = create_paths_file(&temp, "loose.paths", "client..port\n");

    let mut builder = TreeBuilder::new();
    builder.add_file(&file).unwrap();
    let root = builder.build();

    assert!(root.contains("client."));
    assert_eq!(root.get("client..port").map(|n| n.name()), Some("port"));
}

#[test]
fn given_nonexistent_input_when_loading_then_errors() {
    let mut builder = TreeBuilder::new();
    let result = builder.add_input(Path::new("/nonexistent/path/fields.paths"));

    assert!(matches!(result, Err(TreeError::FileNotFound(_))));
}

#[test]
fn given_file_when_loading_as_directory_then_errors() {
    let temp = TempDir::new().unwrap();
    let file = create_paths_file(&temp, "client.paths", "client.ip\n");

    let mut builder = TreeBuilder::new();
    let result = builder.add_directory(&file);

    assert!(matches!(result, Err(TreeError::PathResolution { .. })));
}
