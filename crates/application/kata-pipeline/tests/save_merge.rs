use camino::Utf8PathBuf;
use kata_core::{Exercise, FileSet};
use kata_pipeline::{SaveSummary, SyncEngine, SyncError};
use std::fs;
use tempfile::tempdir;

fn exercise(language: &str, slug: &str, files: &[(&str, &str)]) -> Exercise {
    let mut set = FileSet::new();
    for (name, content) in files {
        set.insert(name.to_string(), content.to_string());
    }
    Exercise {
        track: language.to_string(),
        language: language.to_string(),
        slug: slug.to_string(),
        files: set,
    }
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn first_save_writes_everything_second_is_noop() {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let batch = vec![
        exercise("ruby", "bob", &[("bob_test.rb", "test"), ("README.md", "# Bob")]),
        exercise("ruby", "leap", &[("leap_test.rb", "leap test")]),
    ];

    let first = SyncEngine::save(&batch, &root).unwrap();
    assert_eq!(
        first,
        vec![
            SaveSummary {
                problem: "bob".into(),
                new: names(&["bob_test.rb", "README.md"]),
                unchanged: vec![],
            },
            SaveSummary {
                problem: "leap".into(),
                new: names(&["leap_test.rb"]),
                unchanged: vec![],
            },
        ]
    );
    let bob_readme = root.join("ruby").join("bob").join("README.md");
    assert_eq!(fs::read_to_string(&bob_readme).unwrap(), "# Bob");

    let second = SyncEngine::save(&batch, &root).unwrap();
    assert_eq!(second.len(), 2);
    assert!(second[0].new.is_empty());
    assert_eq!(second[0].unchanged, names(&["bob_test.rb", "README.md"]));
    assert!(second[1].new.is_empty());
    assert_eq!(second[1].unchanged, names(&["leap_test.rb"]));
    assert_eq!(fs::read_to_string(&bob_readme).unwrap(), "# Bob");
}

#[test]
fn existing_files_are_never_overwritten() {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let bob = root.join("ruby").join("bob");
    fs::create_dir_all(&bob).unwrap();
    fs::write(bob.join("bob.rb"), "my work in progress").unwrap();

    let batch = vec![exercise(
        "ruby",
        "bob",
        &[("bob.rb", "upstream stub"), ("bob_test.rb", "tests")],
    )];
    let summary = SyncEngine::save(&batch, &root).unwrap();

    assert_eq!(summary[0].new, names(&["bob_test.rb"]));
    assert_eq!(summary[0].unchanged, names(&["bob.rb"]));
    assert_eq!(fs::read_to_string(bob.join("bob.rb")).unwrap(), "my work in progress");
}

#[test]
fn summary_follows_server_file_order() {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let existing = root.join("go").join("clock");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("b.go"), "").unwrap();

    let batch = vec![exercise(
        "go",
        "clock",
        &[("z.go", "z"), ("b.go", "b"), ("a.go", "a"), ("m.go", "m")],
    )];
    let summary = SyncEngine::save(&batch, &root).unwrap();
    assert_eq!(summary[0].new, names(&["z.go", "a.go", "m.go"]));
    assert_eq!(summary[0].unchanged, names(&["b.go"]));
}

#[test]
fn nested_file_names_create_parent_dirs() {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let batch = vec![exercise(
        "rust",
        "bob",
        &[("Cargo.toml", "[package]"), ("src/lib.rs", "pub fn reply() {}")],
    )];

    let summary = SyncEngine::save(&batch, &root).unwrap();
    assert_eq!(summary[0].new, names(&["Cargo.toml", "src/lib.rs"]));
    assert_eq!(
        fs::read_to_string(root.join("rust/bob/src/lib.rs")).unwrap(),
        "pub fn reply() {}"
    );
}

#[test]
fn empty_exercise_still_creates_its_directory() {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let summary = SyncEngine::save(&[exercise("elm", "hello-world", &[])], &root).unwrap();
    assert_eq!(summary, vec![SaveSummary::new("hello-world")]);
    assert!(root.join("elm").join("hello-world").is_dir());
}

#[test]
fn traversal_is_rejected_before_anything_is_written() {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().join("ws")).unwrap();
    let batch = vec![
        exercise("ruby", "bob", &[("bob.rb", "ok")]),
        exercise("ruby", "leap", &[("../../../escape.rb", "bad")]),
    ];

    match SyncEngine::save(&batch, &root) {
        Err(SyncError::UnsafePath(msg)) => assert!(msg.contains(".."), "got {msg}"),
        other => panic!("expected UnsafePath, got {other:?}"),
    }
    assert!(!root.exists());

    let bad_slug = vec![exercise("ruby", "../bob", &[("bob.rb", "ok")])];
    assert!(matches!(
        SyncEngine::save(&bad_slug, &root),
        Err(SyncError::UnsafePath(_))
    ));
    let bad_language = vec![exercise("ruby/../..", "bob", &[("bob.rb", "ok")])];
    assert!(matches!(
        SyncEngine::save(&bad_language, &root),
        Err(SyncError::UnsafePath(_))
    ));
}
