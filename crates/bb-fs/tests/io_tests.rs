use bb_fs::{NormalizedPath, io};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.yaml"));

    io::write_atomic(&path, b"id: x\n").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "id: x\n");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.yaml");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("a.stickie.yaml"));

    io::write_atomic(&path, b"one").unwrap();
    io::write_atomic(&path, b"two").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.stickie.yaml".to_string()]);
}

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/deeper/blackboard.yaml"));

    io::write_atomic(&path, b"role: dev\n").unwrap();

    assert!(path.is_file());
}

#[test]
fn test_read_text_optional_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.yaml"));

    assert!(io::read_text_optional(&path).unwrap().is_none());
    assert!(io::read_text(&path).unwrap_err().is_not_found());
}

#[test]
fn test_remove_file_tolerates_missing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("gone.stickie.yaml"));

    io::remove_file(&path).unwrap();
    fs::write(path.to_native(), "x").unwrap();
    io::remove_file(&path).unwrap();
    assert!(!path.to_native().exists());
}

#[test]
fn test_list_file_names_filters_and_sorts() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("b.stickie.yaml"), "").unwrap();
    fs::write(temp.path().join("a.stickie.yaml"), "").unwrap();
    fs::write(temp.path().join("blackboard.yaml"), "").unwrap();
    fs::create_dir(temp.path().join("dir.stickie.yaml")).unwrap();

    let names = io::list_file_names(&NormalizedPath::new(temp.path()), ".stickie.yaml").unwrap();

    assert_eq!(names, vec!["a.stickie.yaml", "b.stickie.yaml"]);
}

#[test]
fn test_list_file_names_missing_dir_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = io::list_file_names(&NormalizedPath::new(temp.path().join("nope")), ".yaml")
        .unwrap_err();
    assert!(err.is_not_found());
}
