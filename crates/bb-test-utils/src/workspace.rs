//! [`TestWorkspace`]: a scratch working directory for mirror-folder tests.

use std::fs;
use std::path::Path;

use bb_fs::NormalizedPath;
use tempfile::TempDir;

/// A temporary working directory with helpers for staging and checking
/// mirror files.
///
/// # Example
///
/// ```rust,no_run
/// use bb_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write("mirror/blackboard.yaml", "id: abc\nrole: planner\n");
/// ws.assert_file_exists("mirror/blackboard.yaml");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root as a [`NormalizedPath`], as the engines take it.
    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    /// Read the file at `path` (relative to the root).
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Names of the `*.stickie.yaml` files in `folder`, sorted.
    pub fn stickie_files(&self, folder: &str) -> Vec<String> {
        let dir = self.root().join(folder);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".stickie.yaml"))
            .collect();
        names.sort();
        names
    }

    /// Stage a minimal `blackboard.yaml` in `folder`.
    pub fn write_blackboard(&self, folder: &str, id: &str, role: &str) {
        self.write(
            &format!("{folder}/blackboard.yaml"),
            &format!("id: {id}\nrole: {role}\n"),
        );
    }

    /// Stage a minimal named stickie file in `folder`. An empty `id` makes an
    /// anonymous draft.
    pub fn write_stickie(&self, folder: &str, file: &str, id: &str, name: &str) {
        let mut content = String::new();
        if !id.is_empty() {
            content.push_str(&format!("id: {id}\n"));
        }
        content.push_str(&format!(
            "complex_name:\n  name: {name}\n  variant: ''\narchived: false\n"
        ));
        self.write(&format!("{folder}/{file}"), &content);
    }

    /// Assert that `path` (relative to the root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {path} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }
}
