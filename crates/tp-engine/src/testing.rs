//! Shared fixtures for engine tests.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Writes a small file, creating nothing else.
pub(crate) fn write_file(path: &Utf8Path) {
    std::fs::write(path, path.as_str()).unwrap();
}

/// Builds the reference tree and returns it with its canonical root:
///
/// ```text
/// root/
/// ├── .env
/// ├── .hidden/
/// │   └── secret.txt
/// ├── a.txt
/// └── sub/
///     ├── b.txt
///     └── c.txt
/// ```
pub(crate) fn scenario_tree() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = Utf8Path::from_path(dir.path())
        .unwrap()
        .canonicalize_utf8()
        .unwrap();

    std::fs::create_dir(root.join("sub")).unwrap();
    std::fs::create_dir(root.join(".hidden")).unwrap();
    write_file(&root.join("a.txt"));
    write_file(&root.join(".env"));
    write_file(&root.join(".hidden/secret.txt"));
    write_file(&root.join("sub/b.txt"));
    write_file(&root.join("sub/c.txt"));

    (dir, root)
}
