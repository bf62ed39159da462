//! Filesystem helpers for database paths, built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// What sits at a path that should hold a database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Nothing exists at the path.
    Missing,
    /// A regular file exists at the path.
    File,
    /// Something other than a regular file exists at the path.
    NotFile,
}

/// Inspect `path` through its parent directory.
///
/// A missing parent directory reports [`FileState::Missing`].
pub fn inspect_file(path: &Utf8Path) -> io::Result<FileState> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} has no file name")))?;
    let parent = parent_or_current(path);
    let dir = match fs_utf8::Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(FileState::Missing),
        Err(err) => return Err(err),
    };
    match dir.metadata(name) {
        Ok(meta) if meta.is_file() => Ok(FileState::File),
        Ok(_) => Ok(FileState::NotFile),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(FileState::Missing),
        Err(err) => Err(err),
    }
}

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (root, relative) = split_root(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?.create_dir_all(&relative)
}

fn parent_or_current(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Split `path` into an ambient root directory and the relative remainder.
///
/// Relative paths resolve from the current directory. Absolute paths keep
/// their prefix and root (`/` or `C:\`) as the base.
fn split_root(path: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut root = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => root.push(component),
            Utf8Component::CurDir => {}
            other => relative.push(other),
        }
    }
    if root.as_str().is_empty() {
        root.push(".");
    }
    (root, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        (dir, root)
    }

    #[rstest]
    fn inspect_reports_each_state(workspace: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workspace;
        let file = root.join("places.db");
        fs::write(&file, b"db").expect("write file");
        let folder = root.join("folder");
        fs::create_dir(&folder).expect("create folder");

        assert_eq!(inspect_file(&file).expect("inspect file"), FileState::File);
        assert_eq!(
            inspect_file(&folder).expect("inspect folder"),
            FileState::NotFile
        );
        assert_eq!(
            inspect_file(&root.join("absent.db")).expect("inspect absent"),
            FileState::Missing
        );
        assert_eq!(
            inspect_file(&root.join("no/such/dir/places.db")).expect("inspect nested"),
            FileState::Missing
        );
    }

    #[rstest]
    fn ensure_parent_dir_creates_nested_directories(workspace: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workspace;
        let target = root.join("a/b/c/places.db");

        ensure_parent_dir(&target).expect("create parents");

        assert!(root.join("a/b/c").is_dir());
        assert!(!target.exists());
    }

    #[rstest]
    #[case("places.db")]
    #[case("/")]
    fn ensure_parent_dir_ignores_bare_names_and_root(#[case] path: &str) {
        ensure_parent_dir(Utf8Path::new(path)).expect("nothing to create");
    }

    #[rstest]
    fn split_root_separates_absolute_prefix() {
        let (root, relative) = split_root(Utf8Path::new("/var/lib/placefinder"));
        assert_eq!(root, Utf8PathBuf::from("/"));
        assert_eq!(relative, Utf8PathBuf::from("var/lib/placefinder"));

        let (root, relative) = split_root(Utf8Path::new("data/db"));
        assert_eq!(root, Utf8PathBuf::from("."));
        assert_eq!(relative, Utf8PathBuf::from("data/db"));
    }
}
