//! Filesystem side effects used by the staging area and the packaging stage.

use std::fs;
use std::io;
use std::path::Path;

/// Recursively copies a directory tree.
///
/// Destination directories are created as needed. Symlinks are followed.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Removes a directory tree, treating an already-absent tree as success.
pub fn remove_dir_idempotent(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_dir_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("nested/b.txt"), "b").unwrap();

        let dst = dir.path().join("dst");
        copy_dir_recursive(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("nested/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_remove_dir_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("gone");
        fs::create_dir_all(&target).unwrap();

        remove_dir_idempotent(&target).unwrap();
        assert!(!target.exists());

        // Second removal is not an error.
        remove_dir_idempotent(&target).unwrap();
    }
}
