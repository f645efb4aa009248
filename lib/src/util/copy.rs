use std::fs;
use std::path::Path;

use crate::error::{Result, Chainable};
use crate::fstree::FsTree;

/// Copies `from` to `to`, creating `to`'s parent directories and overwriting
/// an existing file.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).chain_with(|| error! {
            "failed to create directory",
            "path" => parent.display(),
        })?;
    }

    fs::copy(from, to).chain_with(|| error! {
        "failed to copy file",
        "source path" => from.display(),
        "destination path" => to.display(),
    })?;

    tracing::debug!("copied {} to {}", from.display(), to.display());
    Ok(())
}

/// Recursively copies the directory `from` into `to`, merging with whatever
/// `to` already holds. Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let tree = FsTree::build(from).chain_with(|| error! {
        "failed to read directory to copy",
        "path" => from.display(),
    })?;

    let mut copied = 0;
    let root = tree.root();
    for entry in tree.iter() {
        let relative = entry.path_relative_to(root).unwrap_or(Path::new(""));
        let target = to.join(relative);
        if entry.file_type.is_dir() {
            fs::create_dir_all(&target).chain_with(|| error! {
                "failed to create directory",
                "path" => target.display(),
            })?;
        } else if entry.metadata.is_file() {
            copy_file(&entry.path, &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn copy_tree_merges_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let (from, to) = (dir.path().join("images"), dir.path().join("build/images"));
        fs::create_dir_all(from.join("music/2024")).unwrap();
        fs::write(from.join("logo.png"), b"new").unwrap();
        fs::write(from.join("music/2024/a_b.jpg"), b"jpg").unwrap();

        fs::create_dir_all(&to).unwrap();
        fs::write(to.join("logo.png"), b"old").unwrap();
        fs::write(to.join("keep.txt"), b"kept").unwrap();

        assert_eq!(copy_tree(&from, &to).unwrap(), 2);
        assert_eq!(fs::read(to.join("logo.png")).unwrap(), b"new");
        assert_eq!(fs::read(to.join("music/2024/a_b.jpg")).unwrap(), b"jpg");
        assert_eq!(fs::read(to.join("keep.txt")).unwrap(), b"kept");
    }

    #[test]
    fn copy_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let error = copy_file(&dir.path().join("nope.css"), &dir.path().join("out/nope.css"));
        assert_eq!(error.unwrap_err().message(), "failed to copy file");
    }
}
