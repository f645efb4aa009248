use std::sync::Arc;
use std::path::Path;
use std::{fs, fmt};

use rustc_hash::FxHashMap;

use crate::error::Result;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) usize);

/// A snapshot of a directory, taken once, with entries in sorted walk order:
/// every directory precedes its contents and siblings are ordered by name.
#[derive(Debug)]
pub struct FsTree {
    entries: Vec<Entry>,
    map: FxHashMap<Arc<Path>, EntryId>,
}

#[derive(Debug)]
pub struct Entry {
    pub id: EntryId,
    pub path: Arc<Path>,
    pub metadata: fs::Metadata,
    pub file_name: String,
    pub file_type: fs::FileType,
    pub parent: Option<EntryId>,
    pub children: Vec<EntryId>,
    pub depth: usize,
}

#[derive(Default, Debug)]
struct FsMetadata(Option<fs::Metadata>);

impl FsTree {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            entries: vec![],
        }
    }

    /// Walks all of `root`.
    pub fn build<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::build_to_depth(root, None)
    }

    /// Walks `root` and its immediate children only.
    pub fn shallow<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::build_to_depth(root, Some(1))
    }

    fn build_to_depth<P: AsRef<Path>>(root: P, max_depth: Option<usize>) -> Result<Self> {
        use jwalk::WalkDirGeneric;

        let root = root.as_ref();
        let mut walker = WalkDirGeneric::<FsMetadata>::new(root)
            .follow_links(true)
            .sort(true)
            .parallelism(jwalk::Parallelism::Serial)
            .process_read_dir(|_, _, _, entries| {
                entries.iter_mut()
                    .filter_map(|e| e.as_mut().ok())
                    .for_each(|e| e.client_state = FsMetadata(e.metadata().ok()))
            });

        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut tree = FsTree::new();
        for entry in walker {
            let mut entry = entry.map_err(|e| error! {
                "failed to read directory entry",
                "search root" => root.display(),
                e,
            })?;

            // The root never passes through `process_read_dir`.
            if entry.depth == 0 {
                let metadata = fs::metadata(root).map_err(|e| error! {
                    "failed to read directory metadata",
                    "search root" => root.display(),
                    e,
                })?;

                tree.insert(entry, metadata);
            } else if let Some(metadata) = entry.client_state.0.take() {
                tree.insert(entry, metadata);
            }
        }

        match tree.entries.first() {
            Some(root) if root.file_type.is_dir() => Ok(tree),
            Some(_) => err! {
                "expected a directory, found a file",
                "path" => root.display(),
            },
            None => err! {
                "directory does not exist or cannot be read",
                "path" => root.display(),
            },
        }
    }

    pub fn root(&self) -> &Entry {
        &self[self.root_id()]
    }

    pub fn root_id(&self) -> EntryId {
        EntryId(0)
    }

    /// All entries in walk order, the root first.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// The regular files directly inside `id`, by name.
    pub fn child_files(&self, id: EntryId) -> impl Iterator<Item = &Entry> {
        self[id].children.iter()
            .map(move |&child| &self[child])
            .filter(|e| e.metadata.is_file())
    }

    fn insert(&mut self, entry: jwalk::DirEntry<FsMetadata>, metadata: fs::Metadata) -> EntryId {
        let entry = Entry {
            id: EntryId(self.entries.len()),
            path: Arc::from(entry.path().into_boxed_path()),
            metadata,
            file_type: entry.file_type,
            file_name: entry.file_name.to_string_lossy().into_owned(),
            parent: self.map.get(&entry.parent_path).cloned(),
            children: vec![],
            depth: entry.depth,
        };

        self.map.insert(entry.path.clone(), entry.id);
        if let Some(parent) = entry.parent {
            self.entries[parent.0].children.push(entry.id);
        }

        let id = entry.id;
        self.entries.push(entry);
        id
    }
}

impl Entry {
    /// Path relative to `other`. `self` must be super-path of `other`.
    pub fn path_relative_to(&self, other: &Entry) -> Option<&Path> {
        self.path.strip_prefix(&other.path).ok()
    }
}

impl std::ops::Index<EntryId> for FsTree {
    type Output = Entry;

    fn index(&self, index: EntryId) -> &Self::Output {
        &self.entries[index.0]
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl jwalk::ClientState for FsMetadata {
    type ReadDirState = ();
    type DirEntryState = Self;
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::FsTree;

    #[test]
    fn walk_is_sorted_and_shallow_walk_stops() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("c.txt"), "c").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b/nested/deep.txt"), "d").unwrap();

        let tree = FsTree::build(dir.path()).unwrap();
        let root = tree.root();
        let names: Vec<_> = tree.iter().skip(1)
            .map(|e| e.path_relative_to(root).unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names.first().map(|s| s.as_str()), Some("a.txt"));
        assert!(names.iter().any(|n| n.ends_with("deep.txt")));

        let files: Vec<_> = tree.child_files(tree.root_id()).map(|e| e.file_name.as_str()).collect();
        assert_eq!(files, ["a.txt", "c.txt"]);

        let shallow = FsTree::shallow(dir.path()).unwrap();
        let shallow: Vec<_> = shallow.iter().map(|e| e.file_name.as_str()).collect();
        assert!(shallow.contains(&"b"));
        assert!(!shallow.contains(&"nested") && !shallow.contains(&"deep.txt"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsTree::build(dir.path().join("nope")).is_err());

        fs::write(dir.path().join("file"), "x").unwrap();
        assert!(FsTree::build(dir.path().join("file")).is_err());
    }
}
