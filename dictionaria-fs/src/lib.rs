//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Submissions, corpora and concept lists are read through these helpers so
//! that every path is UTF-8 and every access goes through an explicitly
//! opened directory.
#![forbid(unsafe_code)]

use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// A directory entry reported by [`list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Full path of the entry.
    pub path: Utf8PathBuf,
    /// File name of the entry.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file as UTF-8, dropping a leading byte order mark.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    if let Some(stripped) = contents.strip_prefix('\u{feff}') {
        return Ok(stripped.to_owned());
    }
    Ok(contents)
}

/// Resolve the parent directory of `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Return whether a path exists and is a directory.
pub fn dir_is_dir(path: &Utf8Path) -> io::Result<bool> {
    match fs_utf8::Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) if err.kind() == io::ErrorKind::NotADirectory => Ok(false),
        Err(err) => Err(err),
    }
}

/// List the entries of a directory sorted by file name.
pub fn list_dir(path: &Utf8Path) -> io::Result<Vec<DirEntryInfo>> {
    let dir = fs_utf8::Dir::open_ambient_dir(path, ambient_authority())?;
    let mut entries = Vec::new();
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name()?;
        let is_dir = entry.file_type()?.is_dir();
        entries.push(DirEntryInfo {
            path: path.join(&name),
            name,
            is_dir,
        });
    }
    entries.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(entries)
}

/// Regular files directly inside `path` whose names end with `suffix`,
/// sorted by file name.
pub fn files_with_suffix(path: &Utf8Path, suffix: &str) -> io::Result<Vec<Utf8PathBuf>> {
    Ok(list_dir(path)?
        .into_iter()
        .filter(|entry| !entry.is_dir && entry.name.ends_with(suffix))
        .map(|entry| entry.path)
        .collect())
}

/// Ensure the parent directory for `path` exists.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority())
        }
        _ => Ok(()),
    }
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
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        (dir, path)
    }

    #[rstest]
    fn lists_entries_in_name_order(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        fs::write(root.join("b.sfm"), "x").expect("write b");
        fs::write(root.join("a.eaf.sfm"), "x").expect("write a");
        fs::create_dir(root.join("corpus")).expect("create dir");

        let names: Vec<_> = list_dir(&root)
            .expect("list")
            .into_iter()
            .map(|entry| (entry.name, entry.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a.eaf.sfm".to_owned(), false),
                ("b.sfm".to_owned(), false),
                ("corpus".to_owned(), true),
            ]
        );
        let sfm = files_with_suffix(&root, ".eaf.sfm").expect("filter");
        assert_eq!(sfm, vec![root.join("a.eaf.sfm")]);
    }

    #[rstest]
    fn reads_text_without_bom(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let path = root.join("md.json");
        fs::write(&path, "\u{feff}{}").expect("write");
        assert_eq!(read_to_string(&path).expect("read"), "{}");
    }

    #[rstest]
    fn reports_file_and_dir_kinds(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let file = root.join("entries.csv");
        fs::write(&file, "ID\n").expect("write");
        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&root).expect("inspect dir"));
        assert!(!file_is_file(&root.join("senses.csv")).expect("inspect missing"));
        assert!(dir_is_dir(&root).expect("inspect dir"));
        assert!(!dir_is_dir(&root.join("missing")).expect("inspect missing"));
    }

    #[rstest]
    fn creates_missing_parents(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let target = root.join("out/nested/dictionaria.sqlite");
        ensure_parent_dir(&target).expect("create parents");
        assert!(dir_is_dir(&root.join("out/nested")).expect("inspect"));
    }
}
