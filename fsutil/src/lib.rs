use std::{
    fs::{self, ReadDir},
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("{0} (from='{1}', to='{2}'): {3}")]
        FromToIO(Msg, PathBuf, PathBuf, #[source] io::Error),

        #[error("Failed to canonicalize path '{0}': {1}")]
        CanonicalizePath(PathBuf, #[source] io::Error),
    }
}
pub use error::{Error, Result};

pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

pub fn remove_file(filepath: impl AsRef<Path>) -> Result<()> {
    fs::remove_file(&filepath)
        .map_err(|e| Error::SingleIO("Cannot remove file", filepath.as_ref().to_owned(), e))
}

pub fn copy_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    fs::copy(&from, &to).map_err(|e| {
        Error::FromToIO(
            "Cannot copy file",
            from.as_ref().to_owned(),
            to.as_ref().to_owned(),
            e,
        )
    })
}

/// Copies `from` to `to`, creating the parent dirs of `to` first.
pub fn copy_file_with_mkdir(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    if let Some(dir) = to.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::copy_file(from, to)
}

pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Lists regular files (not dirs) directly under `dir`, sorted by path.
/// Entries whose metadata cannot be read are skipped.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in self::read_dir(&dir)?.filter_map(std::result::Result::ok) {
        let Ok(file_type) = entry.file_type() else {
            log::debug!("Skipping unreadable entry {:?}", entry.path());
            continue;
        };
        if file_type.is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

pub fn canonicalize_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    path.canonicalize()
        .map_err(|e| Error::CanonicalizePath(path.to_owned(), e))
}

/// Normalize the path
/// ```
/// use fsutil::normalize_path;
/// use std::path::Path;
///
/// assert_eq!(normalize_path("./contest/./A.xml"), Path::new("contest/A.xml"));
/// assert_eq!(normalize_path("src/../bin/."), Path::new("bin"));
/// assert_eq!(normalize_path("../foo/../hello"), Path::new("../hello"));
/// assert_eq!(normalize_path("/"), Path::new("/"));
/// assert_eq!(normalize_path("/foo/"), Path::new("/foo"));
/// assert_eq!(normalize_path("."), Path::new("."));
/// ```
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    use ::std::path::Component;
    let components = path.as_ref().components();
    let mut stack = Vec::with_capacity(components.size_hint().1.unwrap_or(4));
    for c in components {
        match c {
            Component::CurDir => (),
            Component::ParentDir if matches!(stack.last(), Some(Component::Normal(_))) => {
                stack.pop();
            }
            _ => {
                stack.push(c);
            }
        }
    }
    if stack.is_empty() {
        stack.push(Component::CurDir);
    }
    stack.iter().collect()
}

/// Joins `path` onto `base` unless it is already absolute, then normalizes it.
/// ```
/// use fsutil::resolve_against;
/// use std::path::Path;
///
/// assert_eq!(resolve_against("/repo", "./src"), Path::new("/repo/src"));
/// assert_eq!(resolve_against("/repo", "/tmp/bin"), Path::new("/tmp/bin"));
/// assert_eq!(resolve_against("/repo/sub", "../contest"), Path::new("/repo/contest"));
/// ```
pub fn resolve_against(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        self::normalize_path(path)
    } else {
        self::normalize_path(base.as_ref().join(path))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn list_files_skips_dirs_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("B.py"), "").unwrap();
        write(dir.path().join("A.cpp"), "").unwrap();
        mkdir_all(dir.path().join("nested")).unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("A.cpp"), dir.path().join("B.py")]
        );
    }

    #[test]
    fn write_with_mkdir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");
        write_with_mkdir(&path, "hello").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn read_missing_file_carries_path() {
        let err = read_to_string("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
