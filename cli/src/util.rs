use std::{
    path::{Path, PathBuf},
    process::exit,
};

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

/// `./<path>` when `path` is under the current dir, otherwise `path` unchanged.
pub fn relative_to_current_dir(path: &Path) -> PathBuf {
    path.strip_prefix(current_dir())
        .map(|rel| Path::new(".").join(rel))
        .unwrap_or_else(|_| path.to_owned())
}
