use std::path::{Path, PathBuf};

use cfr_webclient::ProblemId;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("No source file for problem {problem_id} in '{}'", .dir.display())]
    NotFound { problem_id: ProblemId, dir: PathBuf },

    #[error("Multiple source files for problem {problem_id}: {}", display_paths(.candidates))]
    Ambiguous {
        problem_id: ProblemId,
        candidates: Vec<PathBuf>,
    },

    #[error("No [lang.*] entry in the config for {} (found {})", display_exts(.found), display_paths(.files))]
    UnconfiguredLang {
        found: Vec<String>,
        files: Vec<PathBuf>,
    },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_exts(exts: &[String]) -> String {
    exts.iter()
        .map(|e| format!("'.{}'", e))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A solution file and the language key (its extension) it was matched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub lang: String,
}

/// Finds the unique `<PROBLEM>.<ext>` in `dir`, matching the stem case-insensitively.
/// Files whose extension `is_known_lang` rejects are only considered when nothing else matches,
/// and then only to produce a better error.
pub fn find_source(
    dir: &Path,
    problem_id: &ProblemId,
    is_known_lang: impl Fn(&str) -> bool,
) -> Result<SourceFile, SourceError> {
    let not_found = || SourceError::NotFound {
        problem_id: problem_id.clone(),
        dir: dir.to_owned(),
    };
    if !dir.is_dir() {
        return Err(not_found());
    }

    let matched: Vec<(PathBuf, String)> = fsutil::list_files(dir)?
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            if !problem_id.matches_stem(stem) {
                return None;
            }
            let ext = path.extension()?.to_str()?.to_owned();
            Some((path, ext))
        })
        .collect();

    let (known, unknown): (Vec<_>, Vec<_>) =
        matched.into_iter().partition(|(_, ext)| is_known_lang(ext));

    match known.len() {
        1 => {
            let (path, lang) = known.into_iter().next().ok_or_else(not_found)?;
            log::info!("Found source file {:?} (lang={})", path, lang);
            Ok(SourceFile { path, lang })
        }
        0 if unknown.is_empty() => Err(not_found()),
        0 => {
            let (files, found) = unknown.into_iter().unzip();
            Err(SourceError::UnconfiguredLang { found, files })
        }
        _ => Err(SourceError::Ambiguous {
            problem_id: problem_id.clone(),
            candidates: known.into_iter().map(|(p, _)| p).collect(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pid(s: &str) -> ProblemId {
        ProblemId::parse(s).unwrap()
    }

    fn known(ext: &str) -> bool {
        matches!(ext, "cpp" | "py")
    }

    fn touch(dir: &Path, name: &str) {
        fsutil::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn finds_unique_source_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.cpp");
        touch(tmp.path(), "A.txt");
        touch(tmp.path(), "B.py");

        let src = find_source(tmp.path(), &pid("A"), known).unwrap();
        assert_eq!(src.path, tmp.path().join("a.cpp"));
        assert_eq!(src.lang, "cpp");
    }

    #[test]
    fn multiple_sources_are_ambiguous() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "C.cpp");
        touch(tmp.path(), "C.py");
        assert!(matches!(
            find_source(tmp.path(), &pid("c"), known),
            Err(SourceError::Ambiguous { candidates, .. }) if candidates.len() == 2
        ));
    }

    #[test]
    fn unconfigured_language_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "D.rs");
        assert!(matches!(
            find_source(tmp.path(), &pid("D"), known),
            Err(SourceError::UnconfiguredLang { found, .. }) if found == ["rs"]
        ));
    }

    #[test]
    fn nothing_found() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "E1.cpp");
        assert!(matches!(
            find_source(tmp.path(), &pid("E"), known),
            Err(SourceError::NotFound { .. })
        ));
        assert!(matches!(
            find_source(&tmp.path().join("missing"), &pid("E"), known),
            Err(SourceError::NotFound { .. })
        ));
    }
}
