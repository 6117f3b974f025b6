// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Glob matching over the filesystem.
//!
//! The grammar is deliberately small: `*` matches any run of characters inside
//! one path segment and a `**` segment matches zero or more directories. A
//! pattern is split into a literal root directory (the leading segments
//! without `*`) and an include pattern matched against paths relative to that
//! root, so only the root subtree is walked.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Error;

/// Returns `true` when `pattern` contains a wildcard.
///
/// `?` is not treated as a wildcard.
///
/// # Example
///
/// ```
/// use release_actions::glob::is_glob_pattern;
///
/// assert!(is_glob_pattern("nuget/*.nupkg"));
/// assert!(!is_glob_pattern("nuget/Package.1.0.0.nupkg"));
/// ```
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*')
}

/// Pattern split into the directory to walk and the relative include pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GlobRoot {
    root:    PathBuf,
    include: String
}

fn split_root(pattern: &str) -> GlobRoot {
    let normalized = pattern.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').collect();
    let literal_count = segments
        .iter()
        .take_while(|segment| !is_glob_pattern(segment))
        .count();

    let root_segments = &segments[..literal_count];
    let mut root = root_segments.join("/");
    if root.is_empty() && normalized.starts_with('/') {
        root.push('/');
    }

    GlobRoot {
        root:    PathBuf::from(root),
        include: segments[literal_count..].join("/")
    }
}

fn compile(include: &str) -> Result<GlobMatcher, Error> {
    GlobBuilder::new(include)
        .literal_separator(true)
        .backslash_escape(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::validation(format!("invalid glob pattern '{include}': {e}")))
}

/// Lists files matching `pattern`, sorted.
///
/// Directories never match. A root directory that does not exist yields an
/// empty list. For a pattern without wildcards the result is the path itself
/// when it names an existing file.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the include pattern cannot be compiled.
pub fn enumerate_files(pattern: &str) -> Result<Vec<PathBuf>, Error> {
    if !is_glob_pattern(pattern) {
        let path = PathBuf::from(pattern);
        return Ok(if path.is_file() { vec![path] } else { Vec::new() });
    }

    let GlobRoot {
        root,
        include
    } = split_root(pattern);
    let matcher = compile(&include)?;

    let walk_root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root.as_path()
    };
    if !walk_root.is_dir() {
        debug!("glob root {} does not exist", walk_root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(walk_root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(walk_root) else {
            continue;
        };
        let relative = to_slash(relative);
        if matcher.is_match(&relative) {
            files.push(root.join(relative));
        }
    }

    files.sort();
    debug!("glob {pattern} matched {} file(s)", files.len());
    Ok(files)
}

/// Returns `true` when at least one file matches `pattern`.
///
/// Invalid patterns count as matching nothing.
pub fn exists(pattern: &str) -> bool {
    enumerate_files(pattern).is_ok_and(|files| !files.is_empty())
}

/// Expands path inputs into concrete files.
///
/// Glob patterns contribute every match (possibly none); literal paths must
/// name an existing file.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for a literal path that is not a file and
/// [`Error::Validation`] for an invalid glob.
pub fn expand_inputs<S>(patterns: &[S]) -> Result<Vec<PathBuf>, Error>
where
    S: AsRef<str>
{
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if is_glob_pattern(pattern) {
            files.extend(enumerate_files(pattern)?);
        } else {
            let path = PathBuf::from(pattern);
            if !path.is_file() {
                return Err(Error::not_found(pattern));
            }
            files.push(path);
        }
    }
    Ok(files)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use proptest::prelude::*;
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn create_files(dir: &Path, items: &[&str], nested: bool) {
        for item in items {
            let parent = if nested { dir.join(item) } else { dir.to_path_buf() };
            fs::create_dir_all(&parent).expect("create dir");
            fs::write(parent.join(item), "").expect("write file");
        }
    }

    fn fixture(items: &[&str], nested: bool) -> (TempDir, PathBuf) {
        let temp = tempdir().expect("failed to create tempdir");
        let dir = temp.path().join("fixture");
        create_files(&dir, items, nested);
        (temp, dir)
    }

    fn pattern(dir: &Path, suffix: &str) -> String {
        format!("{}/{suffix}", dir.display())
    }

    #[test]
    fn split_root_separates_literal_prefix() {
        let split = split_root("nuget/out/**/*.nupkg");
        assert_eq!(split.root, PathBuf::from("nuget/out"));
        assert_eq!(split.include, "**/*.nupkg");
    }

    #[test]
    fn split_root_keeps_absolute_root() {
        let split = split_root("/*.txt");
        assert_eq!(split.root, PathBuf::from("/"));
        assert_eq!(split.include, "*.txt");
    }

    #[test]
    fn split_root_normalizes_backslashes() {
        let split = split_root(r"nuget\*.nupkg");
        assert_eq!(split.root, PathBuf::from("nuget"));
        assert_eq!(split.include, "*.nupkg");
    }

    #[test]
    fn leading_wildcard_has_empty_root() {
        let split = split_root("**/*.nupkg");
        assert_eq!(split.root, PathBuf::new());
        assert_eq!(split.include, "**/*.nupkg");
    }

    #[test]
    fn wildcard_file_patterns_match() {
        let items = ["foo", "bar", "piyo", "test.txt", "hoge.txt"];
        let (_temp, dir) = fixture(&items, false);

        for item in items {
            assert!(exists(&pattern(&dir, item)), "{item}");
        }
        assert!(exists(&pattern(&dir, "*")));
        assert!(exists(&pattern(&dir, "*.txt")));
        assert!(exists(&pattern(&dir, "hoge.*")));
        assert!(exists(&pattern(&dir, "**/hoge.*")));
        assert!(exists(&pattern(&dir, "**/*")));
        assert!(!exists(&pattern(&dir, "*.nupkg")));
    }

    #[test]
    fn single_star_matches_exactly_one_directory() {
        let items = ["foo", "bar", "piyo"];
        let (_temp, dir) = fixture(&items, false);
        let parent = dir.parent().expect("parent");

        for item in items {
            assert!(exists(&pattern(parent, &format!("*/{item}"))), "{item}");
            assert!(exists(&pattern(&dir, &format!("**/{item}"))), "{item}");
            assert!(!exists(&pattern(&dir, &format!("*/{item}"))), "{item}");
        }
    }

    #[test]
    fn double_star_matches_any_depth() {
        let items = ["foo", "bar", "piyo"];
        let (_temp, dir) = fixture(&items, true);
        let parent = dir.parent().expect("parent");

        assert!(exists(&pattern(&dir, "**/*")));
        for item in items {
            assert!(exists(&pattern(parent, &format!("**/{item}"))), "{item}");
            assert!(exists(&pattern(&dir, &format!("**/{item}"))), "{item}");
            assert!(exists(&pattern(&dir, &format!("*/{item}"))), "{item}");
        }
    }

    #[test]
    fn directories_are_never_returned() {
        let (_temp, dir) = fixture(&["foo"], true);
        let files = enumerate_files(&pattern(&dir, "*")).expect("enumerate");
        assert!(files.is_empty(), "only the directory 'foo' sits at depth one");
    }

    #[test]
    fn enumerate_returns_sorted_paths_under_root() {
        let (_temp, dir) = fixture(&["b.nupkg", "a.nupkg", "c.snupkg"], false);
        let files = enumerate_files(&pattern(&dir, "*.nupkg")).expect("enumerate");
        assert_eq!(files, vec![dir.join("a.nupkg"), dir.join("b.nupkg")]);
    }

    #[test]
    fn missing_root_matches_nothing() {
        let (_temp, dir) = fixture(&[], false);
        let files = enumerate_files(&pattern(&dir.join("absent"), "**/*")).expect("enumerate");
        assert!(files.is_empty());
        assert!(!exists(&pattern(&dir.join("absent"), "*")));
    }

    #[test]
    fn literal_pattern_returns_existing_file_only() {
        let (_temp, dir) = fixture(&["foo"], false);
        assert_eq!(enumerate_files(&pattern(&dir, "foo")).expect("file"), vec![dir.join("foo")]);
        assert!(enumerate_files(&pattern(&dir, "bar")).expect("missing").is_empty());
        assert!(enumerate_files(&dir.display().to_string()).expect("dir").is_empty());
    }

    #[test]
    fn expand_inputs_requires_literal_files() {
        let (_temp, dir) = fixture(&["a.nupkg", "b.nupkg"], false);

        let files = expand_inputs(&[pattern(&dir, "*.nupkg"), pattern(&dir, "a.nupkg")])
            .expect("expand");
        assert_eq!(files.len(), 3);

        let error = expand_inputs(&[pattern(&dir, "missing.nupkg")]).expect_err("missing");
        assert!(matches!(error, Error::NotFound { .. }));
    }

    #[test]
    fn expand_inputs_allows_empty_glob() {
        let (_temp, dir) = fixture(&["a.nupkg"], false);
        let files = expand_inputs(&[pattern(&dir, "*.snupkg")]).expect("expand");
        assert!(files.is_empty());
    }

    proptest! {
        #[test]
        fn patterns_without_star_are_literal(input in "[a-z/._-]{0,30}") {
            prop_assert!(!is_glob_pattern(&input));
            let split = split_root(&input);
            prop_assert!(split.include.is_empty());
        }
    }
}
