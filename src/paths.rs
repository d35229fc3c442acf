//! Lexical path normalization
//!
//! `resolve` never touches the filesystem: it joins relative paths onto a base
//! directory and folds `.` and `..` components. Symlinks are not followed, so
//! the result is stable for paths that do not exist yet.

use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base` (unless it is already absolute) and normalize
///
/// `..` at the root stays at the root.
#[must_use]
pub fn resolve_native(base: &Path, path: &str) -> PathBuf {
    let joined = if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    };
    normalize_native(&joined)
}

/// Fold `.` and `..` components of a native path
#[must_use]
pub fn normalize_native(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component.as_os_str());
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Check whether a caller-supplied path ends in a separator
///
/// Normalization drops the trailing separator, so backends consult the raw
/// path: `file.txt/` names a directory and must not match a regular file.
#[must_use]
pub fn has_trailing_separator(path: &str) -> bool {
    path.len() > 1 && (path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR))
}

/// Resolve a `/`-separated virtual path against a `/`-separated base
///
/// Used by stores that define their own path syntax. The result always starts
/// with `/` and has no trailing slash, except for the root itself.
#[must_use]
pub fn resolve_virtual(base: &str, path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !path.starts_with('/') {
        push_virtual(&mut parts, base);
    }
    push_virtual(&mut parts, path);

    if parts.is_empty() {
        "/".to_string()
    } else {
        let mut resolved = String::new();
        for part in parts {
            resolved.push('/');
            resolved.push_str(part);
        }
        resolved
    }
}

fn push_virtual<'a>(parts: &mut Vec<&'a str>, path: &'a str) {
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }
}

/// Parent of a normalized virtual path (`None` for the root)
#[must_use]
pub fn virtual_parent(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Check whether `path` lies strictly below `ancestor` (both normalized)
#[must_use]
pub fn is_virtual_descendant(path: &str, ancestor: &str) -> bool {
    if ancestor == "/" {
        return path != "/";
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", "a/b", "/a/b")]
    #[case("/home/user", "notes.txt", "/home/user/notes.txt")]
    #[case("/home/user", "../other/./x", "/home/other/x")]
    #[case("/home/user", "/etc//hosts", "/etc/hosts")]
    #[case("/home/user", "/../..", "/")]
    #[case("/home/user", "", "/home/user")]
    #[case("/", "dir/", "/dir")]
    fn test_resolve_virtual(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(resolve_virtual(base, path), expected);
    }

    #[rstest]
    #[case("/a/b", "/a/b")]
    #[case("a/../../b", "/b")]
    #[case("./x/./y/..", "/x")]
    fn test_resolve_virtual_idempotent(#[case] path: &str, #[case] expected: &str) {
        let once = resolve_virtual("/", path);
        assert_eq!(once, expected);
        assert_eq!(resolve_virtual("/", &once), once);
    }

    #[rstest]
    #[case("f.txt/", true)]
    #[case("/a/dir/", true)]
    #[case("f.txt", false)]
    #[case("/", false)]
    #[case("", false)]
    fn test_has_trailing_separator(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(has_trailing_separator(path), expected);
    }

    #[test]
    fn test_virtual_parent() {
        assert_eq!(virtual_parent("/"), None);
        assert_eq!(virtual_parent("/a"), Some("/"));
        assert_eq!(virtual_parent("/a/b/c"), Some("/a/b"));
    }

    #[test]
    fn test_is_virtual_descendant() {
        assert!(is_virtual_descendant("/a/b", "/a"));
        assert!(is_virtual_descendant("/a", "/"));
        assert!(!is_virtual_descendant("/ab", "/a"));
        assert!(!is_virtual_descendant("/a", "/a"));
        assert!(!is_virtual_descendant("/", "/"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_native() {
        let base = Path::new("/srv/data");
        assert_eq!(resolve_native(base, "x.txt"), PathBuf::from("/srv/data/x.txt"));
        assert_eq!(resolve_native(base, "../logs/./a"), PathBuf::from("/srv/logs/a"));
        assert_eq!(resolve_native(base, "/tmp/../etc"), PathBuf::from("/etc"));
        assert_eq!(resolve_native(base, "/.."), PathBuf::from("/"));

        let once = resolve_native(base, "sub/../file");
        assert_eq!(resolve_native(base, &once.to_string_lossy()), once);
    }
}
