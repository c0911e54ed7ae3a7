/// File discovery utilities
///
/// This module turns shell-style glob patterns into matchers and collects the
/// dataset files that match them.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use regex::Regex;
use walkdir::WalkDir;

/// Compile a glob pattern into an anchored regular expression.
///
/// `*` matches any run of characters, `?` exactly one, and `[...]` a character
/// class (`[!...]` negates). Every other character is matched literally.
///
/// # Arguments
///
/// * `pattern` - Glob pattern matched against file names
///
/// # Returns
///
/// The compiled matcher
pub fn compile_glob(pattern: &str) -> Result<Regex> {
    let mut expr = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                if chars.peek() == Some(&'!') {
                    chars.next();
                    class.push('^');
                }
                // A `]` in first position is a member, not the end of the class
                let mut first = true;
                let mut prev = None;
                for c in chars.by_ref() {
                    if c == ']' && !first {
                        closed = true;
                        break;
                    }
                    // `&&`, `~~` and `--` are set operators in regex classes
                    let doubled_dash = c == '-' && prev == Some('-');
                    if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') || doubled_dash {
                        class.push('\\');
                    }
                    class.push(c);
                    prev = Some(c);
                    first = false;
                }
                if !closed {
                    return Err(anyhow!("Unterminated character class in pattern '{}'", pattern));
                }
                expr.push('[');
                expr.push_str(&class);
                expr.push(']');
            }
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');

    Regex::new(&expr).with_context(|| format!("Invalid glob pattern '{}'", pattern))
}

/// Check a file name against a glob pattern.
///
/// Hidden files only match patterns that start with a dot themselves.
pub fn glob_match(file_name: &str, pattern: &str, matcher: &Regex) -> bool {
    if file_name.starts_with('.') && !pattern.starts_with('.') {
        return false;
    }
    matcher.is_match(file_name)
}

/// Find files below `dir` whose names match `pattern`.
///
/// # Arguments
///
/// * `dir` - Directory to search
/// * `pattern` - Glob pattern matched against file names
/// * `recursive` - Descend into subdirectories
///
/// # Returns
///
/// Matching files sorted by path
pub fn find_files(dir: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("Directory not found: {}", dir.display()));
    }

    let matcher = compile_glob(pattern)?;
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    let include_hidden = pattern.starts_with('.');
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // The search root itself may be `.` or a dot-directory
            include_hidden
                || e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_string_lossy().starts_with('.')
        })
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if glob_match(&file_name, pattern, &matcher) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(
        "Pattern '{}' matched {} file(s) in {}",
        pattern,
        files.len(),
        dir.display()
    );

    Ok(files)
}

/// Name used for a file in reports.
///
/// Files directly inside `base` are shown by name, nested files relative to `base`.
pub fn display_name(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(name: &str, pattern: &str) -> bool {
        let matcher = compile_glob(pattern).unwrap();
        glob_match(name, pattern, &matcher)
    }

    #[test]
    fn test_question_marks() {
        assert!(matches("hs_ppi.txt", "??_*.txt"));
        assert!(matches("sc_.txt", "??_*.txt"));
        assert!(!matches("human_ppi.txt", "??_*.txt"));
        assert!(!matches("hs_ppi.txt.bak", "??_*.txt"));
    }

    #[test]
    fn test_literal_characters() {
        assert!(matches("a.ppi", "*.ppi"));
        assert!(!matches("appi", "*.ppi"));
        assert!(matches("x+y(1).ppi", "x+y(1).ppi"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("net1.ppi", "net[0-9].ppi"));
        assert!(!matches("netA.ppi", "net[0-9].ppi"));
        assert!(matches("netA.ppi", "net[!0-9].ppi"));
        assert!(compile_glob("net[0-9.ppi").is_err());

        assert!(matches("].txt", "[]a].txt"));
        assert!(matches("a.txt", "[]a].txt"));
        assert!(!matches("b.txt", "[]a].txt"));
        assert!(matches("b.txt", "[!]].txt"));
        assert!(!matches("].txt", "[!]].txt"));

        assert!(matches("x&.txt", "x[a&&b].txt"));
        assert!(matches("xb.txt", "x[a&&b].txt"));
        assert!(matches("x~.txt", "x[~~].txt"));
        assert!(matches("x^.txt", "x[a^].txt"));
    }

    #[test]
    fn test_hidden_files() {
        assert!(!matches(".h_x.txt", "*.txt"));
        assert!(matches(".hidden.txt", ".*.txt"));
    }

    #[test]
    fn test_find_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.ppi", "a.ppi", "notes.txt"] {
            std::fs::write(dir.path().join(name), "A B\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.ppi"), "A B\n").unwrap();
        std::fs::create_dir(dir.path().join("dir.ppi")).unwrap();

        let flat = find_files(dir.path(), "*.ppi", false).unwrap();
        let names: Vec<_> = flat.iter().map(|p| display_name(p, dir.path())).collect();
        assert_eq!(names, vec!["a.ppi", "b.ppi"]);

        let deep = find_files(dir.path(), "*.ppi", true).unwrap();
        assert_eq!(deep.len(), 3);

        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git").join("d.ppi"), "A B\n").unwrap();
        let deep = find_files(dir.path(), "*.ppi", true).unwrap();
        assert_eq!(deep.len(), 3);
        let dotted = find_files(dir.path(), ".*", true).unwrap();
        assert!(dotted.is_empty());
        let hidden = find_files(dir.path(), ".git", false).unwrap();
        assert!(hidden.is_empty());

        let inside_hidden_root = find_files(&dir.path().join(".git"), "*.ppi", false).unwrap();
        assert_eq!(inside_hidden_root.len(), 1);

        assert!(find_files(&dir.path().join("missing"), "*", false).is_err());
    }
}
