use regex::bytes::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ConfigError, Stage};

/// Lists the entries directly inside a directory
pub trait DirectoryLister: Send + Sync {
    /// A missing directory lists as empty.
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Lists entries from the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            entries.push(entry.into_path());
        }

        Ok(entries)
    }
}

/// Synthetic listings keyed by directory
#[derive(Debug, Default, Clone)]
pub struct StaticLister {
    dirs: HashMap<PathBuf, Vec<String>>,
}

impl StaticLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, S>(mut self, dir: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs
            .entry(dir.into())
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }
}

impl DirectoryLister for StaticLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .dirs
            .get(dir)
            .map(|names| names.iter().map(|name| dir.join(name)).collect())
            .unwrap_or_default())
    }
}

/// Single-directory glob such as `<dir>/*-server.conf`.
///
/// Wildcards never cross a path separator: `*` matches any run of
/// characters, `?` one character, `[...]` a class (`[!...]` negated) and
/// `\` escapes the next character.
///
/// Names are matched as raw bytes, so entries whose names are not valid
/// UTF-8 still count.
#[derive(Debug, Clone)]
pub struct FragmentPattern {
    dir: PathBuf,
    glob: String,
    matcher: Regex,
}

impl FragmentPattern {
    pub fn new(dir: impl Into<PathBuf>, glob: &str) -> Result<Self, ConfigError> {
        let dir = dir.into();
        let matcher = RegexBuilder::new(&glob_to_regex(glob))
            .unicode(false)
            .build()
            .map_err(|source| ConfigError::PatternMatch {
                pattern: dir.join(glob).display().to_string(),
                source,
            })?;

        Ok(Self {
            dir,
            glob: glob.to_string(),
            matcher,
        })
    }

    /// The pattern itself, as nginx expects it in an `include` directive
    pub fn pattern(&self) -> String {
        self.dir.join(&self.glob).display().to_string()
    }

    /// Sorted paths in the pattern's directory whose names match
    pub fn matches(&self, lister: &dyn DirectoryLister) -> Result<Vec<PathBuf>, ConfigError> {
        let entries = lister
            .list(&self.dir)
            .map_err(|source| ConfigError::persistence(Stage::List, &self.dir, source))?;

        let mut matched: Vec<PathBuf> = entries
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| self.matcher.is_match(name.as_bytes()))
            })
            .collect();
        matched.sort();

        Ok(matched)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');

    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&regex::escape(&escaped.to_string())),
                // Dangling escape, left for the regex compiler to reject
                None => out.push('\\'),
            },
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    out.push('^');
                }
                for class_char in chars.by_ref() {
                    if class_char == ']' {
                        out.push(']');
                        break;
                    }
                    if class_char == '\\' || class_char == '[' {
                        out.push('\\');
                    }
                    out.push(class_char);
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    out
}
