//! `dirname(3)`/`basename(3)` over raw path bytes.
//!
//! [`std::path::Path`] normalizes `.` components and has no base-name for `/`,
//! so splitting works on bytes with the libgen rules instead.

use std::{borrow::Cow, path::Path};

const SEPARATOR: u8 = b'/';
const CURRENT_DIR: &[u8] = b".";
const ROOT: &[u8] = b"/";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PathComponents {
    pub directory: Vec<u8>,
    pub base_name: Vec<u8>,
}

impl PathComponents {
    pub fn split(path: &[u8]) -> Self {
        Self {
            directory: dirname(path).to_vec(),
            base_name: basename(path).to_vec(),
        }
    }
    /// Joins the directory with `name` the way the two halves were split.
    pub fn sibling(&self, name: &[u8]) -> Vec<u8> {
        let mut path = Vec::with_capacity(self.directory.len() + 1 + name.len());
        path.extend_from_slice(&self.directory);
        path.push(SEPARATOR);
        path.extend_from_slice(name);
        path
    }
}

/// Views raw path bytes as a [`Path`] for filesystem calls.
#[cfg(unix)]
pub fn os_path(bytes: &[u8]) -> Cow<'_, Path> {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt as _};
    Cow::Borrowed(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
pub fn os_path(bytes: &[u8]) -> Cow<'_, Path> {
    let path = String::from_utf8_lossy(bytes).into_owned();
    Cow::Owned(path.into())
}

fn trim_trailing_separators(path: &[u8]) -> &[u8] {
    let end = path.iter()
        .rposition(|&b| b != SEPARATOR)
        .map(|i| i + 1)
        .unwrap_or(0);
    &path[..end]
}

pub fn basename(path: &[u8]) -> &[u8] {
    if path.is_empty() {
        return CURRENT_DIR;
    }
    let trimmed = trim_trailing_separators(path);
    if trimmed.is_empty() {
        return ROOT;
    }
    match trimmed.iter().rposition(|&b| b == SEPARATOR) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

pub fn dirname(path: &[u8]) -> &[u8] {
    if path.is_empty() {
        return CURRENT_DIR;
    }
    let trimmed = trim_trailing_separators(path);
    if trimmed.is_empty() {
        return ROOT;
    }
    let Some(i) = trimmed.iter().rposition(|&b| b == SEPARATOR) else {
        return CURRENT_DIR;
    };
    let parent = trim_trailing_separators(&trimmed[..i]);
    if parent.is_empty() {
        ROOT
    } else {
        parent
    }
}
