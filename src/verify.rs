use std::{
    fs,
    io::{self, BufReader},
    path::Path,
};

use tracing::{debug, trace};

use crate::{
    apple::{AppleDoubleHeader, APPLEDOUBLE_PREFIX},
    path::{os_path, PathComponents},
    tokens::Token,
};

/// Read-only view of the filesystem the verifier needs.
pub trait Files {
    fn exists(&self, path: &Path) -> io::Result<bool>;
    fn appledouble_header(&self, path: &Path) -> io::Result<AppleDoubleHeader>;
}

impl <F: Files + ?Sized> Files for &F {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        (**self).exists(path)
    }
    fn appledouble_header(&self, path: &Path) -> io::Result<AppleDoubleHeader> {
        (**self).appledouble_header(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFiles;

impl Files for OsFiles {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }
    fn appledouble_header(&self, path: &Path) -> io::Result<AppleDoubleHeader> {
        let file = fs::OpenOptions::new()
            .read(true)
            .open(path)?;
        AppleDoubleHeader::read(BufReader::new(file))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    /// The base-name does not start with `._`.
    NotResourceFork,
    /// Nothing answers to the primary file's name.
    NoPrimary,
    /// Strict mode only: the `._` file is not an AppleDouble file.
    NotAppleDouble,
    Verified,
}

impl Verdict {
    pub fn is_resource_fork(self) -> bool {
        self != Self::NotResourceFork
    }
    pub fn is_verified(self) -> bool {
        self == Self::Verified
    }
}

/// Path of the primary file a `._name` path belongs to, or `None` when the
/// base-name is not a resource fork name.
pub fn primary_path(path: &[u8]) -> Option<Vec<u8>> {
    let components = PathComponents::split(path);
    let name = components.base_name.strip_prefix(APPLEDOUBLE_PREFIX)?;
    Some(components.sibling(name))
}

#[derive(Debug, Clone, Default)]
pub struct ForkVerifier<F = OsFiles> {
    files: F,
    strict: bool,
}

impl ForkVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl <F: Files> ForkVerifier<F> {
    pub fn with_files(files: F) -> Self {
        Self { files, strict: false }
    }
    pub fn strict(self, strict: bool) -> Self {
        Self { strict, ..self }
    }
    pub fn verify(&self, token: &Token) -> bool {
        self.judge(token.as_bytes()).is_verified()
    }
    pub fn judge(&self, path: &[u8]) -> Verdict {
        let components = PathComponents::split(path);
        let Some(name) = components.base_name.strip_prefix(APPLEDOUBLE_PREFIX) else {
            return Verdict::NotResourceFork;
        };
        // a bare `._` would resolve to the directory itself
        if name.is_empty() {
            debug!(path = ?os_path(path), "empty primary name");
            return Verdict::NoPrimary;
        }
        let candidate = components.sibling(name);
        let candidate = os_path(&candidate);
        match self.files.exists(&candidate) {
            Ok(true) => {},
            Ok(false) => {
                debug!(?candidate, "no primary file");
                return Verdict::NoPrimary;
            },
            Err(error) => {
                trace!(?candidate, %error, "existence check failed");
                return Verdict::NoPrimary;
            },
        }
        if self.strict {
            let path = os_path(path);
            match self.files.appledouble_header(&path) {
                Ok(header) => trace!(
                    ?path,
                    entries = header.descriptors.len(),
                    rsrc = ?header.resource_fork(),
                    "appledouble header"
                ),
                Err(error) => {
                    debug!(?path, %error, "not an appledouble file");
                    return Verdict::NotAppleDouble;
                },
            }
        }
        Verdict::Verified
    }
}
