use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    tokens::{ReadError, TokenReader, TERMINATOR},
    verify::{Files, ForkVerifier},
};

#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("failed to write output")]
    Write(#[source] io::Error),
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Stats {
    /// Tokens read from the input.
    pub read: u64,
    /// Tokens whose base-name carries the `._` marker.
    pub matched: u64,
    /// Tokens written to the output.
    pub emitted: u64,
}

/// Copies the verified resource forks of a null-delimited path list to the
/// output, in input order, each followed by one terminator.
pub struct Filter<R, W, F> {
    reader: TokenReader<R>,
    writer: W,
    verifier: ForkVerifier<F>,
}

impl <R: BufRead, W: Write, F: Files> Filter<R, W, F> {
    pub fn new(reader: R, writer: W, verifier: ForkVerifier<F>) -> Self {
        Self {
            reader: TokenReader::new(reader),
            writer,
            verifier,
        }
    }
    #[tracing::instrument(name = "Filter", skip(self))]
    pub fn run(self) -> Result<Stats, FilterError> {
        let Self { mut reader, mut writer, verifier } = self;
        let mut stats = Stats::default();
        while let Some(token) = reader.next_token()? {
            stats.read += 1;
            let verdict = verifier.judge(token.as_bytes());
            if verdict.is_resource_fork() {
                stats.matched += 1;
            }
            if !verdict.is_verified() {
                continue;
            }
            debug!(path = ?token.as_path(), "verified");
            writer.write_all(token.as_bytes()).map_err(FilterError::Write)?;
            writer.write_all(&[TERMINATOR]).map_err(FilterError::Write)?;
            stats.emitted += 1;
        }
        writer.flush().map_err(FilterError::Write)?;
        info!(read = stats.read, matched = stats.matched, emitted = stats.emitted, "done");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::{fs, io::ErrorKind, path::Path};
    use tempfile::TempDir;

    fn run(input: &[u8]) -> Result<(Vec<u8>, Stats)> {
        let mut output = vec![];
        let stats = Filter::new(input, &mut output, ForkVerifier::new()).run()?;
        Ok((output, stats))
    }

    fn nul_list<P: AsRef<Path>>(paths: &[P]) -> Vec<u8> {
        let mut list = vec![];
        for path in paths {
            list.extend_from_slice(path.as_ref().to_str().unwrap().as_bytes());
            list.push(TERMINATOR);
        }
        list
    }

    #[test]
    fn emits_verified_forks() -> Result<()> {
        let dir = TempDir::new()?;
        let foo = dir.path().join("foo");
        let fork = dir.path().join("._foo");
        fs::write(&foo, b"")?;

        let (output, stats) = run(&nul_list(&[&foo, &fork]))?;

        assert_eq!(output, nul_list(&[&fork]));
        assert_eq!(stats, Stats { read: 2, matched: 1, emitted: 1 });
        Ok(())
    }

    #[test]
    fn drops_forks_without_primary() -> Result<()> {
        let dir = TempDir::new()?;
        let fork = dir.path().join("._bar");

        let (output, stats) = run(&nul_list(&[&fork]))?;

        assert!(output.is_empty());
        assert_eq!(stats, Stats { read: 1, matched: 1, emitted: 0 });
        Ok(())
    }

    #[test]
    fn drops_plain_names() -> Result<()> {
        let (output, stats) = run(b"notes.txt\0")?;
        assert!(output.is_empty());
        assert_eq!(stats.matched, 0);
        Ok(())
    }

    #[test]
    fn drops_bare_prefix() -> Result<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a");
        fs::create_dir(&a)?;

        let (output, _) = run(&nul_list(&[&a.join("._")]))?;

        assert!(output.is_empty());
        Ok(())
    }

    #[test]
    fn final_terminator_is_optional() -> Result<()> {
        let dir = TempDir::new()?;
        let foo = dir.path().join("foo");
        let fork = dir.path().join("._foo");
        fs::write(&foo, b"")?;

        let terminated = nul_list(&[&foo, &fork]);
        let unterminated = &terminated[..terminated.len() - 1];

        let (a, _) = run(&terminated)?;
        let (b, _) = run(unterminated)?;
        assert_eq!(a, b);
        assert_eq!(b, nul_list(&[&fork]));
        Ok(())
    }

    #[test]
    fn keeps_input_order() -> Result<()> {
        let dir = TempDir::new()?;
        let names = ["c", "a", "b"];
        let mut forks = vec![];
        for name in names {
            fs::write(dir.path().join(name), b"")?;
            forks.push(dir.path().join(format!("._{name}")));
        }

        let (output, stats) = run(&nul_list(&forks))?;

        assert_eq!(output, nul_list(&forks));
        assert_eq!(stats.emitted, 3);
        Ok(())
    }

    #[test]
    fn empty_input() -> Result<()> {
        let (output, stats) = run(b"")?;
        assert!(output.is_empty());
        assert_eq!(stats, Stats::default());
        Ok(())
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_reported() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("foo"), b"")?;
        let input = nul_list(&[&dir.path().join("._foo")]);

        let result = Filter::new(&input[..], Closed, ForkVerifier::new()).run();

        assert!(matches!(result, Err(FilterError::Write(e)) if e.kind() == ErrorKind::BrokenPipe));
        Ok(())
    }
}
