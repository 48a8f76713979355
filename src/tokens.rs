use std::{
    borrow::Cow,
    collections::TryReserveError,
    io::{self, BufRead, ErrorKind},
    path::Path,
};

use derive_more::{From, Into};
use thiserror::Error;
use tracing::trace;

use crate::path::os_path;

pub const TERMINATOR: u8 = b'\0';

const INITIAL_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("i/o error")]
    IO(#[from] io::Error),
    #[error("out of memory")]
    OutOfMemory(#[from] TryReserveError),
}

/// One path from the input, without its terminator.
#[derive(Debug, Clone, Default, Eq, PartialEq, From, Into)]
pub struct Token(Vec<u8>);

impl Token {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
    pub fn as_path(&self) -> Cow<'_, Path> {
        os_path(&self.0)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Token {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Pulls null-terminated tokens off a byte stream.
///
/// A stream that ends without a final terminator still yields its last
/// token; the following call reports the end of the stream. Nothing past a
/// terminator is consumed until the next call.
pub struct TokenReader<R>(R);

impl <R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self(reader)
    }
    pub fn into_inner(self) -> R {
        self.0
    }
    pub fn next_token(&mut self) -> Result<Option<Token>, ReadError> {
        let Self(reader) = self;
        let mut buf = Vec::new();
        buf.try_reserve_exact(INITIAL_CAPACITY)?;
        let mut terminated = false;
        loop {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                break;
            }
            let (used, found) = match available.iter().position(|&b| b == TERMINATOR) {
                Some(end) => (end, true),
                None => (available.len(), false),
            };
            grow(&mut buf, used)?;
            buf.extend_from_slice(&available[..used]);
            if found {
                reader.consume(used + 1);
                terminated = true;
                break;
            }
            reader.consume(used);
        }
        if buf.is_empty() && !terminated {
            trace!("end of input");
            return Ok(None);
        }
        buf.shrink_to_fit();
        trace!(len = buf.len(), terminated, "read token");
        Ok(Some(Token(buf)))
    }
}

impl <R: BufRead> Iterator for TokenReader<R> {
    type Item = Result<Token, ReadError>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Makes room for `additional` bytes, doubling the capacity when full.
fn grow(buf: &mut Vec<u8>, additional: usize) -> Result<(), TryReserveError> {
    let free = buf.capacity() - buf.len();
    if additional <= free {
        return Ok(());
    }
    let doubled = buf.capacity().saturating_mul(2);
    let wanted = doubled.saturating_sub(buf.len()).max(additional);
    buf.try_reserve_exact(wanted)
}
