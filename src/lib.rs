pub mod apple;
pub mod config;
pub mod filter;
pub mod path;
pub mod tokens;
pub mod verify;

pub use filter::{Filter, FilterError, Stats};
pub use tokens::{ReadError, Token, TokenReader};
pub use verify::{ForkVerifier, OsFiles, Verdict};
