//! A small line-oriented shell: each input line is one simple command, a
//! pipeline, a `;` sequence, an `&&`/`||` chain, a redirected command or a
//! background job, plus the `#file` word count and `a ~ b` print modes.

pub mod builtin;
pub mod conditional;
pub mod config;
pub mod error;
pub mod eval;
pub mod exec;
pub mod global;
pub mod job;
pub mod parser;
pub mod pipeline;
pub mod redirect;
pub mod sequence;
pub mod types;

pub use error::{ErrorKind,ShellError};
pub use eval::{eval,Control};
