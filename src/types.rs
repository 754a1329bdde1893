use std::borrow::Cow;
use std::ffi::{CStr,CString};
use std::os::unix::io::RawFd;

use crate::error::{Result,ShellError};

/// The words of one command, program name first. Never empty, never longer
/// than the bound it was built with, and free of nul bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argv {
	words: Vec<CString>,
}

impl Argv {
	pub fn new<I, S>(words: I, limit: usize) -> Result<Argv>
		where I: IntoIterator<Item = S>, S: Into<Vec<u8>> {
		let mut v = Vec::with_capacity(limit);
		for word in words {
			if v.len() == limit {
				return Err(ShellError::TooManyArguments(limit));
			}
			v.push(CString::new(word)?);
		}
		if v.is_empty() {
			return Err(ShellError::EmptyCommand);
		}
		Ok(Argv { words: v })
	}

	pub fn program(&self) -> &CStr {
		&self.words[0]
	}

	pub fn name(&self) -> Cow<str> {
		self.words[0].to_string_lossy()
	}

	pub fn words(&self) -> &[CString] {
		&self.words
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectType { Input, Output, Append }

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
	pub target: CString,
	pub from: RawFd,
	pub typ: RedirectType,
}

impl Redirect {
	pub fn new(target: &str, typ: RedirectType) -> Result<Redirect> {
		let from = if typ == RedirectType::Input { libc::STDIN_FILENO } else { libc::STDOUT_FILENO };
		Ok(Redirect { target: CString::new(target)?, from: from, typ: typ })
	}
}

/// A command with at most one input and one output redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
	pub argv: Argv,
	pub input: Option<Redirect>,
	pub output: Option<Redirect>,
}

impl Redirection {
	pub fn redirects(&self) -> Vec<Redirect> {
		self.input.iter().chain(self.output.iter()).cloned().collect()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator { And, Or }

/// `first op rest[0].1 op rest[1].1 ...`, folded left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
	pub first: Argv,
	pub rest: Vec<(Operator, Argv)>,
}

/// Which component a line is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Empty,
	WordCount,
	Concat,
	Conditional,
	Pipeline,
	Redirect,
	Background,
	Sequence,
	Simple,
}
