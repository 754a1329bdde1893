use std::{ffi,io};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind { Parse, Spawn, Io, ResourceLimit, Job }

#[derive(Debug, Error)]
pub enum ShellError {
	#[error("Empty command.")]
	EmptyCommand,
	#[error("Too many arguments in a command. Maximum allowed is {0}.")]
	TooManyArguments(usize),
	#[error("Too many commands. Maximum allowed is {0}.")]
	TooManyCommands(usize),
	#[error("Too many files specified. Maximum allowed is {0}")]
	TooManyFiles(usize),
	#[error("{0}")]
	Syntax(String),
	#[error("Nul char error: {0}")]
	Nul(#[from] ffi::NulError),
	#[error("fork: {0}")]
	Spawn(#[source] nix::Error),
	#[error("pipe: {0}")]
	Pipe(#[source] nix::Error),
	#[error("Nix error: {0}")]
	Nix(#[from] nix::Error),
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
	#[error("No background process available.")]
	NoBackgroundJob,
}

impl ShellError {
	pub fn syntax<S: Into<String>>(msg: S) -> ShellError {
		ShellError::Syntax(msg.into())
	}

	pub fn kind(&self) -> ErrorKind {
		match *self {
			ShellError::EmptyCommand | ShellError::Syntax(..) | ShellError::Nul(..) => ErrorKind::Parse,
			ShellError::TooManyArguments(..) | ShellError::TooManyCommands(..) | ShellError::TooManyFiles(..) => ErrorKind::ResourceLimit,
			ShellError::Spawn(..) | ShellError::Pipe(..) | ShellError::Nix(..) => ErrorKind::Spawn,
			ShellError::Io(..) => ErrorKind::Io,
			ShellError::NoBackgroundJob => ErrorKind::Job,
		}
	}

	/// Writes the one-line message to stderr.
	pub fn report(&self) {
		log::debug!("{:?} error: {:?}", self.kind(), self);
		eprintln!("{}", self);
	}
}

pub type Result<T> = std::result::Result<T, ShellError>;
