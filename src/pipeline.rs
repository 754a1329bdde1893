use std::os::unix::io::{AsRawFd,OwnedFd,RawFd};

use log::{debug,warn};
use nix::fcntl::OFlag;
use nix::unistd;

use crate::config::MAX_COMMANDS;
use crate::error::{Result,ShellError};
use crate::exec::{self,ChildSpec};
use crate::parser;
use crate::types::Argv;

/// Pipe `i` carries stage `i`'s stdout to stage `i + 1`'s stdin.
#[derive(Debug)]
pub struct Pipes {
	ends: Vec<(OwnedFd, OwnedFd)>,
}

impl Pipes {
	pub fn open(stages: usize) -> Result<Pipes> {
		let mut ends = Vec::with_capacity(stages.saturating_sub(1));
		for _ in 1 .. stages {
			ends.push(unistd::pipe2(OFlag::O_CLOEXEC).map_err(ShellError::Pipe)?);
		}
		Ok(Pipes { ends: ends })
	}

	pub fn len(&self) -> usize {
		self.ends.len()
	}

	fn raw_fds(&self) -> Vec<RawFd> {
		self.ends.iter().flat_map(|&(ref r, ref w)| vec![r.as_raw_fd(), w.as_raw_fd()]).collect()
	}

	pub fn stage(&self, i: usize) -> ChildSpec {
		let mut dups = vec![];
		if i > 0 {
			dups.push((self.ends[i - 1].0.as_raw_fd(), libc::STDIN_FILENO));
		}
		if i < self.ends.len() {
			dups.push((self.ends[i].1.as_raw_fd(), libc::STDOUT_FILENO));
		}
		ChildSpec { dups: dups, closes: self.raw_fds(), ..ChildSpec::default() }
	}
}

pub fn parse(line: &str) -> Result<Vec<Argv>> {
	parser::split_commands(line, '|')?.into_iter().map(|s| parser::split(s.trim())).collect()
}

// a stage that fails to spawn does not cancel the ones already started
pub fn run(argvs: &[Argv]) -> Result<()> {
	if argvs.is_empty() {
		return Err(ShellError::EmptyCommand);
	}
	if argvs.len() > MAX_COMMANDS {
		return Err(ShellError::TooManyCommands(MAX_COMMANDS));
	}

	let pipes = Pipes::open(argvs.len())?;
	let mut pids = Vec::with_capacity(argvs.len());
	let mut spawn_error = None;
	for (i, argv) in argvs.iter().enumerate() {
		match exec::spawn(argv, &pipes.stage(i)) {
			Ok(pid) => pids.push(pid),
			Err(e) => {
				spawn_error = Some(e);
				break;
			},
		}
	}
	drop(pipes);

	for pid in pids {
		match exec::wait(pid, None) {
			Ok(status) => debug!("stage {} reaped: {:?}", pid, status),
			Err(e) => warn!("stage {}: {}", pid, e),
		}
	}
	match spawn_error {
		Some(e) => Err(e),
		None => Ok(()),
	}
}
