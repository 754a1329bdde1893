//! Fork and exec. Every component that starts a process goes through
//! [`spawn`]; [`execute`] is the capturing variant used for plain commands.

use std::{fs,io};
use std::io::{Read,Write};
use std::os::unix::io::{AsRawFd,RawFd};

use log::{debug,trace};
use nix::errno::Errno;
use nix::fcntl::{self,OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::{self,WaitPidFlag,WaitStatus};
use nix::unistd::{self,ForkResult,Pid};

use crate::config::{MAX_ARGS,MAX_GREP_ARGS};
use crate::error::{Result,ShellError};
use crate::job::WaitStatusExt;
use crate::types::{Argv,Redirect,RedirectType};

// applied by the child between fork and exec, in field order
#[derive(Debug, Default)]
pub struct ChildSpec {
	pub dups: Vec<(RawFd, RawFd)>,
	// after the dups
	pub closes: Vec<RawFd>,
	pub redirects: Vec<Redirect>,
	pub own_group: bool,
}

#[derive(Debug)]
pub struct Outcome {
	pub success: bool,
	pub output: Vec<u8>,
	pub no_matches: bool,
}

fn child_fail(parts: &[&[u8]], code: i32) -> ! {
	for part in parts {
		unsafe { libc::write(libc::STDERR_FILENO, part.as_ptr() as *const libc::c_void, part.len()); }
	}
	unsafe { libc::_exit(code) }
}

fn apply_redirect(redirect: &Redirect) -> nix::Result<()> {
	let flags = match redirect.typ {
		RedirectType::Input => OFlag::O_RDONLY,
		RedirectType::Output => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
		RedirectType::Append => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
	};
	let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
	let fd = fcntl::open(redirect.target.as_c_str(), flags, mode)?;
	if fd != redirect.from {
		unistd::dup2(fd, redirect.from)?;
		unistd::close(fd)?;
	}
	Ok(())
}

fn exec_child(argv: &Argv, spec: &ChildSpec, exec_failed: &[u8]) -> ! {
	if spec.own_group {
		let _ = unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0));
	}
	for &(from, to) in &spec.dups {
		if let Err(e) = unistd::dup2(from, to) {
			child_fail(&[b"dup2: ", e.desc().as_bytes(), b"\n"], 1);
		}
	}
	for &fd in &spec.closes {
		let _ = unistd::close(fd);
	}
	for redirect in &spec.redirects {
		if let Err(e) = apply_redirect(redirect) {
			child_fail(&[redirect.target.as_bytes(), b": ", e.desc().as_bytes(), b"\n"], 1);
		}
	}
	let e = match unistd::execvp(argv.program(), argv.words()) {
		Ok(_) => unreachable!(),
		Err(e) => e,
	};
	child_fail(&[exec_failed, e.desc().as_bytes(), b"\n"], 127)
}

pub fn spawn(argv: &Argv, spec: &ChildSpec) -> Result<Pid> {
	// formatted before fork; the child only writes bytes
	let exec_failed = format!("Failed to execute '{}': ", argv.name());
	let _ = io::stdout().flush();
	let _ = io::stderr().flush();

	match unsafe { unistd::fork() }.map_err(ShellError::Spawn)? {
		ForkResult::Parent { child } => {
			if spec.own_group {
				// also done in the child; whichever runs first wins the race
				let _ = unistd::setpgid(child, child);
			}
			debug!("spawned {} as {}", argv.name(), child);
			Ok(child)
		},
		ForkResult::Child => exec_child(argv, spec, exec_failed.as_bytes()),
	}
}

pub fn wait(pid: Pid, flags: Option<WaitPidFlag>) -> Result<WaitStatus> {
	loop {
		match wait::waitpid(pid, flags) {
			Err(Errno::EINTR) => continue,
			Err(e) => { return Err(ShellError::Nix(e)); },
			Ok(status) => {
				trace!("{} changed state: {:?}", pid, status);
				return Ok(status);
			},
		}
	}
}

pub fn run(argv: &Argv, spec: &ChildSpec) -> Result<bool> {
	let pid = spawn(argv, spec)?;
	let status = wait(pid, None)?;
	debug!("{} reaped: {:?}", pid, status);
	Ok(status.success())
}

pub fn check(argv: &Argv) -> Result<()> {
	if argv.len() > MAX_ARGS {
		return Err(ShellError::TooManyArguments(MAX_ARGS));
	}
	if argv.name() == "grep" && argv.len() > MAX_GREP_ARGS {
		return Err(ShellError::syntax("grep: wrong syntax"));
	}
	Ok(())
}

/// Runs `argv` with stdout and stderr merged into a pipe. Everything read is
/// copied to `out` as it arrives and kept in the returned `Outcome`.
pub fn execute<W: Write>(argv: &Argv, out: &mut W) -> Result<Outcome> {
	check(argv)?;

	let (reader, writer) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(ShellError::Pipe)?;
	let w = writer.as_raw_fd();
	let spec = ChildSpec {
		dups: vec![(w, libc::STDOUT_FILENO), (w, libc::STDERR_FILENO)],
		closes: vec![reader.as_raw_fd(), w],
		..ChildSpec::default()
	};
	let pid = spawn(argv, &spec)?;
	drop(writer);

	let mut reader = fs::File::from(reader);
	let mut output = vec![];
	let mut buf = [0u8; 4096];
	let drained = loop {
		match reader.read(&mut buf) {
			Ok(0) => break Ok(()),
			Ok(n) => {
				output.extend_from_slice(&buf[.. n]);
				let _ = out.write_all(&buf[.. n]);
				let _ = out.flush();
			},
			Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {},
			Err(e) => break Err(e),
		}
	};
	drop(reader);

	let status = wait(pid, None)?;
	debug!("{} reaped: {:?}", pid, status);
	drained?;

	let exited = match status {
		WaitStatus::Exited(..) => true,
		_ => false,
	};
	let no_matches = exited && output.is_empty() && argv.name() == "grep";
	if no_matches {
		eprintln!("No matches found");
	}
	Ok(Outcome { success: status.success(), output: output, no_matches: no_matches })
}
