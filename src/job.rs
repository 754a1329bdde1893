use std::io;
use std::io::IsTerminal;
use std::os::unix::io::AsFd;

use log::{info,warn};
use nix::errno::Errno;
use nix::sys::signal::{self,SigHandler,Signal};
use nix::sys::wait::{WaitPidFlag,WaitStatus};
use nix::unistd::{self,Pid};

use crate::error::{Result,ShellError};
use crate::exec::{self,ChildSpec};
use crate::parser;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum State { Active, Stopped, Terminated }

pub trait WaitStatusExt {
	fn state(self) -> State;
	fn success(self) -> bool;
}

impl WaitStatusExt for WaitStatus {
	fn state(self) -> State {
		match self {
			WaitStatus::Exited(..) => State::Terminated,
			WaitStatus::Signaled(..) => State::Terminated,
			WaitStatus::Stopped(..) => State::Stopped,
			WaitStatus::Continued(..) => State::Active,
			WaitStatus::StillAlive => State::Active,
			#[allow(unreachable_patterns)]
			_ => State::Stopped,
		}
	}
	fn success(self) -> bool {
		match self {
			WaitStatus::Exited(_, 0) => true,
			_ => false,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Job {
	pub pid: Pid,
	pub command: String,
	pub state: State,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum JobSlot {
	#[default]
	Empty,
	Occupied(Job),
}

impl JobSlot {
	pub fn is_empty(&self) -> bool {
		*self == JobSlot::Empty
	}

	pub fn job(&self) -> Option<&Job> {
		match *self {
			JobSlot::Empty => None,
			JobSlot::Occupied(ref job) => Some(job),
		}
	}

	pub fn put(&mut self, job: Job) -> Option<Job> {
		match std::mem::replace(self, JobSlot::Occupied(job)) {
			JobSlot::Empty => None,
			JobSlot::Occupied(old) => Some(old),
		}
	}

	pub fn take(&mut self) -> Option<Job> {
		match std::mem::replace(self, JobSlot::Empty) {
			JobSlot::Empty => None,
			JobSlot::Occupied(job) => Some(job),
		}
	}

	fn set_state(&mut self, state: State) {
		if let JobSlot::Occupied(ref mut job) = *self {
			job.state = state;
		}
	}
}

/// Terminal ownership lent to a job's process group for the guard's lifetime.
/// Dropping it hands the terminal back to the shell, then restores default
/// SIGTTOU/SIGTTIN handling.
pub struct TerminalGuard {
	shell_pgrp: Pid,
	transferred: bool,
}

impl TerminalGuard {
	pub fn acquire(pgrp: Pid) -> Result<TerminalGuard> {
		let mut guard = TerminalGuard { shell_pgrp: unistd::getpgrp(), transferred: false };
		unsafe {
			signal::signal(Signal::SIGTTOU, SigHandler::SigIgn)?;
			signal::signal(Signal::SIGTTIN, SigHandler::SigIgn)?;
		}
		if io::stdin().is_terminal() {
			match unistd::tcsetpgrp(io::stdin().as_fd(), pgrp) {
				Ok(()) => { guard.transferred = true; },
				Err(e) => warn!("tcsetpgrp({}): {}", pgrp, e),
			}
		}
		Ok(guard)
	}
}

impl Drop for TerminalGuard {
	fn drop(&mut self) {
		if self.transferred {
			if let Err(e) = unistd::tcsetpgrp(io::stdin().as_fd(), self.shell_pgrp) {
				warn!("tcsetpgrp({}): {}", self.shell_pgrp, e);
			}
		}
		unsafe {
			let _ = signal::signal(Signal::SIGTTOU, SigHandler::SigDfl);
			let _ = signal::signal(Signal::SIGTTIN, SigHandler::SigDfl);
		}
	}
}

pub fn background(slot: &mut JobSlot, line: &str) -> Result<Pid> {
	let text = line.strip_suffix('+').unwrap_or(line).trim();
	let argv = parser::split(text)?;
	let pid = exec::spawn(&argv, &ChildSpec { own_group: true, ..ChildSpec::default() })?;
	println!("Background process started with PID: {}", pid);

	let job = Job { pid: pid, command: text.to_string(), state: State::Active };
	if let Some(old) = slot.put(job) {
		info!("job {} ({}) replaced by {} without being reaped", old.pid, old.command, pid);
	}
	info!("background job {}: {}", pid, text);
	Ok(pid)
}

/// A stopped job stays in the slot so it can be resumed later.
pub fn foreground(slot: &mut JobSlot) -> Result<State> {
	let job = match slot.job() {
		Some(job) => job.clone(),
		None => { return Err(ShellError::NoBackgroundJob); },
	};
	println!("Bringing process {} to foreground", job.pid);

	let status = {
		let _guard = TerminalGuard::acquire(job.pid)?;
		// the job may have stopped on its own since it was recorded
		match signal::killpg(job.pid, Signal::SIGCONT) {
			Ok(()) | Err(Errno::ESRCH) => {},
			Err(e) => warn!("killpg({}, SIGCONT): {}", job.pid, e),
		}
		exec::wait(job.pid, Some(WaitPidFlag::WUNTRACED))
	};
	let status = match status {
		Ok(status) => status,
		Err(e) => {
			slot.take();
			return Err(e);
		},
	};

	let state = status.state();
	match state {
		State::Stopped => {
			println!("Process {} stopped", job.pid);
			slot.set_state(State::Stopped);
		},
		State::Terminated => {
			println!("Process {} finished", job.pid);
			slot.take();
		},
		State::Active => {
			slot.set_state(State::Active);
		},
	}
	info!("job {} is {:?}", job.pid, state);
	Ok(state)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;
	use nix::sys::signal::Signal;

	fn job(pid: i32) -> Job {
		Job { pid: Pid::from_raw(pid), command: "sleep 1".to_string(), state: State::Active }
	}

	#[test]
	fn slot_holds_one_job() {
		let mut slot = JobSlot::default();
		assert!(slot.is_empty());
		assert_eq!(slot.put(job(10)), None);
		assert_eq!(slot.job().map(|j| j.pid), Some(Pid::from_raw(10)));
		let old = slot.put(job(11)).unwrap();
		assert_eq!(old.pid, Pid::from_raw(10));
		assert_eq!(slot.take().map(|j| j.pid), Some(Pid::from_raw(11)));
		assert!(slot.is_empty());
		assert_eq!(slot.take(), None);
	}

	#[test]
	fn stopped_state_is_kept() {
		let mut slot = JobSlot::default();
		slot.put(job(12));
		slot.set_state(State::Stopped);
		assert_eq!(slot.job().unwrap().state, State::Stopped);
	}

	#[test]
	fn foreground_without_job() {
		let mut slot = JobSlot::Empty;
		let e = foreground(&mut slot).unwrap_err();
		assert_eq!(e.kind(), ErrorKind::Job);
		assert!(slot.is_empty());
	}

	#[test]
	fn background_rejects_long_commands() {
		let mut slot = JobSlot::Empty;
		let e = background(&mut slot, "sleep 1 2 3 4 +").unwrap_err();
		assert_eq!(e.kind(), ErrorKind::ResourceLimit);
		assert!(slot.is_empty());
		let e = background(&mut slot, "+").unwrap_err();
		assert_eq!(e.kind(), ErrorKind::Parse);
	}

	#[test]
	fn wait_status_states() {
		let pid = Pid::from_raw(1);
		assert_eq!(WaitStatus::Exited(pid, 0).state(), State::Terminated);
		assert!(WaitStatus::Exited(pid, 0).success());
		assert!(!WaitStatus::Exited(pid, 1).success());
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGKILL, false).state(), State::Terminated);
		assert_eq!(WaitStatus::Stopped(pid, Signal::SIGTSTP).state(), State::Stopped);
	}
}
