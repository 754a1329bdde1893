use std::{fs,io};
use std::io::Write;

use nix::sys::wait::WaitStatus;

use crate::config::{EXIT_KEYWORD,FOREGROUND_KEYWORD,MAX_ARGS,MAX_FILES};
use crate::error::{Result,ShellError};
use crate::eval::Control;
use crate::exec::{self,ChildSpec};
use crate::global;
use crate::job;
use crate::parser;
use crate::types::Argv;

pub fn builtin_exit(_: &mut global::State) -> Control {
	println!("Killed");
	Control::Exit
}

pub fn builtin_fore(state: &mut global::State) -> Control {
	if let Err(e) = job::foreground(&mut state.job_slot) {
		e.report();
	}
	Control::Continue
}

pub fn match_builtin(line: &str) -> Option<fn(&mut global::State) -> Control> {
	match line {
		EXIT_KEYWORD => Some(builtin_exit),
		FOREGROUND_KEYWORD => Some(builtin_fore),
		_ => None,
	}
}

/// `#file`: runs `wc -w file` with inherited output.
pub fn word_count(line: &str) -> Result<bool> {
	let names = parser::words(line.strip_prefix('#').unwrap_or(line));
	let name = match names.len() {
		0 => { return Err(ShellError::syntax("No filename provided after '#'.")); },
		1 => names[0],
		_ => { return Err(ShellError::syntax("Syntax error: Extra arguments found.")); },
	};

	let argv = Argv::new(vec!["wc", "-w", name], MAX_ARGS)?;
	let pid = exec::spawn(&argv, &ChildSpec::default())?;
	match exec::wait(pid, None)? {
		WaitStatus::Exited(_, 0) => Ok(true),
		WaitStatus::Exited(..) => {
			eprintln!("wc command failed for file: {}", name);
			Ok(false)
		},
		_ => {
			eprintln!("wc command did not terminate normally.");
			Ok(false)
		},
	}
}

/// `a ~ b ~ c`: prints every listed file followed by a newline. Returns how
/// many files could be printed.
pub fn concat<W: Write>(line: &str, out: &mut W) -> Result<usize> {
	if line.starts_with('~') {
		return Err(ShellError::syntax("Syntax error: Input must not start with '~'"));
	}
	let files: Vec<&str> = line.split('~').map(str::trim).filter(|s| !s.is_empty()).collect();
	if files.len() > MAX_FILES {
		return Err(ShellError::TooManyFiles(MAX_FILES));
	}
	if files.is_empty() {
		return Err(ShellError::syntax("No files specified"));
	}

	let mut printed = 0;
	for name in files {
		let mut file = match fs::File::open(name) {
			Ok(file) => file,
			Err(e) => {
				eprintln!("Error opening file '{}': {}", name, e);
				continue;
			},
		};
		io::copy(&mut file, out)?;
		out.write_all(b"\n")?;
		printed += 1;
	}
	out.flush()?;
	Ok(printed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn keywords() {
		assert!(match_builtin("dter").is_some());
		assert!(match_builtin("fore").is_some());
		assert!(match_builtin("fore x").is_none());
		assert!(match_builtin("ls").is_none());
	}

	#[test]
	fn fore_without_job_continues() {
		let mut state = global::State::default();
		assert_eq!(builtin_fore(&mut state), Control::Continue);
		assert_eq!(builtin_exit(&mut state), Control::Exit);
	}

	#[test]
	fn word_count_arguments() {
		assert_eq!(word_count("#").unwrap_err().kind(), ErrorKind::Parse);
		assert_eq!(word_count("#a b").unwrap_err().kind(), ErrorKind::Parse);
		assert!(!word_count("#/nonexistent-microsh-file").unwrap());
	}

	#[test]
	fn concat_prints_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let a = dir.path().join("a.txt");
		let b = dir.path().join("b.txt");
		fs::write(&a, "first\n").unwrap();
		fs::write(&b, "second\n").unwrap();

		let mut out = vec![];
		let line = format!("{} ~ {}", a.display(), b.display());
		assert_eq!(concat(&line, &mut out).unwrap(), 2);
		assert_eq!(out, b"first\n\nsecond\n\n");
	}

	#[test]
	fn concat_skips_unreadable_files() {
		let dir = tempfile::tempdir().unwrap();
		let a = dir.path().join("a.txt");
		fs::write(&a, "only").unwrap();

		let mut out = vec![];
		let line = format!("{}/missing ~ {} ~", dir.path().display(), a.display());
		assert_eq!(concat(&line, &mut out).unwrap(), 1);
		assert_eq!(out, b"only\n");
	}

	#[test]
	fn concat_rejections() {
		let mut out = vec![];
		assert_eq!(concat("~a", &mut out).unwrap_err().kind(), ErrorKind::Parse);
		assert_eq!(concat("a ~ b ~ c ~ d ~ e", &mut out).unwrap_err().kind(), ErrorKind::ResourceLimit);
		assert_eq!(concat("no-such-microsh-file ~ ~ ", &mut out).unwrap(), 0);
		assert!(out.is_empty());
	}
}
